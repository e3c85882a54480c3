//! Template usage repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TemplateUsageEntity;
use crate::metrics::QueryTimer;

/// Repository for template usage events.
#[derive(Clone)]
pub struct UsageRepository {
    pool: PgPool,
}

impl UsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one usage event.
    pub async fn record(
        &self,
        template_id: Uuid,
        output_format: &str,
        event_id: Option<&str>,
        used_at: DateTime<Utc>,
    ) -> Result<TemplateUsageEntity, sqlx::Error> {
        let timer = QueryTimer::new("record_template_usage");
        let result = sqlx::query_as::<_, TemplateUsageEntity>(
            r#"
            INSERT INTO template_usage (template_id, output_format, event_id, used_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, template_id, output_format, event_id, used_at
            "#,
        )
        .bind(template_id)
        .bind(output_format)
        .bind(event_id)
        .bind(used_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Most recent usage events for a template.
    pub async fn recent_for_template(
        &self,
        template_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TemplateUsageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_template_usage");
        let result = sqlx::query_as::<_, TemplateUsageEntity>(
            r#"
            SELECT id, template_id, output_format, event_id, used_at
            FROM template_usage
            WHERE template_id = $1
            ORDER BY used_at DESC
            LIMIT $2
            "#,
        )
        .bind(template_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
