//! Email template repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{NewTemplate, TemplateChanges};

use crate::entities::TemplateEntity;
use crate::metrics::QueryTimer;

const TEMPLATE_COLUMNS: &str = r#"
    id, name, category, layout_type, layout_style, description, html_template,
    thumbnail_url, config, is_favorite, user_id, style_tags, theme_mode,
    output_formats, quick_share_template, add_on_type, parent_event_id,
    last_used_at, created_at, updated_at
"#;

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(value)
        .map_err(|e| sqlx::Error::Protocol(format!("Failed to encode JSON column: {}", e)))
}

/// Repository for email template rows.
#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    /// Creates a new TemplateRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All templates, newest first, optionally limited to one category.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<TemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_templates");
        let sql = format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM email_templates
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY created_at DESC
            "#
        );
        let result = sqlx::query_as::<_, TemplateEntity>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a template by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TemplateEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_template_by_id");
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE id = $1");
        let result = sqlx::query_as::<_, TemplateEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert a template. The layout type is stored resolved.
    pub async fn create(&self, template: &NewTemplate) -> Result<TemplateEntity, sqlx::Error> {
        let config = to_json(&template.config)?;
        let output_formats = template.output_formats.as_ref().map(to_json).transpose()?;

        let timer = QueryTimer::new("create_template");
        let sql = format!(
            r#"
            INSERT INTO email_templates (
                name, category, layout_type, layout_style, description, html_template,
                thumbnail_url, config, user_id, style_tags, theme_mode, output_formats,
                quick_share_template, add_on_type, parent_event_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, TemplateEntity>(&sql)
            .bind(&template.name)
            .bind(template.category.as_str())
            .bind(template.resolved_layout_type().as_str())
            .bind(template.layout_style.map(|s| s.as_str()))
            .bind(&template.description)
            .bind(&template.html_template)
            .bind(&template.thumbnail_url)
            .bind(config)
            .bind(&template.user_id)
            .bind(&template.style_tags)
            .bind(template.theme_mode.map(|t| t.as_str()))
            .bind(output_formats)
            .bind(&template.quick_share_template)
            .bind(template.add_on_type.map(|a| a.as_str()))
            .bind(&template.parent_event_id)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Partial update: only fields present in `changes` are written.
    /// Returns None when no row has the id.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &TemplateChanges,
    ) -> Result<Option<TemplateEntity>, sqlx::Error> {
        let config = changes.config.as_ref().map(to_json).transpose()?;
        let output_formats = changes.output_formats.as_ref().map(to_json).transpose()?;

        let timer = QueryTimer::new("update_template");
        let sql = format!(
            r#"
            UPDATE email_templates SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                layout_type = COALESCE($4, layout_type),
                layout_style = COALESCE($5, layout_style),
                description = COALESCE($6, description),
                html_template = COALESCE($7, html_template),
                thumbnail_url = COALESCE($8, thumbnail_url),
                config = COALESCE($9, config),
                is_favorite = COALESCE($10, is_favorite),
                style_tags = COALESCE($11, style_tags),
                theme_mode = COALESCE($12, theme_mode),
                output_formats = COALESCE($13, output_formats),
                quick_share_template = COALESCE($14, quick_share_template),
                add_on_type = COALESCE($15, add_on_type),
                parent_event_id = COALESCE($16, parent_event_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, TemplateEntity>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(changes.category.map(|c| c.as_str()))
            .bind(changes.layout_type.map(|l| l.as_str()))
            .bind(changes.layout_style.map(|s| s.as_str()))
            .bind(&changes.description)
            .bind(&changes.html_template)
            .bind(&changes.thumbnail_url)
            .bind(config)
            .bind(changes.is_favorite)
            .bind(&changes.style_tags)
            .bind(changes.theme_mode.map(|t| t.as_str()))
            .bind(output_formats)
            .bind(&changes.quick_share_template)
            .bind(changes.add_on_type.map(|a| a.as_str()))
            .bind(&changes.parent_event_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Delete a template. Returns the number of rows removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_template");
        let result = sqlx::query("DELETE FROM email_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Stamp `last_used_at`. Returns the number of rows touched.
    pub async fn touch_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("touch_template_last_used");
        let result = sqlx::query("UPDATE email_templates SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
