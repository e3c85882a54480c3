//! Postgres-backed [`TemplateStore`].

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    EmailTemplate, NewTemplate, OutputFormat, TemplateCategory, TemplateChanges,
};
use domain::services::{StoreError, TemplateStore};

use crate::repositories::{TemplateRepository, UsageRepository};

/// Maps a database error into the store taxonomy.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Ids that are not UUIDs can never match a stored row.
fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::NotFound(id.to_string()))
}

#[derive(Clone)]
pub struct PgTemplateStore {
    templates: TemplateRepository,
    usage: UsageRepository,
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            templates: TemplateRepository::new(pool.clone()),
            usage: UsageRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl TemplateStore for PgTemplateStore {
    async fn fetch_templates(
        &self,
        category: Option<TemplateCategory>,
    ) -> Result<Vec<EmailTemplate>, StoreError> {
        let rows = self
            .templates
            .list(category.map(|c| c.as_str()))
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_template(&self, id: &str) -> Result<Option<EmailTemplate>, StoreError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        let row = self.templates.find_by_id(uuid).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_template(&self, template: NewTemplate) -> Result<EmailTemplate, StoreError> {
        let row = self
            .templates
            .create(&template)
            .await
            .map_err(store_error)?;
        tracing::info!(template_id = %row.id, name = %row.name, "Created template");
        Ok(row.into())
    }

    async fn update_template(
        &self,
        id: &str,
        changes: TemplateChanges,
    ) -> Result<EmailTemplate, StoreError> {
        let uuid = parse_id(id)?;
        self.templates
            .update(uuid, &changes)
            .await
            .map_err(store_error)?
            .map(Into::into)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete_template(&self, id: &str) -> Result<(), StoreError> {
        let uuid = parse_id(id)?;
        let removed = self.templates.delete(uuid).await.map_err(store_error)?;
        if removed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tracing::info!(template_id = %id, "Deleted template");
        Ok(())
    }

    async fn track_usage(
        &self,
        id: &str,
        output_format: OutputFormat,
        event_id: Option<String>,
    ) -> Result<(), StoreError> {
        let uuid = parse_id(id)?;
        let now = Utc::now();
        self.usage
            .record(uuid, output_format.as_str(), event_id.as_deref(), now)
            .await
            .map_err(store_error)?;
        self.templates
            .touch_last_used(uuid, now)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
