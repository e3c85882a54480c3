//! Template storage abstraction.
//!
//! The API and bulk import talk to templates through [`TemplateStore`].
//! Postgres provides the production implementation; [`InMemoryTemplateStore`]
//! backs tests and local runs without a database.

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    EmailTemplate, NewTemplate, OutputFormat, TemplateCategory, TemplateChanges, TemplateUsage,
};

/// Errors surfaced by template stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[async_trait::async_trait]
pub trait TemplateStore: Send + Sync {
    /// User templates, newest first, optionally restricted to one category.
    async fn fetch_templates(
        &self,
        category: Option<TemplateCategory>,
    ) -> Result<Vec<EmailTemplate>, StoreError>;

    async fn get_template(&self, id: &str) -> Result<Option<EmailTemplate>, StoreError>;

    async fn create_template(&self, template: NewTemplate) -> Result<EmailTemplate, StoreError>;

    /// Applies a partial update and returns the stored row.
    async fn update_template(
        &self,
        id: &str,
        changes: TemplateChanges,
    ) -> Result<EmailTemplate, StoreError>;

    async fn delete_template(&self, id: &str) -> Result<(), StoreError>;

    /// Records a usage event and stamps the template's `last_used_at`.
    async fn track_usage(
        &self,
        id: &str,
        output_format: OutputFormat,
        event_id: Option<String>,
    ) -> Result<(), StoreError>;
}

/// Tracks usage without letting a failure reach the caller.
pub async fn track_usage_best_effort(
    store: &dyn TemplateStore,
    id: &str,
    output_format: OutputFormat,
    event_id: Option<String>,
) {
    if let Err(e) = store.track_usage(id, output_format, event_id).await {
        tracing::warn!(
            template_id = %id,
            output_format = %output_format,
            error = %e,
            "Failed to track template usage"
        );
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    templates: Vec<EmailTemplate>,
    usage: Vec<TemplateUsage>,
}

/// Template store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    state: RwLock<MemoryState>,
    /// Every call fails with a backend error.
    simulate_failure: bool,
    /// Creates with one of these names fail with a backend error.
    failing_names: HashSet<String>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// A store that refuses to create templates with the given names.
    pub fn with_failing_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing_names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Usage events recorded so far, oldest first.
    pub async fn usage(&self) -> Vec<TemplateUsage> {
        self.state.read().await.usage.clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.simulate_failure {
            return Err(StoreError::Backend("simulated failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn fetch_templates(
        &self,
        category: Option<TemplateCategory>,
    ) -> Result<Vec<EmailTemplate>, StoreError> {
        self.check()?;
        let state = self.state.read().await;
        let mut templates: Vec<EmailTemplate> = state
            .templates
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .cloned()
            .collect();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    async fn get_template(&self, id: &str) -> Result<Option<EmailTemplate>, StoreError> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.templates.iter().find(|t| t.id == id).cloned())
    }

    async fn create_template(&self, template: NewTemplate) -> Result<EmailTemplate, StoreError> {
        self.check()?;
        if self.failing_names.contains(&template.name) {
            return Err(StoreError::Backend(format!(
                "simulated failure for {}",
                template.name
            )));
        }

        let now = Utc::now();
        let layout_type = template.resolved_layout_type();
        let created = EmailTemplate {
            id: Uuid::new_v4().to_string(),
            name: template.name,
            category: template.category,
            layout_type: Some(layout_type),
            layout_style: template.layout_style,
            description: template.description,
            html_template: template.html_template,
            thumbnail_url: template.thumbnail_url,
            is_system: false,
            is_favorite: false,
            config: template.config,
            user_id: template.user_id,
            created_at: now,
            updated_at: now,
            style_tags: template.style_tags,
            theme_mode: template.theme_mode,
            output_formats: template.output_formats,
            quick_share_template: template.quick_share_template,
            last_used_at: None,
            add_on_type: template.add_on_type,
            parent_event_id: template.parent_event_id,
        };

        self.state.write().await.templates.push(created.clone());
        Ok(created)
    }

    async fn update_template(
        &self,
        id: &str,
        changes: TemplateChanges,
    ) -> Result<EmailTemplate, StoreError> {
        self.check()?;
        let mut state = self.state.write().await;
        let template = state
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        changes.apply_to(template);
        template.updated_at = Utc::now();
        Ok(template.clone())
    }

    async fn delete_template(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.templates.len();
        state.templates.retain(|t| t.id != id);
        if state.templates.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn track_usage(
        &self,
        id: &str,
        output_format: OutputFormat,
        event_id: Option<String>,
    ) -> Result<(), StoreError> {
        self.check()?;
        let mut state = self.state.write().await;
        let usage = TemplateUsage::now(id, output_format, event_id);
        if let Some(template) = state.templates.iter_mut().find(|t| t.id == id) {
            template.last_used_at = Some(usage.used_at);
        }
        state.usage.push(usage);
        Ok(())
    }
}
