//! Template usage entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{OutputFormat, TemplateUsage};

/// Database row mapping for the template_usage table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateUsageEntity {
    pub id: i64,
    pub template_id: Uuid,
    pub output_format: String,
    pub event_id: Option<String>,
    pub used_at: DateTime<Utc>,
}

impl From<TemplateUsageEntity> for TemplateUsage {
    fn from(entity: TemplateUsageEntity) -> Self {
        Self {
            template_id: entity.template_id.to_string(),
            output_format: entity.output_format.parse().unwrap_or(OutputFormat::Email),
            event_id: entity.event_id,
            used_at: entity.used_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_entity_to_domain() {
        let entity = TemplateUsageEntity {
            id: 7,
            template_id: Uuid::new_v4(),
            output_format: "website_card".to_string(),
            event_id: Some("evt-42".to_string()),
            used_at: Utc::now(),
        };
        let usage: TemplateUsage = entity.clone().into();
        assert_eq!(usage.template_id, entity.template_id.to_string());
        assert_eq!(usage.output_format, OutputFormat::WebsiteCard);
        assert_eq!(usage.event_id.as_deref(), Some("evt-42"));
    }
}
