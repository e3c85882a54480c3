//! Email template entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{EmailTemplate, OutputFormats, TemplateCategory, TemplateConfig};

/// Database row mapping for the email_templates table.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateEntity {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub layout_type: Option<String>,
    pub layout_style: Option<String>,
    pub description: Option<String>,
    pub html_template: String,
    pub thumbnail_url: Option<String>,
    pub config: serde_json::Value,
    pub is_favorite: bool,
    pub user_id: Option<String>,
    pub style_tags: Vec<String>,
    pub theme_mode: Option<String>,
    pub output_formats: Option<serde_json::Value>,
    pub quick_share_template: Option<String>,
    pub add_on_type: Option<String>,
    pub parent_event_id: Option<String>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored config merged over the defaults, so rows written by older
/// versions still produce a complete config.
fn config_from_column(value: serde_json::Value) -> TemplateConfig {
    match value {
        serde_json::Value::Object(map) => TemplateConfig::merge_with_defaults(&map).config,
        _ => TemplateConfig::default(),
    }
}

impl From<TemplateEntity> for EmailTemplate {
    fn from(entity: TemplateEntity) -> Self {
        let category = entity.category.parse().unwrap_or_else(|_| {
            tracing::warn!(
                template_id = %entity.id,
                category = %entity.category,
                "Stored template has an unknown category"
            );
            TemplateCategory::General
        });

        Self {
            id: entity.id.to_string(),
            name: entity.name,
            category,
            layout_type: entity.layout_type.and_then(|v| v.parse().ok()),
            layout_style: entity.layout_style.and_then(|v| v.parse().ok()),
            description: entity.description,
            html_template: entity.html_template,
            thumbnail_url: entity.thumbnail_url,
            is_system: false,
            is_favorite: entity.is_favorite,
            config: config_from_column(entity.config),
            user_id: entity.user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            style_tags: entity.style_tags,
            theme_mode: entity.theme_mode.and_then(|v| v.parse().ok()),
            output_formats: entity
                .output_formats
                .and_then(|v| serde_json::from_value::<OutputFormats>(v).ok()),
            quick_share_template: entity.quick_share_template,
            last_used_at: entity.last_used_at,
            add_on_type: entity.add_on_type.and_then(|v| v.parse().ok()),
            parent_event_id: entity.parent_event_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{AddOnType, LayoutType, ThemeMode};
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use serde_json::json;

    fn create_test_entity() -> TemplateEntity {
        TemplateEntity {
            id: Uuid::new_v4(),
            name: "Lot Pass".to_string(),
            category: "parking".to_string(),
            layout_type: None,
            layout_style: None,
            description: Some(Sentence(3..6).fake()),
            html_template: "<div>{{lotName}}</div>".to_string(),
            thumbnail_url: None,
            config: json!({ "backgroundColor": "#111827", "padding": 12 }),
            is_favorite: true,
            user_id: None,
            style_tags: vec!["dark".to_string()],
            theme_mode: Some("dark".to_string()),
            output_formats: Some(json!({ "email": true, "website_card": false, "quick_share": true })),
            quick_share_template: None,
            add_on_type: Some("vip-parking".to_string()),
            parent_event_id: None,
            last_used_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let entity = create_test_entity();
        let id = entity.id;
        let template: EmailTemplate = entity.into();

        assert_eq!(template.id, id.to_string());
        assert_eq!(template.category, TemplateCategory::Parking);
        assert_eq!(template.layout_type, None);
        assert_eq!(template.effective_layout_type(), LayoutType::AddOn);
        assert_eq!(template.add_on_type, Some(AddOnType::VipParking));
        assert_eq!(template.theme_mode, Some(ThemeMode::Dark));
        assert!(!template.is_system);
        assert!(template.is_favorite);
        assert_eq!(template.config.background_color, "#111827");
        assert_eq!(template.config.padding, 12);
        assert_eq!(template.config.font_heading, TemplateConfig::default().font_heading);
        assert!(template.output_formats.is_some_and(|f| f.quick_share));
    }

    #[test]
    fn test_unknown_values_fall_back() {
        let mut entity = create_test_entity();
        entity.category = "retired-category".to_string();
        entity.layout_style = Some("zigzag".to_string());
        entity.config = json!(["not", "an", "object"]);
        let template: EmailTemplate = entity.into();

        assert_eq!(template.category, TemplateCategory::General);
        assert_eq!(template.layout_style, None);
        assert_eq!(template.config, TemplateConfig::default());
    }
}
