//! Template usage events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::template::OutputFormat;

/// One render of a template into an output channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateUsage {
    pub template_id: String,
    pub output_format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub used_at: DateTime<Utc>,
}

impl TemplateUsage {
    pub fn now(
        template_id: impl Into<String>,
        output_format: OutputFormat,
        event_id: Option<String>,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            output_format,
            event_id,
            used_at: Utc::now(),
        }
    }
}
