//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod template;
pub mod usage;

pub use template::TemplateEntity;
pub use usage::TemplateUsageEntity;
