//! Repository implementations for database operations.

pub mod template;
pub mod usage;

pub use template::TemplateRepository;
pub use usage::UsageRepository;
