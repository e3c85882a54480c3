//! Domain services for Event Weaver.
//!
//! Services contain business logic that operates on domain models.

pub mod bulk_import;
pub mod catalog;
pub mod import;
pub mod template_store;

pub use bulk_import::import_selected;
pub use catalog::{CatalogError, GalleryFilter, GalleryTab, LayoutCounts, TemplateCatalog};
pub use import::{toggle_select, toggle_select_all, ImportHeuristics, ImportPipeline, ImportPreview};
pub use template_store::{track_usage_best_effort, InMemoryTemplateStore, StoreError, TemplateStore};
