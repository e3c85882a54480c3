//! Domain layer for the Event Weaver backend.
//!
//! This crate contains:
//! - Template models (EmailTemplate, TemplateConfig, import candidates)
//! - The HTML/JSON template import pipeline
//! - The system template catalog and the template store abstraction

#[macro_use]
pub mod models;
pub mod services;
