//! HTTP route handlers.

pub mod colors;
pub mod health;
pub mod imports;
pub mod templates;
