//! Shared utilities for the Event Weaver backend.
//!
//! This crate provides functionality used across the other crates:
//! - Color math (WCAG luminance, contrast, HSL conversion)
//! - Common field validators for template payloads

pub mod color;
pub mod validation;
