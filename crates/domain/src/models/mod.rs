//! Domain models for Event Weaver.

/// Declares a closed string enum with `as_str`, `Display`, `FromStr` and
/// serde support, all driven by the same wire values.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(concat!("Unknown ", $kind, ": {}"), s)),
                }
            }
        }
    };
}

pub mod import;
pub mod template;
pub mod template_config;
pub mod usage;

pub use import::{
    BulkImportOutcome, BulkImportReport, ImportFormat, ImportOutcomeStatus, ImportSummary,
    ImportableTemplate, ParsedTemplate, ValidationResult,
};
pub use template::{
    AddOnType, EmailTemplate, GroupLayoutStyle, LayoutType, NewTemplate, OutputFormat,
    OutputFormats, TemplateCategory, TemplateChanges, ThemeMode,
};
pub use template_config::TemplateConfig;
pub use usage::TemplateUsage;
