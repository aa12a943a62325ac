//! # vigil-theme: Design Token Validation
//!
//! Validates a theme document's `tokens` tree: required tokens per category,
//! kebab/dot token names, value formats for colors and lengths, contrast
//! between text and background colors, and token-count and duplicate
//! checks. Contrast reuses the luminance computation from `vigil-a11y`.

pub mod config;
pub mod tokens;
pub mod validator;

pub use config::ThemeConfig;
pub use tokens::{flatten_tokens, is_valid_token_name, TokenFormat, TokenMap};
pub use validator::{is_theme, report_to_result, ThemeValidator, THEME_RULE_ID};
