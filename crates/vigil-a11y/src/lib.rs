//! # vigil-a11y: Accessibility Validation
//!
//! Runs WCAG-style rules over UI element trees and produces an
//! [`A11yReport`](vigil_core::a11y::A11yReport).
//!
//! ## Rule set
//!
//! | Rule | Level | Checks |
//! |---|---|---|
//! | `wcag_1_1_1` | A | Images have alt text |
//! | `wcag_1_3_1` | A | Headings do not skip levels |
//! | `wcag_1_4_3` | AA | Text contrast reaches 4.5:1 (3:1 when large) |
//! | `wcag_2_1_1` | A | Interactive elements are focusable and keyboard operable |
//! | `wcag_2_4_1` | A | Pages with repeated controls have a bypass block |
//! | `wcag_3_1_1` | A | The root document declares its language |
//! | `wcag_4_1_1` | A | Element ids are unique |
//! | `wcag_4_1_2` | A | Explicit roles are valid |
//! | `form_labels` | A | Form controls are labelled |
//! | `button_accessible` | A | Buttons have an accessible name |
//!
//! Contrast uses the sRGB relative luminance formula in [`color`], which
//! the theme validator reuses for its token pairs.

pub mod checks;
pub mod color;
pub mod config;
pub mod element;
pub mod error;
pub mod validator;

pub use checks::{A11yCheck, Finding, FindingKind};
pub use color::{contrast_ratio, parse_color, Rgb};
pub use config::{A11yConfig, ContrastConfig};
pub use element::{Element, ElementTree};
pub use error::A11yError;
pub use validator::{report_to_result, A11yRule, AccessibilityValidator, A11Y_RULE_ID};
