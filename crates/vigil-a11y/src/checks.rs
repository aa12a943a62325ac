//! # Accessibility Checks
//!
//! One [`A11yCheck`] per rule. A check sees the whole flattened element
//! tree so that tree-level rules (heading order, duplicate ids, bypass
//! blocks) need no second walk. Checks report untagged [`Finding`]s; the
//! validator stamps rule id, category, standard, and level onto them.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::trace;
use vigil_core::a11y::{A11yCategory, A11yImpact, WcagLevel};
use vigil_core::value::as_number;

use crate::color::parse_color;
use crate::config::A11yConfig;
use crate::element::{Element, ElementTree};

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// Whether a finding is a violation or a best-practice warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// Error-equivalent, with severity.
    Violation(A11yImpact),
    /// Advisory.
    Warning,
}

/// A single check result, before it is attributed to a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Violation or warning.
    pub kind: FindingKind,
    /// Stable code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Element description.
    pub element: String,
    /// Element path.
    pub path: String,
    /// Remediation hint.
    pub fix: Option<String>,
    /// Level override; defaults to the rule's level.
    pub level: Option<WcagLevel>,
}

impl Finding {
    fn at(kind: FindingKind, code: &str, message: impl Into<String>, tree: &ElementTree<'_>, el: &Element<'_>) -> Self {
        Self {
            kind,
            code: code.to_string(),
            message: message.into(),
            element: el.describe(),
            path: tree.path(el).to_string(),
            fix: None,
            level: None,
        }
    }

    fn violation(
        impact: A11yImpact,
        code: &str,
        message: impl Into<String>,
        tree: &ElementTree<'_>,
        el: &Element<'_>,
    ) -> Self {
        Self::at(FindingKind::Violation(impact), code, message, tree, el)
    }

    fn warning(code: &str, message: impl Into<String>, tree: &ElementTree<'_>, el: &Element<'_>) -> Self {
        Self::at(FindingKind::Warning, code, message, tree, el)
    }

    fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    fn with_level(mut self, level: WcagLevel) -> Self {
        self.level = Some(level);
        self
    }
}

/// Implementation of one accessibility rule.
pub trait A11yCheck: Send + Sync {
    /// Inspect the tree.
    fn check(&self, tree: &ElementTree<'_>, config: &A11yConfig) -> Vec<Finding>;

    /// WCAG principle the rule belongs to.
    fn category(&self) -> A11yCategory;
}

// ---------------------------------------------------------------------------
// Element classification
// ---------------------------------------------------------------------------

const NATIVE_INTERACTIVE: &[&str] = &["button", "input", "select", "textarea", "a", "link"];
const CLICK_HANDLERS: &[&str] = &["onClick", "onclick", "onPress"];
const KEY_HANDLERS: &[&str] = &["onKeyDown", "onKeyPress", "onKeyUp", "onkeydown", "onkeypress", "onkeyup"];
const FORM_CONTROLS: &[&str] = &["input", "select", "textarea"];

/// WAI-ARIA 1.2 roles, abstract roles excluded.
const ARIA_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote", "button", "caption",
    "cell", "checkbox", "code", "columnheader", "combobox", "complementary", "contentinfo",
    "definition", "deletion", "dialog", "directory", "document", "emphasis", "feed", "figure",
    "form", "generic", "grid", "gridcell", "group", "heading", "img", "insertion", "link", "list",
    "listbox", "listitem", "log", "main", "marquee", "math", "menu", "menubar", "menuitem",
    "menuitemcheckbox", "menuitemradio", "meter", "navigation", "none", "note", "option",
    "paragraph", "presentation", "progressbar", "radio", "radiogroup", "region", "row",
    "rowgroup", "rowheader", "scrollbar", "search", "searchbox", "separator", "slider",
    "spinbutton", "status", "strong", "subscript", "superscript", "switch", "tab", "table",
    "tablist", "tabpanel", "term", "textbox", "time", "timer", "toolbar", "tooltip", "tree",
    "treegrid", "treeitem",
];

fn type_is(el: &Element<'_>, names: &[&str]) -> bool {
    names.iter().any(|n| el.type_name.eq_ignore_ascii_case(n))
}

fn has_any_prop(el: &Element<'_>, names: &[&str]) -> bool {
    names.iter().any(|n| el.has_prop(n))
}

fn is_interactive(el: &Element<'_>) -> bool {
    type_is(el, NATIVE_INTERACTIVE) || has_any_prop(el, CLICK_HANDLERS)
}

fn is_image(el: &Element<'_>) -> bool {
    type_is(el, &["image", "img"]) || el.type_name.to_ascii_lowercase().contains("image")
}

fn heading_level(el: &Element<'_>) -> Option<u32> {
    let name = el.type_name.to_ascii_lowercase();
    if let Some(n) = name.strip_prefix('h').and_then(|d| d.parse::<u32>().ok()) {
        return (1..=6).contains(&n).then_some(n);
    }
    if name == "heading" {
        let level = el.prop("level").and_then(as_number)?;
        return (level >= 1.0 && level <= 6.0).then(|| level as u32);
    }
    None
}

fn has_text_descendant(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => items.iter().any(has_text_descendant),
        Value::Object(map) => ["children", "text", "content"]
            .iter()
            .filter_map(|k| map.get(*k))
            .chain(map.get("props").and_then(|p| p.get("children")))
            .any(has_text_descendant),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// 1.1.1 Non-text content
// ---------------------------------------------------------------------------

/// Images carry alternative text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AltTextCheck;

impl A11yCheck for AltTextCheck {
    fn check(&self, tree: &ElementTree<'_>, config: &A11yConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for el in tree.elements().iter().filter(|el| is_image(el)) {
            trace!(path = %tree.path(el), "checking alt text");
            match el.non_empty_prop("alt") {
                None => findings.push(
                    Finding::violation(
                        A11yImpact::Serious,
                        "missing_alt_text",
                        "Image is missing alternative text",
                        tree,
                        el,
                    )
                    .with_fix("Add an alt prop describing the image"),
                ),
                Some(alt) if alt.chars().count() > config.alt_text_max_length => findings.push(
                    Finding::warning(
                        "alt_text_too_long",
                        format!(
                            "Alternative text is {} characters; keep it under {}",
                            alt.chars().count(),
                            config.alt_text_max_length
                        ),
                        tree,
                        el,
                    )
                    .with_fix("Move long descriptions into surrounding text or aria-describedby"),
                ),
                Some(_) => {}
            }
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Perceivable
    }
}

// ---------------------------------------------------------------------------
// 1.3.1 Info and relationships
// ---------------------------------------------------------------------------

/// Headings descend one level at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingOrderCheck;

impl A11yCheck for HeadingOrderCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut previous: Option<u32> = None;
        for el in tree.elements() {
            let Some(level) = heading_level(el) else { continue };
            if let Some(prev) = previous {
                if level > prev + 1 {
                    findings.push(
                        Finding::violation(
                            A11yImpact::Moderate,
                            "heading_level_skipped",
                            format!("Heading level jumps from h{prev} to h{level}"),
                            tree,
                            el,
                        )
                        .with_fix(format!("Use h{} here or restructure the outline", prev + 1)),
                    );
                }
            }
            previous = Some(level);
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Perceivable
    }
}

// ---------------------------------------------------------------------------
// 1.4.3 Contrast (minimum)
// ---------------------------------------------------------------------------

/// Font size in points. Pixels convert at 0.75pt/px; em and rem assume a
/// 12pt base. A bare number is taken as points.
fn font_size_pt(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_f64() {
        return Some(n);
    }
    let s = value.as_str()?.trim().to_ascii_lowercase();
    let (number, factor) = if let Some(n) = s.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix("px") {
        (n, 0.75)
    } else if let Some(n) = s.strip_suffix("rem").or_else(|| s.strip_suffix("em")) {
        (n, 12.0)
    } else {
        (s.as_str(), 1.0)
    };
    number.trim().parse::<f64>().ok().map(|n| n * factor)
}

fn is_bold(el: &Element<'_>) -> bool {
    match el.style("fontWeight") {
        Some(Value::String(s)) => {
            matches!(s.as_str(), "bold" | "bolder") || s.parse::<f64>().is_ok_and(|w| w >= 700.0)
        }
        Some(v) => as_number(v).is_some_and(|w| w >= 700.0),
        None => false,
    }
}

/// Large text is at least 18pt, or at least 14pt and bold.
fn is_large_text(el: &Element<'_>) -> bool {
    match el.style("fontSize").and_then(font_size_pt) {
        Some(pt) => pt >= 18.0 || (pt >= 14.0 && is_bold(el)),
        None => false,
    }
}

/// Foreground and background colors reach the minimum contrast ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastCheck;

impl A11yCheck for ContrastCheck {
    fn check(&self, tree: &ElementTree<'_>, config: &A11yConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for el in tree.elements() {
            let (Some(fg), Some(bg)) = (el.style_str("color"), el.style_str("backgroundColor")) else {
                continue;
            };
            let (fg_rgb, bg_rgb) = match (parse_color(fg), parse_color(bg)) {
                (Ok(f), Ok(b)) => (f, b),
                (Err(e), _) | (_, Err(e)) => {
                    findings.push(Finding::warning(
                        "unparseable_color",
                        format!("Contrast could not be checked: {e}"),
                        tree,
                        el,
                    ));
                    continue;
                }
            };

            let ratio = fg_rgb.contrast_ratio(&bg_rgb);
            let large = is_large_text(el);
            let minimum = if large {
                config.contrast.min_large
            } else {
                config.contrast.min_normal
            };
            trace!(path = %tree.path(el), ratio, minimum, large, "checking contrast");

            if ratio < minimum {
                findings.push(
                    Finding::violation(
                        A11yImpact::Serious,
                        "insufficient_contrast",
                        format!("Contrast ratio {ratio:.2}:1 is below the required {minimum}:1"),
                        tree,
                        el,
                    )
                    .with_fix(format!("Adjust {fg} or {bg} to reach at least {minimum}:1")),
                );
            } else if ratio < config.contrast.min_enhanced {
                findings.push(
                    Finding::warning(
                        "contrast_aaa_recommended",
                        format!(
                            "Contrast ratio {ratio:.2}:1 meets AA; {}:1 is recommended",
                            config.contrast.min_enhanced
                        ),
                        tree,
                        el,
                    )
                    .with_level(WcagLevel::AAA),
                );
            }
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Perceivable
    }
}

// ---------------------------------------------------------------------------
// 2.1.1 Keyboard
// ---------------------------------------------------------------------------

/// Interactive elements are reachable and operable by keyboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardCheck;

impl A11yCheck for KeyboardCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for el in tree.elements().iter().filter(|el| is_interactive(el)) {
            let native = type_is(el, NATIVE_INTERACTIVE);
            let focusable = match el.tab_index() {
                Some(index) => index >= 0.0,
                None => native,
            };
            if !focusable {
                findings.push(
                    Finding::violation(
                        A11yImpact::Serious,
                        "not_focusable",
                        "Interactive element cannot receive keyboard focus",
                        tree,
                        el,
                    )
                    .with_fix("Use a native control or add tabIndex=0"),
                );
            }
            if !has_any_prop(el, KEY_HANDLERS) {
                findings.push(
                    Finding::warning(
                        "missing_keyboard_handlers",
                        "Click handler has no keyboard equivalent",
                        tree,
                        el,
                    )
                    .with_fix("Handle Enter and Space in onKeyDown"),
                );
            }
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Operable
    }
}

// ---------------------------------------------------------------------------
// 2.4.1 Bypass blocks
// ---------------------------------------------------------------------------

/// Pages with repeated interactive content offer a way to skip it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BypassBlocksCheck;

const BYPASS_THRESHOLD: usize = 3;

impl A11yCheck for BypassBlocksCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        let elements = tree.elements();
        let interactive = elements.iter().filter(|el| is_interactive(el)).count();
        if interactive < BYPASS_THRESHOLD {
            return Vec::new();
        }
        let has_bypass = elements.iter().any(|el| {
            type_is(el, &["skip-link", "main"])
                || matches!(el.prop_str("role"), Some("main"))
                || el.prop_str("href").is_some_and(|h| h == "#main" || h == "#content")
        });
        match (has_bypass, elements.first()) {
            (false, Some(root)) => vec![Finding::warning(
                "missing_bypass_block",
                format!("{interactive} interactive elements but no skip link or main landmark"),
                tree,
                root,
            )
            .with_fix("Add a skip-link to the main content or a main landmark")],
            _ => Vec::new(),
        }
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Operable
    }
}

// ---------------------------------------------------------------------------
// 3.1.1 Language of page
// ---------------------------------------------------------------------------

/// Documents declare their language.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageCheck;

impl A11yCheck for LanguageCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        match tree.root() {
            Some(root) if type_is(root, &["html", "page"]) && root.non_empty_prop("lang").is_none() => {
                vec![Finding::violation(
                    A11yImpact::Serious,
                    "missing_language",
                    "Document does not declare its language",
                    tree,
                    root,
                )
                .with_fix("Add a lang prop, e.g. lang=\"en\"")]
            }
            _ => Vec::new(),
        }
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Understandable
    }
}

// ---------------------------------------------------------------------------
// 4.1.1 Parsing
// ---------------------------------------------------------------------------

/// Element ids are unique.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateIdCheck;

impl A11yCheck for DuplicateIdCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        let mut findings = Vec::new();
        for el in tree.elements() {
            let Some(id) = el.non_empty_prop("id") else { continue };
            match seen.get(id) {
                Some(first) => findings.push(Finding::violation(
                    A11yImpact::Moderate,
                    "duplicate_id",
                    format!("id \"{id}\" is already used at {first}"),
                    tree,
                    el,
                )),
                None => {
                    seen.insert(id, tree.path(el));
                }
            }
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Robust
    }
}

// ---------------------------------------------------------------------------
// 4.1.2 Name, role, value
// ---------------------------------------------------------------------------

/// Explicit roles are valid WAI-ARIA roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaRoleCheck;

impl A11yCheck for AriaRoleCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for el in tree.elements() {
            let Some(role) = el.prop_str("role") else { continue };
            // A role attribute may list fallbacks; the first recognised one wins.
            if role.split_whitespace().any(|r| ARIA_ROLES.contains(&r)) {
                continue;
            }
            findings.push(
                Finding::violation(
                    A11yImpact::Serious,
                    "invalid_aria_role",
                    format!("\"{role}\" is not a valid ARIA role"),
                    tree,
                    el,
                )
                .with_fix("Use a role from the WAI-ARIA specification or remove it"),
            );
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Robust
    }
}

// ---------------------------------------------------------------------------
// Form labels
// ---------------------------------------------------------------------------

/// Form controls have an accessible label.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormLabelCheck;

impl A11yCheck for FormLabelCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        let labelled_ids: Vec<&str> = tree
            .elements()
            .iter()
            .filter(|el| type_is(el, &["label"]))
            .filter_map(|el| el.non_empty_prop("htmlFor").or_else(|| el.non_empty_prop("for")))
            .collect();

        let mut findings = Vec::new();
        for el in tree.elements().iter().filter(|el| type_is(el, FORM_CONTROLS)) {
            if el.prop_str("type") == Some("hidden") {
                continue;
            }
            let labelled = ["label", "aria-label", "aria-labelledby"]
                .iter()
                .any(|p| el.non_empty_prop(p).is_some())
                || el.non_empty_prop("id").is_some_and(|id| labelled_ids.contains(&id));
            if !labelled {
                findings.push(
                    Finding::violation(
                        A11yImpact::Serious,
                        "missing_form_label",
                        "Form control has no accessible label",
                        tree,
                        el,
                    )
                    .with_fix("Add a label, aria-label, or a label element pointing at its id"),
                );
            }
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Understandable
    }
}

// ---------------------------------------------------------------------------
// Button names
// ---------------------------------------------------------------------------

/// Buttons have an accessible name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonNameCheck;

impl A11yCheck for ButtonNameCheck {
    fn check(&self, tree: &ElementTree<'_>, _config: &A11yConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for el in tree.elements().iter().filter(|el| type_is(el, &["button"])) {
            let named = ["label", "text", "aria-label", "aria-labelledby", "title"]
                .iter()
                .any(|p| el.non_empty_prop(p).is_some())
                || !el.text_content().trim().is_empty()
                || el.value.get("children").is_some_and(has_text_descendant);
            if !named {
                findings.push(
                    Finding::violation(
                        A11yImpact::Critical,
                        "button_missing_name",
                        "Button has no accessible name",
                        tree,
                        el,
                    )
                    .with_fix("Give the button visible text or an aria-label"),
                );
            }
        }
        findings
    }

    fn category(&self) -> A11yCategory {
        A11yCategory::Robust
    }
}
