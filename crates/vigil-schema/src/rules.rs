//! # Built-in Schema Rules
//!
//! Each rule is a unit struct implementing [`SchemaRuleValidator`]. Rules
//! are independent: every enabled rule sees every document and decides for
//! itself whether the document concerns it. A rule handed a document of a
//! kind it does not inspect returns an empty report.

use regex::Regex;

use crate::document::{
    DocumentKind, FieldSchema, FormSchema, SchemaDocument, ThemeSchema, FIELD_TYPES,
};
use crate::report::{SchemaCategory, SchemaError, SchemaReport, SchemaSuggestion, SchemaWarning};

/// Rule id: form id/type/title.
pub const FORM_STRUCTURE: &str = "form.schema.structure";
/// Rule id: form field list and per-field name/type.
pub const FORM_FIELDS: &str = "form.schema.fields";
/// Rule id: balance of required fields.
pub const FORM_REQUIRED: &str = "form.schema.required";
/// Rule id: field type is a supported type.
pub const FIELD_TYPE: &str = "field.schema.type";
/// Rule id: field validation is self-consistent.
pub const FIELD_VALIDATION: &str = "field.schema.validation";
/// Rule id: theme tokens are present.
pub const THEME_TOKENS: &str = "theme.schema.tokens";
/// Rule id: theme metadata is present.
pub const THEME_CONSISTENCY: &str = "theme.schema.consistency";

// ---------------------------------------------------------------------------
// Context and capability
// ---------------------------------------------------------------------------

/// Path-tracking context handed to every rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaContext {
    path: String,
}

impl SchemaContext {
    /// Context at the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Descend into `segment`.
    pub fn child(&self, segment: &str) -> Self {
        Self {
            path: self.path_to(segment),
        }
    }

    /// Descend into element `i` of the current sequence.
    pub fn index(&self, i: usize) -> Self {
        Self {
            path: format!("{}[{i}]", self.path),
        }
    }

    /// The current dotted path; empty at the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path of `leaf` under the current position.
    pub fn path_to(&self, leaf: &str) -> String {
        if self.path.is_empty() {
            leaf.to_string()
        } else {
            format!("{}.{leaf}", self.path)
        }
    }
}

/// A pluggable schema rule.
pub trait SchemaRuleValidator: Send + Sync {
    /// Inspect `document` at `ctx`.
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport;

    /// The category the rule belongs to.
    fn category(&self) -> SchemaCategory;
}

/// Builds findings stamped with one rule's id and category.
struct Findings {
    rule: &'static str,
    category: SchemaCategory,
    report: SchemaReport,
}

impl Findings {
    fn new(rule: &'static str, category: SchemaCategory) -> Self {
        Self {
            rule,
            category,
            report: SchemaReport::ok(),
        }
    }

    fn error(&mut self, code: &str, message: impl Into<String>, path: String, suggestion: &str) {
        self.report.add_error(SchemaError {
            code: code.into(),
            message: message.into(),
            path,
            category: self.category,
            rule: self.rule.into(),
            value: None,
            suggestion: (!suggestion.is_empty()).then(|| suggestion.to_string()),
        });
    }

    fn warning(&mut self, code: &str, message: impl Into<String>, path: String, suggestion: &str) {
        self.report.add_warning(SchemaWarning {
            code: code.into(),
            message: message.into(),
            path,
            category: self.category,
            rule: self.rule.into(),
            suggestion: (!suggestion.is_empty()).then(|| suggestion.to_string()),
        });
    }

    fn suggestion(&mut self, code: &str, message: impl Into<String>, path: String, fix: String) {
        self.report.add_suggestion(SchemaSuggestion {
            code: code.into(),
            message: message.into(),
            path,
            suggestion: fix,
            auto_fix: true,
            category: self.category,
            rule: self.rule.into(),
        });
    }

    fn malformed(&mut self, kind: DocumentKind, reason: &str, ctx: &SchemaContext) {
        self.error(
            &format!("{kind}.structure.invalid_type"),
            format!("Value looks like a {kind} schema but cannot be read as one: {reason}"),
            ctx.path().to_string(),
            "",
        );
    }

    fn finish(self) -> SchemaReport {
        self.report
    }
}

// ---------------------------------------------------------------------------
// Form rules
// ---------------------------------------------------------------------------

/// Form id and type are required; a title is recommended.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormStructureRule;

impl SchemaRuleValidator for FormStructureRule {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut f = Findings::new(FORM_STRUCTURE, SchemaCategory::Form);
        match document {
            SchemaDocument::Form(form) => {
                if form.id.is_empty() {
                    f.error(
                        "form.structure.missing_id",
                        "Form schema must have a valid ID",
                        ctx.path_to("id"),
                        "Add a unique ID to the form schema",
                    );
                }
                if form.schema_type.is_empty() {
                    f.error(
                        "form.structure.missing_type",
                        "Form schema must have a valid type",
                        ctx.path_to("type"),
                        "Add a type such as 'form' to the schema",
                    );
                }
                if form.title.is_empty() {
                    f.warning(
                        "form.structure.missing_title",
                        "Form schema should have a title",
                        ctx.path_to("title"),
                        "Add a descriptive title to the form schema",
                    );
                }
            }
            SchemaDocument::Malformed {
                kind: DocumentKind::Form,
                reason,
            } => f.malformed(DocumentKind::Form, reason, ctx),
            _ => {}
        }
        f.finish()
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Form
    }
}

/// A form should declare fields, and each field needs a name and a type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormFieldsRule;

impl SchemaRuleValidator for FormFieldsRule {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut f = Findings::new(FORM_FIELDS, SchemaCategory::Form);
        let SchemaDocument::Form(form) = document else {
            return f.finish();
        };

        let fields_ctx = ctx.child("fields");
        if form.fields.is_empty() {
            f.warning(
                "form.fields.empty",
                "Form schema has no fields defined",
                fields_ctx.path().to_string(),
                "Add field definitions to make the form functional",
            );
        }

        for (i, field) in form.fields.iter().enumerate() {
            let field_ctx = fields_ctx.index(i);
            if field.name.is_empty() {
                f.error(
                    "field.missing_name",
                    "Field must have a name",
                    field_ctx.path_to("name"),
                    "Add a unique name to the field",
                );
            }
            if field.field_type.is_empty() {
                f.error(
                    "field.missing_type",
                    "Field must have a type",
                    field_ctx.path_to("type"),
                    "Add a field type such as text, email, or number",
                );
            }
            if field.label.is_empty() && !field.name.is_empty() {
                f.suggestion(
                    "field.label.missing",
                    format!("Field '{}' has no label", field.name),
                    field_ctx.path_to("label"),
                    format!("Set label to \"{}\"", humanize(&field.name)),
                );
            }
        }
        f.finish()
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Form
    }
}

/// `first_name` and `firstName` become `First name`.
fn humanize(name: &str) -> String {
    let mut words = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c == '_' || c == '-' {
            words.push(' ');
        } else if c.is_uppercase() && i > 0 {
            words.push(' ');
            words.extend(c.to_lowercase());
        } else if i == 0 {
            words.extend(c.to_uppercase());
        } else {
            words.push(c);
        }
    }
    words
}

/// Warns when no field, or every field of a larger form, is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFieldsRule;

impl SchemaRuleValidator for RequiredFieldsRule {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut f = Findings::new(FORM_REQUIRED, SchemaCategory::Form);
        let SchemaDocument::Form(form) = document else {
            return f.finish();
        };

        let total = form.fields.len();
        let required = form.fields.iter().filter(|field| field.required).count();

        if total > 0 && required == 0 {
            f.warning(
                "form.required.none",
                "Form has no required fields",
                ctx.path().to_string(),
                "Consider making the important fields required",
            );
        }
        if total > 3 && required == total {
            f.warning(
                "form.required.all",
                "All fields are required",
                ctx.path().to_string(),
                "Consider making some fields optional",
            );
        }
        f.finish()
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Form
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Each field, standalone or inside a form, in document order with its context.
fn fields_of<'a>(
    document: &'a SchemaDocument,
    ctx: &SchemaContext,
) -> Vec<(&'a FieldSchema, SchemaContext)> {
    match document {
        SchemaDocument::Field(field) => vec![(field, ctx.clone())],
        SchemaDocument::Form(FormSchema { fields, .. }) => {
            let fields_ctx = ctx.child("fields");
            fields
                .iter()
                .enumerate()
                .map(|(i, field)| (field, fields_ctx.index(i)))
                .collect()
        }
        _ => Vec::new(),
    }
}

/// A field's type must be one of [`FIELD_TYPES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldTypeRule;

impl SchemaRuleValidator for FieldTypeRule {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut f = Findings::new(FIELD_TYPE, SchemaCategory::Field);

        if let SchemaDocument::Malformed {
            kind: DocumentKind::Field,
            reason,
        } = document
        {
            f.malformed(DocumentKind::Field, reason, ctx);
            return f.finish();
        }

        if let SchemaDocument::Field(field) = document {
            if field.name.is_empty() {
                f.error(
                    "field.missing_name",
                    "Field must have a name",
                    ctx.path_to("name"),
                    "Add a unique name to the field",
                );
            }
            if field.field_type.is_empty() {
                f.error(
                    "field.missing_type",
                    "Field must have a type",
                    ctx.path_to("type"),
                    "Add a field type such as text, email, or number",
                );
            }
        }

        for (field, field_ctx) in fields_of(document, ctx) {
            let ty = field.field_type.as_str();
            if !ty.is_empty() && !FIELD_TYPES.contains(&ty) {
                f.report.add_error(SchemaError {
                    code: "field.type.invalid".into(),
                    message: format!("Invalid field type: {ty}"),
                    path: field_ctx.path_to("type"),
                    category: SchemaCategory::Field,
                    rule: FIELD_TYPE.into(),
                    value: Some(ty.into()),
                    suggestion: Some(format!("Use one of: {}", FIELD_TYPES.join(", "))),
                });
            }
        }
        f.finish()
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Field
    }
}

/// A field's validation bounds must be ordered and its pattern must compile.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidationRule;

impl SchemaRuleValidator for FieldValidationRule {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut f = Findings::new(FIELD_VALIDATION, SchemaCategory::Field);

        for (field, field_ctx) in fields_of(document, ctx) {
            let Some(validation) = &field.validation else {
                continue;
            };
            let path = field_ctx.path_to("validation");

            if let (Some(min), Some(max)) = (validation.min_length, validation.max_length) {
                if min > max {
                    f.error(
                        "field.validation.length_conflict",
                        format!("minLength ({min}) cannot be greater than maxLength ({max})"),
                        path.clone(),
                        "Ensure minLength is less than or equal to maxLength",
                    );
                }
            }
            if let (Some(min), Some(max)) = (validation.min, validation.max) {
                if min > max {
                    f.error(
                        "field.validation.range_conflict",
                        format!("min ({min}) cannot be greater than max ({max})"),
                        path.clone(),
                        "Ensure min is less than or equal to max",
                    );
                }
            }
            if let Some(pattern) = &validation.pattern {
                if let Err(e) = Regex::new(pattern) {
                    f.error(
                        "field.validation.invalid_pattern",
                        format!("Pattern {pattern:?} does not compile: {e}"),
                        format!("{path}.pattern"),
                        "Fix the regular expression syntax",
                    );
                }
            }
        }
        f.finish()
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Field
    }
}

// ---------------------------------------------------------------------------
// Theme rules
// ---------------------------------------------------------------------------

/// A theme must define tokens and should define a `semantic` group.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeTokensRule;

impl SchemaRuleValidator for ThemeTokensRule {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut f = Findings::new(THEME_TOKENS, SchemaCategory::Theme);
        match document {
            SchemaDocument::Theme(ThemeSchema { tokens: None, .. }) => {
                f.error(
                    "theme.tokens.missing",
                    "Theme must have design tokens defined",
                    ctx.path_to("tokens"),
                    "Define design tokens for colors, typography, and spacing",
                );
            }
            SchemaDocument::Theme(theme) if !theme.has_semantic_tokens() => {
                f.warning(
                    "theme.tokens.semantic_missing",
                    "Theme should have semantic tokens",
                    ctx.child("tokens").path_to("semantic"),
                    "Add semantic tokens such as primary, secondary, and background",
                );
            }
            SchemaDocument::Malformed {
                kind: DocumentKind::Theme,
                reason,
            } => f.malformed(DocumentKind::Theme, reason, ctx),
            _ => {}
        }
        f.finish()
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Theme
    }
}

/// A theme should carry a name and a version.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeConsistencyRule;

impl SchemaRuleValidator for ThemeConsistencyRule {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut f = Findings::new(THEME_CONSISTENCY, SchemaCategory::Theme);
        let SchemaDocument::Theme(theme) = document else {
            return f.finish();
        };
        if theme.name.is_empty() {
            f.warning(
                "theme.consistency.missing_name",
                "Theme should have a descriptive name",
                ctx.path_to("name"),
                "Add a name that identifies the theme",
            );
        }
        if theme.version.is_empty() {
            f.warning(
                "theme.consistency.missing_version",
                "Theme should have a version",
                ctx.path_to("version"),
                "Add a semantic version such as '1.0.0'",
            );
        }
        f.finish()
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Theme
    }
}
