//! # Component Validator
//!
//! Holds the schema table and validates instances against it. The table is
//! filled during a registration phase (`&mut self`) and read afterwards
//! through `&self`, so a single validator can be shared behind an `Arc`.
//!
//! Schemas are stored as `Arc<ComponentSchema>` so that cloning the
//! validator, which the engine does on copy-on-write re-registration, does
//! not deep-copy every schema.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use vigil_core::value::{is_callable, is_empty};
use vigil_core::{
    RuleCategory, ValidationContext, ValidationError, ValidationResult, ValidationRule,
    ValidationSource, ValidationWarning, Validator,
};

use crate::instance::{looks_like_instance, Child, ComponentInstance};
use crate::schema::{ChildrenSchema, ComponentSchema, CompositionSchema, PropSchema};
use crate::types::{check_constraints, check_type, PatternCache};

/// Rule id under which the component validator registers with the engine.
pub const COMPONENT_RULE_ID: &str = "component.structure";

/// Validates component instances against registered schemas.
#[derive(Debug, Clone, Default)]
pub struct ComponentValidator {
    schemas: IndexMap<String, Arc<ComponentSchema>>,
    patterns: PatternCache,
}

impl ComponentValidator {
    /// An empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under its name, returning the schema it replaced.
    pub fn register(&mut self, schema: ComponentSchema) -> Option<Arc<ComponentSchema>> {
        let name = schema.name.clone();
        self.patterns.add_schema(&schema);
        let previous = self.schemas.insert(name.clone(), Arc::new(schema));
        if previous.is_some() {
            debug!(component = %name, "component schema replaced");
        }
        previous
    }

    /// The schema registered for `name`.
    pub fn schema(&self, name: &str) -> Option<&ComponentSchema> {
        self.schemas.get(name).map(Arc::as_ref)
    }

    /// All registered schemas in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &ComponentSchema> {
        self.schemas.values().map(Arc::as_ref)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validate one instance.
    pub fn validate_component(&self, instance: &ComponentInstance) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let type_name = instance.type_name.as_str();

        let Some(schema) = self.schemas.get(type_name) else {
            result.add_error(attach(
                ValidationError::new(
                    "component.unknown",
                    format!("Unknown component type: {type_name}"),
                )
                .with_field("type")
                .with_component(type_name),
                instance,
            ));
            return result;
        };

        result.merge(self.validate_props(instance, &schema.props, schema.composition.as_ref(), true));

        if let Some(children) = &schema.children {
            result.merge(validate_children(instance, children));
        }

        if let Some(composition) = &schema.composition {
            result.merge(validate_composition(instance, composition));
        }

        if !schema.variants.is_empty() {
            result.merge(self.validate_variants(instance, schema));
        }

        result.set_metadata("component", Value::String(type_name.to_string()));
        debug!(
            component = %type_name,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "component validated"
        );
        result
    }

    fn validate_props(
        &self,
        instance: &ComponentInstance,
        declared: &IndexMap<String, PropSchema>,
        composition: Option<&CompositionSchema>,
        report_unknown: bool,
    ) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let type_name = instance.type_name.as_str();
        let props = &instance.props;

        for (name, prop) in declared {
            if prop.required && !props.contains_key(name) {
                result.add_error(attach(
                    ValidationError::new(
                        "prop.required",
                        format!("Required prop '{name}' is missing"),
                    )
                    .with_field(name)
                    .with_component(type_name),
                    instance,
                ));
            }
        }

        for (name, value) in props {
            let Some(prop) = declared.get(name) else {
                if report_unknown && !is_composition_prop(name, composition) {
                    result.add_warning(
                        ValidationWarning::new(
                            "prop.unknown",
                            format!("Unknown prop '{name}' for component {type_name}"),
                        )
                        .with_field(name)
                        .with_component(type_name),
                    );
                }
                continue;
            };

            if prop.deprecated {
                result.add_warning(
                    ValidationWarning::new("prop.deprecated", format!("Prop '{name}' is deprecated"))
                        .with_field(name)
                        .with_component(type_name),
                );
            }

            let mut errors = Vec::new();
            check_type(value, &prop.prop_type, name, &mut errors);
            if let Some(constraints) = &prop.validation {
                check_constraints(value, constraints, &self.patterns, name, &mut errors);
            }
            for error in errors {
                result.add_error(attach(error.with_component(type_name), instance));
            }

            for dependency in &prop.dependencies {
                if !props.contains_key(dependency) {
                    result.add_error(attach(
                        ValidationError::new(
                            "prop.dependency",
                            format!("Prop '{name}' requires prop '{dependency}' to be present"),
                        )
                        .with_field(name)
                        .with_component(type_name),
                        instance,
                    ));
                }
            }

            for conflict in &prop.conflicts {
                if props.contains_key(conflict) {
                    result.add_error(attach(
                        ValidationError::new(
                            "prop.conflict",
                            format!("Prop '{name}' cannot be used with prop '{conflict}'"),
                        )
                        .with_field(name)
                        .with_component(type_name),
                        instance,
                    ));
                }
            }
        }

        result
    }

    fn validate_variants(
        &self,
        instance: &ComponentInstance,
        schema: &ComponentSchema,
    ) -> ValidationResult {
        let mut result = ValidationResult::ok();

        let matched = schema.variants.iter().find(|(_, variant)| {
            variant.required.iter().all(|p| instance.has_prop(p))
                && !variant.forbidden.iter().any(|p| instance.has_prop(p))
        });

        if let Some((name, variant)) = matched {
            let mut variant_result = self.validate_props(instance, &variant.props, None, false);
            variant_result.warnings.clear();
            result.merge(variant_result);
            result.set_metadata("variant", Value::String(name.clone()));
        }

        result
    }
}

fn attach(error: ValidationError, instance: &ComponentInstance) -> ValidationError {
    match &instance.location {
        Some(location) => error.with_location(location.clone()),
        None => error,
    }
}

/// Props consumed by the composition contract rather than declared.
fn is_composition_prop(name: &str, composition: Option<&CompositionSchema>) -> bool {
    let Some(composition) = composition else {
        return false;
    };
    match name {
        "render" => composition.render.is_some(),
        "as" => composition.polymorphic,
        "asChild" => composition.as_child,
        _ => false,
    }
}

fn validate_children(instance: &ComponentInstance, schema: &ChildrenSchema) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let type_name = instance.type_name.as_str();
    let count = instance.children.len();

    let error = |code: &str, message: String| {
        attach(
            ValidationError::new(code, message)
                .with_field("children")
                .with_component(type_name),
            instance,
        )
    };

    if schema.required && count == 0 {
        result.add_error(error(
            "children.required",
            format!("Component {type_name} requires children"),
        ));
    }
    if let Some(min) = schema.min_count {
        if count < min {
            result.add_error(error(
                "children.min_count",
                format!("Component {type_name} requires at least {min} children, found {count}"),
            ));
        }
    }
    if let Some(max) = schema.max_count {
        if count > max {
            result.add_error(error(
                "children.max_count",
                format!("Component {type_name} allows at most {max} children, found {count}"),
            ));
        }
    }

    for (i, child) in instance.children.iter().enumerate() {
        match child {
            Child::Text(_) if !schema.allow_text => {
                result.add_error(
                    error(
                        "children.text",
                        format!("Component {type_name} does not accept text children"),
                    )
                    .with_field(format!("children[{i}]")),
                );
            }
            Child::Text(_) => {}
            Child::Instance(nested) => {
                if !schema.types.is_empty() && !schema.types.contains(&nested.type_name) {
                    result.add_error(
                        error(
                            "children.type",
                            format!(
                                "Child type '{}' is not allowed in component {type_name}",
                                nested.type_name
                            ),
                        )
                        .with_field(format!("children[{i}]"))
                        .with_value(Value::String(nested.type_name.clone())),
                    );
                }
            }
        }
    }

    result
}

fn validate_composition(
    instance: &ComponentInstance,
    composition: &CompositionSchema,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let type_name = instance.type_name.as_str();

    for (slot_name, slot) in &composition.slots {
        let field = format!("slots.{slot_name}");
        match instance.slots.get(slot_name) {
            Some(content) if !is_empty(content) => {
                if slot.types.is_empty() {
                    continue;
                }
                for found in slot_content_types(content) {
                    if !slot.types.iter().any(|t| t == found) {
                        result.add_error(attach(
                            ValidationError::new(
                                "slot.type",
                                format!("Slot '{slot_name}' does not accept content of type '{found}'"),
                            )
                            .with_field(field.clone())
                            .with_component(type_name)
                            .with_value(Value::String(found.to_string())),
                            instance,
                        ));
                    }
                }
            }
            _ if slot.required => {
                result.add_error(attach(
                    ValidationError::new(
                        "slot.required",
                        format!("Required slot '{slot_name}' is missing"),
                    )
                    .with_field(field)
                    .with_component(type_name),
                    instance,
                ));
            }
            _ => {}
        }
    }

    if let Some(render) = &composition.render {
        if render.required && !instance.props.get("render").map_or(false, is_callable) {
            result.add_error(attach(
                ValidationError::new(
                    "render.required",
                    format!("Component {type_name} requires a callable 'render' prop"),
                )
                .with_field("render")
                .with_component(type_name),
                instance,
            ));
        }
    }

    if instance.has_prop("as") && !composition.polymorphic {
        result.add_warning(
            ValidationWarning::new(
                "composition.not_polymorphic",
                format!("Component {type_name} is not polymorphic; 'as' is ignored"),
            )
            .with_field("as")
            .with_component(type_name),
        );
    }
    if instance.has_prop("asChild") && !composition.as_child {
        result.add_warning(
            ValidationWarning::new(
                "composition.as_child_unsupported",
                format!("Component {type_name} does not support 'asChild'"),
            )
            .with_field("asChild")
            .with_component(type_name),
        );
    }

    result
}

/// Type names of the instances found in slot content. Bare text is `#text`.
fn slot_content_types(content: &Value) -> Vec<&str> {
    match content {
        Value::Array(items) => items.iter().flat_map(slot_content_types).collect(),
        Value::Object(map) => vec![map.get("type").and_then(Value::as_str).unwrap_or("#object")],
        Value::String(_) => vec!["#text"],
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Validator capability
// ---------------------------------------------------------------------------

impl Validator for ComponentValidator {
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        let component_sourced = ctx.source == ValidationSource::Component;
        let claimed = match ctx.source {
            ValidationSource::Component => true,
            ValidationSource::Test => looks_like_instance(value),
            ValidationSource::Schema | ValidationSource::Runtime => false,
        };
        if !claimed {
            return ValidationResult::at_level(ctx.level);
        }

        let parsed = match (value, &ctx.component) {
            (Value::Object(map), Some(fallback)) if !map.contains_key("type") => {
                let mut with_type = Map::clone(map);
                with_type.insert("type".into(), Value::String(fallback.clone()));
                ComponentInstance::from_value(&Value::Object(with_type))
            }
            _ => ComponentInstance::from_value(value),
        };

        let mut result = match parsed {
            Ok(instance) => self.validate_component(&instance),
            Err(e) if component_sourced => {
                warn!(error = %e, "malformed component instance");
                ValidationResult::fail(vec![ValidationError::new(
                    "component.malformed",
                    format!("Value is not a valid component instance: {e}"),
                )
                .with_rule(COMPONENT_RULE_ID)])
            }
            Err(_) => ValidationResult::ok(),
        };

        for error in &mut result.errors {
            error.rule.get_or_insert_with(|| COMPONENT_RULE_ID.to_string());
        }
        for warning in &mut result.warnings {
            warning.rule.get_or_insert_with(|| COMPONENT_RULE_ID.to_string());
        }
        result.level = ctx.level;
        result
    }

    fn rule(&self) -> ValidationRule {
        ValidationRule::new(COMPONENT_RULE_ID, "Component structure", RuleCategory::Component)
            .with_description(
                "Validates component instances against registered schemas: props, children, \
                 composition slots, and variants",
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        PropConstraints, PropType, RenderSchema, SlotSchema, VariantSchema,
    };
    use proptest::prelude::*;
    use serde_json::json;
    use vigil_core::value::callable;
    use vigil_core::ValidationLevel;

    fn button_schema() -> ComponentSchema {
        ComponentSchema::new("button")
            .prop("label", PropSchema::new(PropType::string()).required())
            .prop("onClick", PropSchema::new(PropType::function()))
            .prop(
                "size",
                PropSchema::new(PropType::enumeration(vec![json!("sm"), json!("md"), json!("lg")]))
                    .with_default(json!("md")),
            )
            .prop("color", PropSchema::new(PropType::string()).deprecated())
    }

    fn validator() -> ComponentValidator {
        let mut v = ComponentValidator::new();
        v.register(button_schema());
        v
    }

    #[test]
    fn unknown_type_is_a_single_hard_error() {
        let result = validator().validate_component(
            &ComponentInstance::new("carousel").with_prop("whatever", json!(1)),
        );
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "component.unknown");
        assert_eq!(result.errors[0].field.as_deref(), Some("type"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_required_label() {
        let result = validator().validate_component(&ComponentInstance::new("button"));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "prop.required");
        assert_eq!(result.errors[0].field.as_deref(), Some("label"));
    }

    #[test]
    fn unknown_prop_only_warns() {
        let result = validator().validate_component(
            &ComponentInstance::new("button")
                .with_prop("label", json!("Save"))
                .with_prop("glow", json!(true)),
        );
        assert!(result.valid);
        assert_eq!(result.warning_codes().into_iter().collect::<Vec<_>>(), vec!["prop.unknown"]);
    }

    #[test]
    fn deprecated_prop_warns() {
        let result = validator().validate_component(
            &ComponentInstance::new("button")
                .with_prop("label", json!("Save"))
                .with_prop("color", json!("red")),
        );
        assert!(result.valid);
        assert_eq!(result.warnings_with_code("prop.deprecated").count(), 1);
    }

    #[test]
    fn type_and_enum_mismatches_are_errors() {
        let result = validator().validate_component(
            &ComponentInstance::new("button")
                .with_prop("label", json!(42))
                .with_prop("onClick", json!("handler"))
                .with_prop("size", json!("xl")),
        );
        assert!(!result.valid);
        let codes = result.error_codes();
        assert!(codes.contains("prop.type.string"));
        assert!(codes.contains("prop.type.function"));
        assert!(codes.contains("prop.type.enum"));
        assert!(result.errors.iter().all(|e| e.component.as_deref() == Some("button")));
    }

    #[test]
    fn callable_marker_satisfies_function() {
        let result = validator().validate_component(
            &ComponentInstance::new("button")
                .with_prop("label", json!("Save"))
                .with_prop("onClick", callable("save")),
        );
        assert!(result.is_valid());
    }

    #[test]
    fn dependencies_and_conflicts() {
        let mut v = ComponentValidator::new();
        v.register(
            ComponentSchema::new("link")
                .prop("href", PropSchema::new(PropType::string()))
                .prop("target", PropSchema::new(PropType::string()).depends_on("href"))
                .prop(
                    "onClick",
                    PropSchema::new(PropType::function())
                        .conflicts_with("href")
                        .conflicts_with("target"),
                ),
        );

        let dep = v.validate_component(&ComponentInstance::new("link").with_prop("target", json!("_blank")));
        assert_eq!(dep.errors_with_code("prop.dependency").count(), 1);

        let conflict = v.validate_component(
            &ComponentInstance::new("link")
                .with_prop("href", json!("/"))
                .with_prop("target", json!("_self"))
                .with_prop("onClick", callable("go")),
        );
        assert_eq!(conflict.errors_with_code("prop.conflict").count(), 2);
    }

    #[test]
    fn constraints_apply_after_type_check() {
        let mut v = ComponentValidator::new();
        v.register(ComponentSchema::new("input").prop(
            "maxLength",
            PropSchema::new(PropType::number()).with_constraints(PropConstraints {
                min: Some(1.0),
                max: Some(512.0),
                ..Default::default()
            }),
        ));
        let result =
            v.validate_component(&ComponentInstance::new("input").with_prop("maxLength", json!(0)));
        assert_eq!(result.error_codes().into_iter().collect::<Vec<_>>(), vec!["prop.constraint.min"]);
    }

    #[test]
    fn patterns_are_compiled_when_registered() {
        let mut v = ComponentValidator::new();
        let hex = PropConstraints {
            pattern: Some("^#[0-9a-f]{6}$".into()),
            ..Default::default()
        };
        v.register(
            ComponentSchema::new("swatch")
                .prop("fill", PropSchema::new(PropType::string()).with_constraints(hex.clone()))
                .prop("stroke", PropSchema::new(PropType::string()).with_constraints(hex)),
        );
        assert_eq!(v.patterns.len(), 1);

        for _ in 0..3 {
            let ok = v.validate_component(
                &ComponentInstance::new("swatch").with_prop("fill", json!("#00ff00")),
            );
            assert!(ok.is_valid());
        }
        let bad = v.validate_component(
            &ComponentInstance::new("swatch")
                .with_prop("fill", json!("green"))
                .with_prop("stroke", json!("#000000")),
        );
        assert_eq!(bad.errors_with_code("prop.constraint.pattern").count(), 1);
        assert_eq!(v.patterns.len(), 1);
    }

    #[test]
    fn children_cardinality_and_types() {
        let mut v = ComponentValidator::new();
        v.register(ComponentSchema::new("tabs").children(ChildrenSchema {
            required: true,
            types: vec!["tab".into()],
            min_count: Some(2),
            max_count: Some(3),
            allow_text: false,
        }));

        let empty = v.validate_component(&ComponentInstance::new("tabs"));
        let codes = empty.error_codes();
        assert!(codes.contains("children.required"));
        assert!(codes.contains("children.min_count"));

        let crowded = v.validate_component(
            &ComponentInstance::new("tabs")
                .with_child(ComponentInstance::new("tab"))
                .with_child(ComponentInstance::new("tab"))
                .with_child(ComponentInstance::new("panel"))
                .with_text("stray"),
        );
        let codes = crowded.error_codes();
        assert!(codes.contains("children.max_count"));
        assert!(codes.contains("children.type"));
        assert!(codes.contains("children.text"));
        assert!(!codes.contains("children.min_count"));
    }

    #[test]
    fn composition_slots_and_render_prop() {
        let mut slots = IndexMap::new();
        slots.insert(
            "header".to_string(),
            SlotSchema {
                required: true,
                ..Default::default()
            },
        );
        slots.insert(
            "footer".to_string(),
            SlotSchema {
                types: vec!["button".into()],
                ..Default::default()
            },
        );
        let mut v = ComponentValidator::new();
        v.register(ComponentSchema::new("dialog").composition(CompositionSchema {
            slots,
            render: Some(RenderSchema {
                required: true,
                ..Default::default()
            }),
            polymorphic: false,
            as_child: false,
        }));

        let result = v.validate_component(
            &ComponentInstance::new("dialog")
                .with_slot("header", json!([]))
                .with_slot("footer", json!([{"type": "button"}, {"type": "image"}]))
                .with_prop("as", json!("section")),
        );
        let codes = result.error_codes();
        assert!(codes.contains("slot.required"));
        assert!(codes.contains("slot.type"));
        assert!(codes.contains("render.required"));
        assert_eq!(result.warnings_with_code("composition.not_polymorphic").count(), 1);
        assert_eq!(result.warnings_with_code("prop.unknown").count(), 1);

        let ok = v.validate_component(
            &ComponentInstance::new("dialog")
                .with_slot("header", json!({"type": "title"}))
                .with_prop("render", callable("renderBody")),
        );
        assert!(ok.is_valid(), "{:?}", ok.errors);
        assert!(ok.warnings.is_empty());
    }

    #[test]
    fn first_matching_variant_wins() {
        let mut v = ComponentValidator::new();
        v.register(
            ComponentSchema::new("button")
                .prop("label", PropSchema::new(PropType::string()))
                .variant(
                    "icon",
                    VariantSchema::new()
                        .requires("icon")
                        .forbids("label")
                        .prop("icon", PropSchema::new(PropType::string()))
                        .prop("aria-label", PropSchema::new(PropType::string()).required()),
                )
                .variant(
                    "labelled",
                    VariantSchema::new()
                        .requires("label")
                        .prop("label", PropSchema::new(PropType::string()).required()),
                )
                .variant("fallback", VariantSchema::new()),
        );

        let icon = v.validate_component(&ComponentInstance::new("button").with_prop("icon", json!("plus")));
        assert_eq!(icon.metadata.get("variant"), Some(&json!("icon")));
        assert_eq!(icon.errors_with_code("prop.required").count(), 1);

        let labelled =
            v.validate_component(&ComponentInstance::new("button").with_prop("label", json!("Go")));
        assert_eq!(labelled.metadata.get("variant"), Some(&json!("labelled")));

        let fallback = v.validate_component(&ComponentInstance::new("button"));
        assert_eq!(fallback.metadata.get("variant"), Some(&json!("fallback")));
    }

    #[test]
    fn register_replaces_in_place() {
        let mut v = validator();
        v.register(ComponentSchema::new("card"));
        let previous = v.register(ComponentSchema::new("button"));
        assert!(previous.is_some());
        let names: Vec<_> = v.schemas().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["button", "card"]);
        assert!(v.schema("button").unwrap().props.is_empty());
    }

    #[test]
    fn runtime_data_is_never_claimed() {
        let ctx = ValidationContext::new(ValidationLevel::Error, ValidationSource::Runtime);
        let result = validator().validate(&ctx, &json!({"type": "page", "children": []}));
        assert!(result.is_valid());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_source_claims_instance_shapes_only() {
        let ctx = ValidationContext::new(ValidationLevel::Error, ValidationSource::Test);
        let instance = validator().validate(&ctx, &json!({"type": "page", "children": []}));
        assert_eq!(instance.error_codes().into_iter().collect::<Vec<_>>(), vec!["component.unknown"]);
        assert!(validator().validate(&ctx, &json!({"type": "page"})).is_valid());
    }

    #[test]
    fn validator_ignores_unrelated_values() {
        let ctx = ValidationContext::new(ValidationLevel::Error, ValidationSource::Schema);
        let result = validator().validate(&ctx, &json!({"id": "form", "fields": []}));
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn validator_uses_context_component_as_fallback_type() {
        let ctx = ValidationContext::new(ValidationLevel::Error, ValidationSource::Component)
            .with_component("button");
        let result = validator().validate(&ctx, &json!({"props": {}}));
        assert_eq!(result.error_codes().into_iter().collect::<Vec<_>>(), vec!["prop.required"]);
        assert_eq!(result.errors[0].rule.as_deref(), Some(COMPONENT_RULE_ID));
    }

    #[test]
    fn malformed_component_value_is_structured_error() {
        let ctx = ValidationContext::new(ValidationLevel::Error, ValidationSource::Component);
        let result = validator().validate(&ctx, &json!("button"));
        assert!(!result.valid);
        assert_eq!(result.errors[0].code, "component.malformed");
    }

    fn prop_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
            Just(callable("f")),
        ]
    }

    proptest! {
        #[test]
        fn validation_is_idempotent(
            props in prop::collection::btree_map("label|onClick|size|color|extra", prop_value(), 0..5)
        ) {
            let v = validator();
            let mut instance = ComponentInstance::new("button");
            for (k, val) in props {
                instance = instance.with_prop(k, val);
            }
            let first = v.validate_component(&instance);
            let second = v.validate_component(&instance);
            prop_assert_eq!(first.valid, second.valid);
            prop_assert_eq!(first.error_codes(), second.error_codes());
            prop_assert_eq!(first.warning_codes(), second.warning_codes());
        }

        #[test]
        fn missing_label_always_invalidates(
            props in prop::collection::btree_map("onClick|size|extra", prop_value(), 0..3)
        ) {
            let mut instance = ComponentInstance::new("button");
            for (k, val) in props {
                instance = instance.with_prop(k, val);
            }
            let result = validator().validate_component(&instance);
            prop_assert!(!result.valid);
            prop_assert!(result.error_codes().contains("prop.required"));
        }
    }
}
