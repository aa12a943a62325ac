//! # Validation Engine
//!
//! An insertion-ordered registry of rule id to `(metadata, validator)`.
//! [`ValidationEngine::validate`] dispatches every enabled rule that passes
//! the context's include/exclude filters, merges the results, and then runs
//! the accessibility, performance, and theme validators when the context's
//! options ask for them.
//!
//! Registration takes `&mut self`; validation takes `&self`. Once built, an
//! engine can be shared behind an `Arc` across threads.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::{debug, info, info_span, trace, warn};
use vigil_a11y::AccessibilityValidator;
use vigil_component::{ComponentSchema, ComponentValidator};
use vigil_core::{
    ValidationContext, ValidationResult, ValidationRule, ValidationSource, Validator,
};
use vigil_perf::PerformanceValidator;
use vigil_runtime::{RuntimeOutcome, RuntimeValidator};
use vigil_schema::{SchemaRule, SchemaValidator};
use vigil_theme::ThemeValidator;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::report::ValidationReport;

/// A registry entry.
#[derive(Clone)]
pub struct RegisteredRule {
    /// Rule metadata. `enabled` gates dispatch.
    pub rule: ValidationRule,
    /// The validator the rule dispatches to.
    pub validator: Arc<dyn Validator>,
}

impl fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

/// Rule registry and dispatcher.
pub struct ValidationEngine {
    rules: IndexMap<String, RegisteredRule>,
    component: Arc<ComponentValidator>,
    schema: Arc<SchemaValidator>,
    accessibility: Arc<AccessibilityValidator>,
    performance: Arc<PerformanceValidator>,
    theme: Arc<ThemeValidator>,
    runtime: Arc<RuntimeValidator>,
    config: EngineConfig,
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("rules", &self.rules.keys().collect::<Vec<_>>())
            .field("component_schemas", &self.component.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ValidationEngine {
    /// An engine with the component and schema rules registered.
    pub fn new(config: EngineConfig) -> Self {
        let component = Arc::new(ComponentValidator::new());
        let schema = Arc::new(SchemaValidator::new());
        let runtime = Arc::new(RuntimeValidator::new(config.runtime.clone()));
        let mut engine = Self {
            rules: IndexMap::new(),
            component: Arc::clone(&component),
            schema: Arc::clone(&schema),
            accessibility: Arc::new(AccessibilityValidator::new(config.accessibility.clone())),
            performance: Arc::new(PerformanceValidator::new(config.performance.clone())),
            theme: Arc::new(ThemeValidator::new(config.theme.clone())),
            runtime: Arc::clone(&runtime),
            config,
        };
        engine.register(component);
        engine.register(schema);
        engine.register(runtime);
        for id in engine.config.disabled_rules.clone() {
            if engine.set_rule_enabled(&id, false).is_err() {
                warn!(rule_id = %id, "configured to disable an unregistered rule");
            }
        }
        engine
    }

    /// Replace the performance validator, e.g. to inject a probe.
    pub fn with_performance(mut self, performance: PerformanceValidator) -> Self {
        self.performance = Arc::new(performance);
        self
    }

    /// Register `validator` under the rule it describes.
    pub fn register<V: Validator + 'static>(&mut self, validator: Arc<V>) {
        let rule = validator.rule();
        self.add_rule(rule, validator);
    }

    /// Register `rule` with `validator`. An existing id is replaced in
    /// place and keeps its position.
    pub fn add_rule(&mut self, rule: ValidationRule, validator: Arc<dyn Validator>) {
        let id = rule.id.clone();
        let entry = RegisteredRule { rule, validator };
        if self.rules.insert(id.clone(), entry).is_some() {
            info!(rule_id = %id, "rule replaced");
        } else {
            info!(rule_id = %id, "rule added");
        }
    }

    /// Enable or disable a registered rule.
    pub fn set_rule_enabled(&mut self, id: &str, enabled: bool) -> Result<(), EngineError> {
        let entry = self
            .rules
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownRule(id.to_string()))?;
        entry.rule.enabled = enabled;
        info!(rule_id = %id, enabled, "rule toggled");
        Ok(())
    }

    /// The entry registered under `id`.
    pub fn rule(&self, id: &str) -> Option<&RegisteredRule> {
        self.rules.get(id)
    }

    /// Registered rule metadata in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &ValidationRule> {
        self.rules.values().map(|entry| &entry.rule)
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a component schema with the built-in component validator.
    pub fn register_component_schema(&mut self, schema: ComponentSchema) {
        let previous = erased(&self.component);
        Arc::make_mut(&mut self.component).register(schema);
        let current: Arc<dyn Validator> = self.component.clone();
        self.swap_validator(previous, current);
    }

    /// Add a rule to the built-in schema validator.
    pub fn add_schema_rule(&mut self, rule: SchemaRule) {
        let previous = erased(&self.schema);
        Arc::make_mut(&mut self.schema).add_rule(rule);
        let current: Arc<dyn Validator> = self.schema.clone();
        self.swap_validator(previous, current);
    }

    /// Point registry entries that still hold the old built-in validator at
    /// its copy-on-write replacement. Entries the caller re-registered with
    /// their own validator are left alone.
    fn swap_validator(&mut self, previous: *const (), current: Arc<dyn Validator>) {
        for entry in self.rules.values_mut() {
            if erased(&entry.validator) == previous {
                entry.validator = Arc::clone(&current);
            }
        }
    }

    /// The built-in component validator.
    pub fn component_validator(&self) -> &ComponentValidator {
        &self.component
    }

    /// The built-in schema validator.
    pub fn schema_validator(&self) -> &SchemaValidator {
        &self.schema
    }

    /// The accessibility validator run after dispatch.
    pub fn accessibility_validator(&self) -> &AccessibilityValidator {
        &self.accessibility
    }

    /// The performance validator run after dispatch.
    pub fn performance_validator(&self) -> &PerformanceValidator {
        &self.performance
    }

    /// The theme validator run after dispatch.
    pub fn theme_validator(&self) -> &ThemeValidator {
        &self.theme
    }

    /// The built-in runtime input validator.
    pub fn runtime_validator(&self) -> &RuntimeValidator {
        &self.runtime
    }

    /// Dispatch every applicable rule over `value` and merge the results.
    ///
    /// Never fails: a value no rule understands yields a valid, empty
    /// result.
    pub fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        let span = info_span!("validation", source = ctx.source.as_str(), level = ctx.level.as_str());
        let _entered = span.enter();
        let start = Instant::now();
        metrics::counter!("vigil_validations_total", "source" => ctx.source.as_str()).increment(1);

        let mut result = ValidationResult::at_level(ctx.level);
        let mut rules_run = 0usize;

        for (id, entry) in &self.rules {
            if !entry.rule.enabled || !ctx.options.allows_rule(id) {
                trace!(rule_id = %id, "rule skipped");
                continue;
            }
            let outcome = entry.validator.validate(ctx, value);
            debug!(
                rule_id = %id,
                errors = outcome.errors.len(),
                warnings = outcome.warnings.len(),
                "rule dispatched"
            );
            if !outcome.errors.is_empty() {
                metrics::counter!("vigil_rule_failures_total", "rule" => id.clone()).increment(1);
            }
            result.merge(outcome);
            rules_run += 1;
        }

        let options = &ctx.options;
        if options.enable_accessibility {
            let report = self.accessibility.validate_accessibility(value);
            result.merge(vigil_a11y::report_to_result(report, ctx.level));
        }
        if options.enable_performance {
            let metrics = self.performance.validate_performance(value);
            result.merge(vigil_perf::metrics_to_result(metrics, ctx.level));
        }
        if options.enable_theme && vigil_theme::is_theme(value) {
            let report = self.theme.validate_theme(value);
            result.merge(vigil_theme::report_to_result(report, ctx.level));
        }

        if options.skip_warnings {
            result.warnings.clear();
        }
        result.level = ctx.level;

        let elapsed = start.elapsed();
        result.set_metadata("source", json!(ctx.source.as_str()));
        result.set_metadata("rules_run", json!(rules_run));
        result.set_metadata("duration_ms", json!(elapsed.as_secs_f64() * 1000.0));
        if let Some(timeout_ms) = options.timeout_ms {
            result.set_metadata("timeout_ms", json!(timeout_ms));
        }
        if ctx.is_strict() {
            result.set_metadata("strict", json!(true));
        }
        metrics::histogram!("vigil_validation_duration_seconds").record(elapsed.as_secs_f64());

        debug!(
            valid = result.valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            rules_run,
            "validation finished"
        );
        result
    }

    fn context(&self, source: ValidationSource) -> ValidationContext {
        ValidationContext::new(self.config.level, source).with_options(self.config.options.clone())
    }

    /// Validate a component instance. `type_name` supplies the type when
    /// the value has none.
    pub fn validate_component(&self, component: &Value, type_name: Option<&str>) -> ValidationResult {
        let ctx = self.context(ValidationSource::Component);
        let ctx = match type_name {
            Some(name) => ctx.with_component(name),
            None => ctx,
        };
        self.validate(&ctx, component)
    }

    /// Validate a schema document.
    pub fn validate_schema(&self, schema: &Value) -> ValidationResult {
        self.validate(&self.context(ValidationSource::Schema), schema)
    }

    /// Validate runtime data.
    pub fn validate_runtime(&self, data: &Value) -> ValidationResult {
        self.validate(&self.context(ValidationSource::Runtime), data)
    }

    /// Check a submitted form and return its sanitized copy. Forms are not
    /// dispatched through the rule registry, so rule filters do not apply.
    pub fn validate_form(&self, form: &Value) -> RuntimeOutcome {
        let outcome = self.runtime.validate_form(form);
        metrics::counter!("vigil_validations_total", "source" => "form").increment(1);
        outcome
    }

    /// Registered rules with counts by category, by level, and by state.
    pub fn validation_report(&self) -> ValidationReport {
        ValidationReport::from_rules(self.rules().cloned().collect())
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn erased<T: ?Sized>(arc: &Arc<T>) -> *const () {
    Arc::as_ptr(arc) as *const ()
}
