//! # vigil-component: Component Instance Validation
//!
//! Checks a [`ComponentInstance`] against a registered [`ComponentSchema`].
//!
//! ## Check order
//!
//! An instance whose type is not registered fails with a single
//! `component.unknown` error and nothing else runs. Otherwise four checks
//! run in order and their results are merged:
//!
//! 1. **Props.** Presence, declared type, constraints, dependencies, and
//!    conflicts.
//! 2. **Children.** Required flag, cardinality, and allowed types.
//! 3. **Composition.** Required slots, slot content types, render props,
//!    and polymorphism flags.
//! 4. **Variants.** The first registered variant whose required/forbidden
//!    lists match the instance has its extra props validated.
//!
//! ## Type checking
//!
//! [`PropKind`] is a closed enum and [`check_type`] dispatches on it with an
//! exhaustive `match`, so adding a kind forces every consumer to handle it.

pub mod instance;
pub mod schema;
pub mod types;
pub mod validator;

pub use instance::{looks_like_instance, Child, ComponentInstance};
pub use schema::{
    ChildrenSchema, ComponentSchema, CompositionSchema, PropConstraints, PropKind, PropSchema,
    PropType, RenderSchema, SlotSchema, VariantSchema,
};
pub use types::{check_constraints, check_type, PatternCache};
pub use validator::{ComponentValidator, COMPONENT_RULE_ID};
