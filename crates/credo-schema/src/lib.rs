//! # credo-schema — Capability Schemas & Validation
//!
//! Describes which fields a KYC level carries and checks property bags
//! against that description.
//!
//! ## Capability Registry (`capability`)
//!
//! A level such as `plus+liveness+wallet` is split into fragments, the
//! fragments are sorted, and each one's field map and required list are
//! merged in that order by [`compose()`]. Fragments are an explicit
//! [`Capability`] enum; an unknown fragment fails loudly with
//! [`SchemaError::UnsupportedKycLevel`] instead of contributing nothing.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`PropertyValidator`] first checks the schema body itself against a
//! draft-07 meta-schema ([`SchemaError::InvalidSchema`]), then checks the
//! property bag against the wrapped body ([`SchemaError::PropertyMismatch`]).
//! Undeclared properties are tolerated in [`ValidationMode::Lenient`] and
//! rejected in [`ValidationMode::Strict`].
//!
//! ## Crate Policy
//!
//! - Depends only on `credo-core` internally.
//! - Fragment field maps are part of issued credentials' shape. Adding a
//!   fragment is fine; changing an existing one changes which properties
//!   future credentials commit to.
//! - Validation is a trust boundary: rejected bags carry structured
//!   violations with instance path, schema path and message.

pub mod capability;
pub mod schema;
pub mod validate;

pub use capability::{compose, Capability};
pub use schema::{JsonType, PropertySpec, Schema, TypeSpec};
pub use validate::{
    check_values, PropertyValidator, SchemaError, ValidationMode, ValidationViolations, Violation,
};
