//! The validation-library boundary.
//!
//! Route compilation only needs two capabilities from a validation library:
//! compile a [`SchemaDescriptor`] once, then validate JSON values against
//! the compiled form. [`ValidationEngine`] and [`CompiledSchema`] are those
//! capabilities. [`StandardEngine`] is the implementation used by default.

mod standard;

pub use standard::StandardEngine;

use crate::catalog::SchemaResolver;
use crate::descriptor::SchemaDescriptor;
use crate::error::{SchemaResult, ValidationError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Options applied to a single validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Let object keys the schema does not declare pass through.
    pub allow_unknown: bool,
    /// Coerce strings to numbers and booleans where the schema asks for them.
    pub convert: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            allow_unknown: false,
            convert: true,
        }
    }
}

impl ValidateOptions {
    /// Options used for requests: unknown keys are tolerated.
    #[must_use]
    pub const fn allow_unknown() -> Self {
        Self {
            allow_unknown: true,
            convert: true,
        }
    }

    /// Options used for responses: unknown keys are rejected.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            allow_unknown: false,
            convert: true,
        }
    }
}

/// A compiled schema, ready to validate values.
pub trait CompiledSchema: Send + Sync + fmt::Debug {
    /// Validate `value`, returning the coerced and defaulted result.
    ///
    /// A top-level `Value::Null` means "no value".
    fn validate(&self, value: &Value, options: &ValidateOptions) -> Result<Value, ValidationError>;
}

/// Compiles descriptors into [`CompiledSchema`]s.
pub trait ValidationEngine: Send + Sync + fmt::Debug {
    /// Engine name for logs.
    fn name(&self) -> &'static str;

    /// Compile `schema`, resolving references through `resolver`.
    fn compile(
        &self,
        schema: &SchemaDescriptor,
        resolver: &dyn SchemaResolver,
    ) -> SchemaResult<Arc<dyn CompiledSchema>>;
}
