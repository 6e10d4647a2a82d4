//! Response validation stage.
//!
//! Wraps the rest of the chain: the handler runs first, then the produced
//! body is checked against the schema declared for the produced status.
//! Statuses without a declaration pass through untouched.

use crate::middleware::{Middleware, Next};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tenet_core::{BoxFuture, Context, TenetError, TenetResult};
use tenet_schema::{CompiledSchema, ValidateOptions};

/// Validates the response body after the handler ran.
#[derive(Clone, Default)]
pub struct ResponseValidator {
    schemas: IndexMap<u16, Arc<dyn CompiledSchema>>,
}

impl fmt::Debug for ResponseValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseValidator")
            .field("statuses", &self.statuses())
            .finish()
    }
}

impl ResponseValidator {
    /// An empty validator; every status passes through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the schema for `status`. A later call for the same status
    /// replaces the earlier one.
    #[must_use]
    pub fn with_status(mut self, status: u16, schema: Arc<dyn CompiledSchema>) -> Self {
        self.schemas.insert(status, schema);
        self
    }

    /// Statuses with a declared schema, in declaration order.
    #[must_use]
    pub fn statuses(&self) -> Vec<u16> {
        self.schemas.keys().copied().collect()
    }

    /// Checks the response in `ctx` against its declared schema.
    ///
    /// A conforming body is replaced by its coerced form. A non-conforming
    /// body is discarded and the error carries the validator's message.
    pub fn check(&self, ctx: &mut Context) -> TenetResult<()> {
        let status = ctx.status();
        let Some(schema) = self.schemas.get(&status.as_u16()) else {
            return Ok(());
        };

        let body = ctx.response_body().cloned().unwrap_or(Value::Null);
        match schema.validate(&body, &ValidateOptions::strict()) {
            Ok(Value::Null) if ctx.response_body().is_none() => Ok(()),
            Ok(value) => {
                ctx.set_response_body(value);
                Ok(())
            }
            Err(error) => {
                ctx.take_response_body();
                tracing::error!(
                    request_id = %ctx.request_id(),
                    path = %ctx.path(),
                    status = status.as_u16(),
                    field = %error.path,
                    "response violates its declared schema"
                );
                Err(TenetError::response_contract(error.message, status))
            }
        }
    }
}

impl Middleware for ResponseValidator {
    fn name(&self) -> &'static str {
        "response_validation"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, TenetResult<()>> {
        Box::pin(async move {
            next.run(ctx).await?;
            self.check(ctx)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use serde_json::json;
    use tenet_schema::{NoReferences, SchemaBridge, SchemaDescriptor};

    fn total() -> ResponseValidator {
        let schema = SchemaDescriptor::object([("total", SchemaDescriptor::number().required())]);
        let compiled = SchemaBridge::default()
            .to_validation(&schema, &NoReferences)
            .unwrap();
        ResponseValidator::new().with_status(200, compiled)
    }

    #[test]
    fn test_coerces_declared_status() {
        let mut ctx = Context::new(Method::GET, "/stats");
        ctx.respond(StatusCode::OK, json!({ "total": "5" }));

        total().check(&mut ctx).unwrap();
        assert_eq!(ctx.response_body(), Some(&json!({ "total": 5 })));
        assert_eq!(ctx.status(), StatusCode::OK);
    }

    #[test]
    fn test_violation_discards_body() {
        let mut ctx = Context::new(Method::GET, "/stats");
        ctx.respond(StatusCode::OK, json!({ "total": "many" }));

        let err = total().check(&mut ctx).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "\"total\" must be a number");
        assert!(ctx.response_body().is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut ctx = Context::new(Method::GET, "/stats");
        ctx.respond(StatusCode::OK, json!({ "total": 1, "secret": "x" }));

        let err = total().check(&mut ctx).unwrap_err();
        assert_eq!(err.message(), "\"secret\" is not allowed");
    }

    #[test]
    fn test_undeclared_status_passes_through() {
        let mut ctx = Context::new(Method::GET, "/stats");
        ctx.respond(StatusCode::CREATED, json!("anything"));

        total().check(&mut ctx).unwrap();
        assert_eq!(ctx.response_body(), Some(&json!("anything")));
    }

    #[test]
    fn test_empty_response_gets_default() {
        let compiled = SchemaBridge::default()
            .to_validation(
                tenet_schema::ResponseBinding::empty(204).schema(),
                &NoReferences,
            )
            .unwrap();
        let validator = ResponseValidator::new().with_status(204, compiled);

        let mut ctx = Context::new(Method::DELETE, "/users/1");
        ctx.set_status(StatusCode::NO_CONTENT);

        validator.check(&mut ctx).unwrap();
        assert_eq!(ctx.response_body(), Some(&json!("")));
        assert_eq!(validator.statuses(), vec![204]);
    }
}
