//! Request validation stage.
//!
//! All parameters of a handler are validated together, in one pass, against
//! a composite object keyed by request location:
//!
//! ```text
//! { "params": {..}, "query": {..}, "body": <body schema>, "formData": {..} }
//! ```
//!
//! Unknown keys are tolerated at every level. On success the validated
//! (coerced, defaulted) values replace the request's own.

use crate::middleware::{Middleware, Next};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tenet_core::{BoxFuture, Context, TenetError, TenetResult, UploadedFile};
use tenet_schema::{CompiledSchema, ValidateOptions};

/// Validates the whole request before the handler runs.
#[derive(Clone)]
pub struct RequestValidator {
    schema: Option<Arc<dyn CompiledSchema>>,
    form_fields: Vec<String>,
}

impl fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator")
            .field("compiled", &self.schema.is_some())
            .field("form_fields", &self.form_fields)
            .finish()
    }
}

impl RequestValidator {
    /// A validator running `schema` over the composite request value.
    ///
    /// `form_fields` names the `formData` parameters whose uploaded files
    /// are folded into the validated value.
    #[must_use]
    pub fn new(schema: Arc<dyn CompiledSchema>, form_fields: Vec<String>) -> Self {
        Self {
            schema: Some(schema),
            form_fields,
        }
    }

    /// A validator that accepts every request unchanged.
    #[must_use]
    pub fn pass_through() -> Self {
        Self {
            schema: None,
            form_fields: Vec::new(),
        }
    }

    /// Validates the request in `ctx`, rewriting it on success.
    pub fn apply(&self, ctx: &mut Context) -> TenetResult<()> {
        let Some(schema) = &self.schema else {
            return Ok(());
        };

        let multipart = ctx.is_multipart();
        let mut body = ctx.body().clone();
        self.merge_files(ctx.files(), &mut body);

        let (body, form_data) = if multipart {
            (Value::Null, body)
        } else {
            (body, Value::Null)
        };

        let mut input = Map::new();
        input.insert("params".to_string(), Value::Object(ctx.params().clone()));
        input.insert("query".to_string(), Value::Object(ctx.query().clone()));
        if !body.is_null() {
            input.insert("body".to_string(), body);
        }
        if !form_data.is_null() {
            input.insert("formData".to_string(), form_data);
        }

        let validated = schema
            .validate(&Value::Object(input), &ValidateOptions::allow_unknown())
            .map_err(|error| {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    path = %ctx.path(),
                    field = %error.path,
                    "request validation failed"
                );
                TenetError::validation(error.message)
            })?;

        let Value::Object(mut validated) = validated else {
            return Ok(());
        };

        if let Some(Value::Object(params)) = validated.remove("params") {
            ctx.set_params(params);
        }
        if let Some(Value::Object(query)) = validated.remove("query") {
            ctx.set_query(query);
        }
        let body = if multipart {
            validated.remove("formData")
        } else {
            validated.remove("body")
        };
        ctx.set_body(body.unwrap_or(Value::Null));

        Ok(())
    }

    fn merge_files(&self, files: &[UploadedFile], body: &mut Value) {
        for field in &self.form_fields {
            let mut uploaded: Vec<Value> = files
                .iter()
                .filter(|file| file.field() == field)
                .map(UploadedFile::to_value)
                .collect();
            if uploaded.is_empty() {
                continue;
            }

            if body.is_null() {
                *body = Value::Object(Map::new());
            }
            let Value::Object(fields) = body else {
                return;
            };

            let value = if uploaded.len() == 1 {
                uploaded.remove(0)
            } else {
                Value::Array(uploaded)
            };
            fields.insert(field.clone(), value);
        }
    }
}

impl Middleware for RequestValidator {
    fn name(&self) -> &'static str {
        "request_validation"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, TenetResult<()>> {
        Box::pin(async move {
            self.apply(ctx)?;
            next.run(ctx).await
        })
    }
}
