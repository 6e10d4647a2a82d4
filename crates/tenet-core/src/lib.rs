//! # Tenet Core
//!
//! Shared vocabulary for the Tenet workspace.
//!
//! Every other crate builds on the types defined here:
//!
//! - [`Context`]: the per-request state that flows through a middleware
//!   chain and into the final handler
//! - [`TenetError`]: the error taxonomy, with HTTP status mapping
//! - [`Handler`]: the terminal step of every mounted route
//! - [`RequestId`]: time-ordered identifiers for log correlation
//!
//! ## Example
//!
//! ```
//! use tenet_core::{Context, TenetError};
//! use http::{Method, StatusCode};
//! use serde_json::json;
//!
//! let mut ctx = Context::new(Method::GET, "/users/7");
//! ctx.params_mut().insert("id".to_string(), json!("7"));
//! ctx.respond(StatusCode::OK, json!({ "id": 7 }));
//!
//! assert_eq!(ctx.status(), StatusCode::OK);
//! assert_eq!(TenetError::validation("bad").status_code(), StatusCode::BAD_REQUEST);
//! ```

#![doc(html_root_url = "https://docs.rs/tenet-core/0.1.0")]

mod context;
mod error;
mod file;
mod handler;
mod status;

pub use context::{Context, RequestId};
pub use error::{ErrorCategory, ErrorDetail, ErrorEnvelope, TenetError, TenetResult};
pub use file::UploadedFile;
pub use handler::{BoxFuture, Handler};
pub use status::StatusCodes;
