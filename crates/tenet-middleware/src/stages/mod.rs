//! The stages synthesized for every route.
//!
//! ```text
//! external middleware → request validation → response validation → handler
//! ```
//!
//! Response validation wraps the handler: it calls `next` first and checks
//! what the handler produced.

mod handler;
mod request;
mod response;

pub use handler::{FnDecorator, HandlerDecorator, HandlerStage};
pub use request::RequestValidator;
pub use response::ResponseValidator;
