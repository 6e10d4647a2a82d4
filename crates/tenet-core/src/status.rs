//! Status codes that show up in most response declarations.

/// The status codes most handlers declare responses for.
///
/// Plain `u16` constants so they can be passed straight to response
/// declarations.
#[derive(Debug, Clone, Copy)]
pub struct StatusCodes;

impl StatusCodes {
    /// 200 OK.
    pub const OK: u16 = 200;
    /// 201 Created.
    pub const CREATED: u16 = 201;
    /// 303 See Other.
    pub const SEE_OTHER: u16 = 303;
    /// 400 Bad Request.
    pub const BAD_REQUEST: u16 = 400;
    /// 500 Internal Server Error.
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}
