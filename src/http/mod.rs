//! HTTP/1.1 protocol layer.
//!
//! - **`parser`**: parses incoming requests from byte buffers
//! - **`request`**: request representation, header and cookie access
//! - **`response`**: response representation with builder
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: extension-based content-type lookup

pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
