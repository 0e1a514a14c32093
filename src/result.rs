//! Response-finalizing results.
//!
//! A [`RequestResult`] is what a handler returns: a closed description of
//! how the exchange concludes. Finalization is a single pattern match that
//! turns the chosen variant into a complete [`Response`]; once chosen, the
//! variant is the sole writer of the response.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::StaticFilesConfig;
use crate::context::RequestContext;
use crate::http::mime;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Byte encoding for [`RequestResult::Text`] bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Latin1,
}

impl TextEncoding {
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le => text
                .encode_utf16()
                .flat_map(|u| u.to_le_bytes())
                .collect(),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

/// How one HTTP exchange concludes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestResult {
    /// Nothing explicit: status stays at its default (200), empty body.
    None,
    /// 204, empty body.
    NoContent,
    /// 404, empty body.
    NotFound,
    /// 400, empty body.
    BadRequest,
    /// Serve a file under the static root; 404 when empty/missing/unreadable.
    StaticFile(PathBuf),
    /// 200 with the body in the given encoding; always CORS allow-all.
    Text {
        body: String,
        content_type: String,
        encoding: TextEncoding,
    },
    /// 302 with a `Location` header.
    Redirect(String),
}

impl RequestResult {
    /// Text result with the default UTF-8 encoding.
    pub fn text(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        RequestResult::Text {
            body: body.into(),
            content_type: content_type.into(),
            encoding: TextEncoding::Utf8,
        }
    }

    pub fn static_file(path: impl Into<PathBuf>) -> Self {
        RequestResult::StaticFile(path.into())
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        RequestResult::Redirect(location.into())
    }

    /// Finalizes this result into a response, consuming any cookies the
    /// request queued. All-or-nothing: no partial write is retried.
    pub async fn finalize(self, ctx: &RequestContext, files: &StaticFilesConfig) -> Response {
        let mut response = match self {
            RequestResult::None => Response::empty(StatusCode::Ok),
            RequestResult::NoContent => Response::empty(StatusCode::NoContent),
            RequestResult::NotFound => Response::empty(StatusCode::NotFound),
            RequestResult::BadRequest => Response::empty(StatusCode::BadRequest),
            RequestResult::StaticFile(path) => serve_static(&path, files).await,
            RequestResult::Text {
                body,
                content_type,
                encoding,
            } => ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Type", content_type)
                .header("Access-Control-Allow-Origin", "*")
                .body(encoding.encode(&body))
                .build(),
            RequestResult::Redirect(location) => ResponseBuilder::new(StatusCode::Found)
                .header("Location", location)
                .build(),
        };

        apply_cookies(&mut response, ctx);

        response
    }
}

/// Turns the cookies queued on the context into `Set-Cookie` headers.
pub(crate) fn apply_cookies(response: &mut Response, ctx: &RequestContext) {
    for (name, value) in ctx.take_cookies().iter() {
        response
            .headers
            .push(("Set-Cookie".to_string(), format!("{name}={value}; Path=/")));
    }
}

/// Maps a request path to a location under the static root.
///
/// The leading separator is stripped; a path without an extension is
/// treated as a directory and gets the configured index file appended.
pub fn resolve_static_path(request_path: &str, files: &StaticFilesConfig) -> PathBuf {
    let relative = request_path.trim_start_matches('/');
    let mut path = Path::new(&files.root_dir).join(relative);

    if path.extension().is_none() {
        path = path.join(&files.index_file);
    }

    path
}

async fn serve_static(path: &Path, files: &StaticFilesConfig) -> Response {
    if path.as_os_str().is_empty() {
        return Response::empty(StatusCode::NotFound);
    }

    let full_path = resolve_static_path(&path.to_string_lossy(), files);

    match tokio::fs::read(&full_path).await {
        Ok(data) => ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", mime::content_type_for(&full_path))
            .body(data)
            .build(),
        Err(e) => {
            debug!(path = %full_path.display(), error = %e, "static file not served");
            Response::empty(StatusCode::NotFound)
        }
    }
}
