use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tinyweb::config::StaticFilesConfig;
use tinyweb::context::RequestContext;
use tinyweb::form::FormData;
use tinyweb::http::request::{Method, Request};
use tinyweb::http::response::StatusCode;
use tinyweb::result::{resolve_static_path, RequestResult, TextEncoding};

fn test_context() -> RequestContext {
    let request = Request {
        method: Method::GET,
        target: "/".to_string(),
        version: "HTTP/1.1".to_string(),
        headers: HashMap::new(),
        body: Vec::new(),
    };

    RequestContext::new(request, None, FormData::default())
}

fn files_config(root: impl Into<String>) -> StaticFilesConfig {
    StaticFilesConfig {
        root_dir: root.into(),
        index_file: "home.html".to_string(),
    }
}

/// Directory under the system temp dir, removed on drop.
struct TempRoot(PathBuf);

impl TempRoot {
    fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("tinyweb_result_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[tokio::test]
async fn test_none_is_empty_200() {
    let resp = RequestResult::None
        .finalize(&test_context(), &files_config("."))
        .await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert!(resp.body.is_empty());
}

#[tokio::test]
async fn test_no_content_not_found_bad_request() {
    let files = files_config(".");

    let resp = RequestResult::NoContent
        .finalize(&test_context(), &files)
        .await;
    assert_eq!(resp.status, StatusCode::NoContent);

    let resp = RequestResult::NotFound
        .finalize(&test_context(), &files)
        .await;
    assert_eq!(resp.status, StatusCode::NotFound);
    assert!(resp.body.is_empty());

    let resp = RequestResult::BadRequest
        .finalize(&test_context(), &files)
        .await;
    assert_eq!(resp.status, StatusCode::BadRequest);
}

#[tokio::test]
async fn test_redirect_sets_location() {
    let resp = RequestResult::redirect("/login")
        .finalize(&test_context(), &files_config("."))
        .await;

    assert_eq!(resp.status, StatusCode::Found);
    assert_eq!(resp.header("Location"), Some("/login"));
}

#[tokio::test]
async fn test_text_adds_cors_and_length() {
    let resp = RequestResult::text("[1,2,3,4]", "application/json")
        .finalize(&test_context(), &files_config("."))
        .await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.header("Content-Type"), Some("application/json"));
    assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(resp.header("Content-Length"), Some("9"));
    assert_eq!(resp.body, b"[1,2,3,4]");
}

#[tokio::test]
async fn test_static_file_served_byte_identical() {
    let root = TempRoot::new("serve");
    std::fs::write(root.path().join("home.html"), b"<h1>hello</h1>").unwrap();

    let files = files_config(root.path().to_string_lossy().to_string());
    let resp = RequestResult::static_file("/home.html")
        .finalize(&test_context(), &files)
        .await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.header("Content-Type"), Some("text/html"));
    assert_eq!(resp.body, b"<h1>hello</h1>");
    assert_eq!(resp.header("Content-Length"), Some("14"));
}

#[tokio::test]
async fn test_missing_static_file_is_404() {
    let root = TempRoot::new("missing");

    let files = files_config(root.path().to_string_lossy().to_string());
    let resp = RequestResult::static_file("/nope.css")
        .finalize(&test_context(), &files)
        .await;

    assert_eq!(resp.status, StatusCode::NotFound);
    assert!(resp.body.is_empty());
}

#[tokio::test]
async fn test_empty_path_is_404() {
    let resp = RequestResult::static_file("")
        .finalize(&test_context(), &files_config("."))
        .await;

    assert_eq!(resp.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_extensionless_path_gets_index_file() {
    let root = TempRoot::new("index");
    std::fs::create_dir_all(root.path().join("dashboard")).unwrap();
    std::fs::write(root.path().join("dashboard").join("home.html"), b"dash").unwrap();

    let files = files_config(root.path().to_string_lossy().to_string());
    let resp = RequestResult::static_file("/dashboard")
        .finalize(&test_context(), &files)
        .await;

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.body, b"dash");
}

#[test]
fn test_resolve_static_path_appends_index() {
    let files = files_config("/srv/www");

    assert_eq!(
        resolve_static_path("/dashboard", &files),
        PathBuf::from("/srv/www/dashboard/home.html")
    );
    assert_eq!(
        resolve_static_path("/site.css", &files),
        PathBuf::from("/srv/www/site.css")
    );
}

#[test]
fn test_text_encodings() {
    assert_eq!(TextEncoding::Utf8.encode("Aé"), "Aé".as_bytes());
    assert_eq!(TextEncoding::Utf16Le.encode("A"), vec![0x41, 0x00]);
    assert_eq!(TextEncoding::Latin1.encode("Aé€"), vec![0x41, 0xE9, b'?']);
}

#[tokio::test]
async fn test_queued_cookies_become_set_cookie_headers() {
    let ctx = test_context();
    ctx.set_cookie("tinyweb_session", "abc");

    let resp = RequestResult::NoContent
        .finalize(&ctx, &files_config("."))
        .await;

    assert_eq!(resp.header("Set-Cookie"), Some("tinyweb_session=abc; Path=/"));
}
