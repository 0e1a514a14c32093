use tinyweb::http::response::{Response, ResponseBuilder, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::NoContent.as_u16(), 204);
    assert_eq!(StatusCode::Found.as_u16(), 302);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NoContent.reason_phrase(), "No Content");
    assert_eq!(StatusCode::Found.reason_phrase(), "Found");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
}

#[test]
fn test_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
}

#[test]
fn test_builder_auto_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"This is the body".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), Some("16"));
}

#[test]
fn test_builder_keeps_explicit_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "0")
        .body(b"ignored-by-length".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[test]
fn test_builder_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .build();

    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.header("x-custom"), Some("value"));
}

#[test]
fn test_empty_response() {
    let response = Response::empty(StatusCode::NotFound);

    assert_eq!(response.status, StatusCode::NotFound);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[test]
fn test_repeated_headers_are_appended() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Set-Cookie", "a=1")
        .header("Set-Cookie", "b=2")
        .build();

    let cookies: Vec<_> = response
        .headers
        .iter()
        .filter(|(k, _)| k == "Set-Cookie")
        .collect();
    assert_eq!(cookies.len(), 2);
}
