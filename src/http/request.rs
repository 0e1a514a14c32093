use std::collections::HashMap;

/// HTTP request methods.
///
/// GET, POST and OPTIONS are dispatched; the remaining methods are parsed
/// but answered with 400 Bad Request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    HEAD,
    OPTIONS,
    PATCH,
}

impl Method {
    /// Parses a method token (case-sensitive, per RFC method names).
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

/// A parsed HTTP request.
///
/// `target` is the raw request target as sent by the client, query string
/// included; routing uses [`Request::path`] which strips the query.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub target: String,
    pub version: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    /// Header lookup, case-insensitive per HTTP.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The absolute path of the request target, query string removed.
    pub fn path(&self) -> &str {
        match self.target.split_once('?') {
            Some((path, _)) => path,
            None => &self.target,
        }
    }

    /// Value of a cookie in the `Cookie` header, if any.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        let header = self.header("Cookie")?;

        header.split(';').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            if k.trim() == name {
                Some(v.trim())
            } else {
                None
            }
        })
    }

    /// Whether the body is declared as a URL-encoded form.
    ///
    /// Content-Type parameters (e.g. `; charset=UTF-8`) are ignored.
    pub fn is_form_urlencoded(&self) -> bool {
        self.header("Content-Type")
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            })
            .unwrap_or(false)
    }
}
