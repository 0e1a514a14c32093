use std::sync::Mutex;

use crate::form::FormData;
use crate::http::request::Request;
use crate::http::response::ResponseCookies;
use crate::session::Session;

/// Per-request state handed to route handlers.
///
/// Created once per inbound connection and discarded after the result is
/// finalized. The session handle is `None` when sessions are disabled.
pub struct RequestContext {
    request: Request,
    session: Option<Session>,
    form: FormData,
    cookies: Mutex<ResponseCookies>,
}

impl RequestContext {
    pub fn new(request: Request, session: Option<Session>, form: FormData) -> Self {
        Self {
            request,
            session,
            form,
            cookies: Mutex::new(ResponseCookies::default()),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The resolved session, valid for this request only.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Parsed URL-encoded form body; empty unless the request carried one.
    pub fn form(&self) -> &FormData {
        &self.form
    }

    /// Queues a cookie for the response.
    pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) {
        self.lock_cookies().add(name, value);
    }

    pub(crate) fn take_cookies(&self) -> ResponseCookies {
        std::mem::take(&mut *self.lock_cookies())
    }

    fn lock_cookies(&self) -> std::sync::MutexGuard<'_, ResponseCookies> {
        self.cookies.lock().unwrap_or_else(|e| e.into_inner())
    }
}
