//! The server: accept loop, per-request dispatch, session lifecycle.

use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::context::RequestContext;
use crate::form::{parse_form, FormData};
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::result::{apply_cookies, resolve_static_path, RequestResult};
use crate::router::Router;
use crate::session::{Session, SessionStore, SESSION_COOKIE_NAME};

/// Pre-serve hook for static file requests.
///
/// Invoked with the resolved candidate path immediately before the file is
/// served, and only for static-file GETs; it may replace the pending result
/// (e.g. to veto serving certain file types).
pub type FileRequestHook =
    Box<dyn Fn(&RequestContext, &Path, &mut RequestResult) + Send + Sync>;

/// An embeddable HTTP server.
///
/// Register routes and hooks first, then wrap in an [`Arc`] and call
/// [`WebServer::run`]. `stop` halts the accept loops and the session sweep
/// and clears all sessions; restarting a stopped server is not supported.
pub struct WebServer {
    config: Config,
    router: Router,
    sessions: SessionStore,
    file_hook: Option<FileRequestHook>,
    running: AtomicBool,
    shutdown: watch::Sender<bool>,
    local_addrs: Mutex<Vec<SocketAddr>>,
}

impl WebServer {
    /// Validates the configuration and builds a stopped server.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            config,
            router: Router::new(),
            sessions: SessionStore::new(),
            file_hook: None,
            running: AtomicBool::new(false),
            shutdown,
            local_addrs: Mutex::new(Vec::new()),
        })
    }

    /// Registers a GET handler for an exact path.
    pub fn get(
        &mut self,
        path: impl Into<String>,
        handler: impl Fn(&RequestContext) -> RequestResult + Send + Sync + 'static,
    ) {
        self.router.add_get(path, handler);
    }

    /// Registers a POST handler for an exact path.
    pub fn post(
        &mut self,
        path: impl Into<String>,
        handler: impl Fn(&RequestContext) -> RequestResult + Send + Sync + 'static,
    ) {
        self.router.add_post(path, handler);
    }

    /// Installs the static-file pre-serve hook.
    pub fn on_file_request(&mut self, hook: FileRequestHook) {
        self.file_hook = Some(hook);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Addresses actually bound, useful when listening on port 0.
    pub fn local_addrs(&self) -> Vec<SocketAddr> {
        self.lock_addrs().clone()
    }

    /// Binds every configured address and starts serving.
    ///
    /// Spawns one accept loop per listener plus, when sessions are enabled,
    /// the expiry sweep, then returns. Calling `run` on a server that is
    /// already running is a no-op; restarting after `stop` is unsupported.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        for addr in &self.config.server.listen_addrs {
            let listener = TcpListener::bind(addr).await?;
            let local = listener.local_addr()?;
            self.lock_addrs().push(local);
            info!("Listening on {local}");

            let server = Arc::clone(&self);
            let shutdown = self.shutdown.subscribe();
            tokio::spawn(async move {
                server.accept_loop(listener, shutdown).await;
            });
        }

        if self.config.sessions.enabled {
            let server = Arc::clone(&self);
            let shutdown = self.shutdown.subscribe();
            tokio::spawn(async move {
                server.sweep_loop(shutdown).await;
            });
        }

        Ok(())
    }

    /// Stops the accept loops and the sweep and clears all sessions.
    ///
    /// Requests already dispatched run to completion; their sockets are
    /// still released by their own workers.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            let _ = self.shutdown.send(true);
            self.sessions.clear();
            info!("Server stopped");
        }
    }

    async fn accept_loop(self: Arc<Self>, listener: TcpListener, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        debug!("Accepted connection from {peer}");

                        let server = Arc::clone(&self);
                        tokio::spawn(async move {
                            server.handle_connection(socket, peer).await;
                        });
                    }
                    Err(e) => {
                        warn!("Accept failed: {e}");
                    }
                },

                _ = shutdown.changed() => {
                    debug!("Accept loop shutting down");
                    break;
                }
            }
        }
    }

    /// Worker failure boundary: any error in the per-request sequence is
    /// logged and discarded, and the socket is shut down exactly once on
    /// every exit path.
    async fn handle_connection(&self, mut stream: TcpStream, peer: SocketAddr) {
        if let Err(e) = self.process_request(&mut stream).await {
            debug!("Request from {peer} failed: {e}");
        }

        let _ = stream.shutdown().await;
    }

    async fn process_request(&self, stream: &mut TcpStream) -> anyhow::Result<()> {
        let request = match self.read_request(stream).await? {
            Some(req) => req,
            None => return Ok(()), // client closed without sending a request
        };

        let session = self.resolve_session(&request);

        let form = if request.method == Method::POST && request.is_form_urlencoded() {
            parse_form(&String::from_utf8_lossy(&request.body))
        } else {
            FormData::default()
        };

        let (new_session_id, session) = match session {
            Some((created, s)) => (created.then(|| s.id().to_string()), Some(s)),
            None => (None, None),
        };

        let ctx = RequestContext::new(request, session, form);
        if let Some(id) = new_session_id {
            ctx.set_cookie(SESSION_COOKIE_NAME, id);
        }

        let response = self.dispatch(&ctx).await?;

        ResponseWriter::new(&response).write_to_stream(stream).await
    }

    async fn read_request(&self, stream: &mut TcpStream) -> anyhow::Result<Option<Request>> {
        let mut buffer = BytesMut::with_capacity(4096);

        loop {
            match parse_http_request(&buffer) {
                Ok((request, _consumed)) => return Ok(Some(request)),

                Err(ParseError::Incomplete) => {
                    // Need more data, fall through to read
                }

                Err(e) => {
                    return Err(anyhow::anyhow!("HTTP parse error: {e:?}"));
                }
            }

            let n = stream.read_buf(&mut buffer).await?;

            if n == 0 {
                if buffer.is_empty() {
                    return Ok(None);
                }
                anyhow::bail!("connection closed mid-request");
            }
        }
    }

    /// Resolve-or-create the session for a request; `None` when sessions
    /// are disabled. The boolean is true when the session was just created
    /// and a cookie must be set. Every resolution slides the expiry to
    /// `now + timeout`.
    fn resolve_session(&self, request: &Request) -> Option<(bool, Session)> {
        if !self.config.sessions.enabled {
            return None;
        }

        let ttl = Duration::from_secs(self.config.sessions.timeout_secs);

        let existing = request
            .cookie(SESSION_COOKIE_NAME)
            .and_then(|id| self.sessions.get(id));

        let resolved = match existing {
            Some(session) => {
                session.touch(ttl);
                (false, session)
            }
            None => {
                let session = Session::new(ttl);
                self.sessions.insert(session.clone());
                (true, session)
            }
        };

        Some(resolved)
    }

    /// Chooses and finalizes the result for one request. Handler and hook
    /// panics are caught here and surfaced as errors, so a failing handler
    /// never takes the response stream down with it half-written.
    async fn dispatch(&self, ctx: &RequestContext) -> anyhow::Result<Response> {
        let method = ctx.request().method;
        let path = ctx.request().path().to_string();

        let result = match method {
            Method::GET if is_static_file_request(&path) => {
                let mut result = RequestResult::static_file(&path);

                if let Some(hook) = &self.file_hook {
                    let candidate = resolve_static_path(&path, &self.config.static_files);
                    catch_unwind(AssertUnwindSafe(|| hook(ctx, &candidate, &mut result)))
                        .map_err(|_| anyhow::anyhow!("file hook panicked"))?;
                }

                result
            }

            Method::GET | Method::POST => match self.router.lookup(method, &path) {
                Some(handler) => catch_unwind(AssertUnwindSafe(|| handler(ctx)))
                    .map_err(|_| anyhow::anyhow!("handler panicked"))?,
                None => RequestResult::None,
            },

            Method::OPTIONS => return Ok(options_response(ctx)),

            _ => RequestResult::BadRequest,
        };

        debug!("{method:?} {path} -> {result:?}");

        Ok(result.finalize(ctx, &self.config.static_files).await)
    }

    async fn sweep_loop(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let period = Duration::from_secs(self.config.sessions.timeout_secs);
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // first tick completes immediately

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.is_running() {
                        break;
                    }

                    let removed = self.sessions.sweep_expired(Instant::now());
                    if removed > 0 {
                        debug!("Swept {removed} expired sessions");
                    }
                }

                _ = shutdown.changed() => break,
            }
        }
    }

    fn lock_addrs(&self) -> std::sync::MutexGuard<'_, Vec<SocketAddr>> {
        self.local_addrs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A GET is a static-file request when the path, stripped of its leading
/// separator, is at least 3 characters and carries a dot-extension.
pub fn is_static_file_request(path: &str) -> bool {
    let stripped = path.trim_start_matches('/');

    stripped.len() >= 3 && Path::new(stripped).extension().is_some()
}

/// Fixed CORS preflight answer; no route lookup is involved.
fn options_response(ctx: &RequestContext) -> Response {
    let mut response = ResponseBuilder::new(StatusCode::Ok)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, GET, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .build();

    apply_cookies(&mut response, ctx);

    response
}
