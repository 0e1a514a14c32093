use std::sync::Arc;

use serde_json::json;

use tinyweb::config::Config;
use tinyweb::result::RequestResult;
use tinyweb::server::WebServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let mut ws = WebServer::new(cfg)?;

    ws.get("/", |_| RequestResult::redirect("/home"));
    ws.get("/home", |ctx| {
        if ctx.session().and_then(|s| s.get("user")).is_none() {
            return RequestResult::redirect("/login");
        }
        RequestResult::static_file("/home.html")
    });

    ws.get("/login", |ctx| {
        if ctx.session().and_then(|s| s.get("user")).is_none() {
            return RequestResult::static_file("/login.html");
        }
        RequestResult::redirect("/home")
    });

    ws.post("/login", |ctx| {
        let user = ctx.form().get("userName").unwrap_or_default();
        let password = ctx.form().get("password").unwrap_or_default();

        if user == "admin" && password == "admin" {
            if let Some(session) = ctx.session() {
                session.set("user", json!({ "userName": user }));
            }
            return RequestResult::redirect("/home");
        }

        RequestResult::redirect("/login")
    });

    ws.get("/logout", |ctx| {
        if let Some(session) = ctx.session() {
            session.remove("user");
        }
        RequestResult::redirect("/login")
    });

    ws.get("/api/session", |ctx| {
        let id = ctx.session().map(|s| s.id().to_string()).unwrap_or_default();
        RequestResult::text(
            json!({ "sessionId": id }).to_string(),
            "application/json",
        )
    });

    ws.get("/api/values", |ctx| {
        if ctx.session().and_then(|s| s.get("user")).is_none() {
            return RequestResult::redirect("/login");
        }
        RequestResult::text("[1,2,3,4]", "application/json")
    });

    // Served pages go through the login flow, never by direct file name.
    ws.on_file_request(Box::new(|_ctx, path, result| {
        let is_html = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("html"));

        if is_html {
            *result = RequestResult::redirect("/");
        }
    }));

    let ws = Arc::new(ws);
    ws.clone().run().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    ws.stop();

    Ok(())
}
