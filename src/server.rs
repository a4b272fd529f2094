//!
//! librarium HTTP server
//! ---------------------
//! This module defines the Axum-based HTTP API for the librarium bookstore.
//!
//! Responsibilities:
//! - Registration and login endpoints backed by the `directory` and `identity` modules.
//! - Public catalog queries: full listing, ISBN lookup, author/title filters and reviews.
//! - Authenticated review upsert/delete gated by a signed bearer token
//!   (Authorization header, with a session cookie fallback set on login).
//! - Startup catalog seeding and inventory logs.

use std::net::SocketAddr;

use axum::{routing::{get, post, put}, Router, extract::{State, Path, Query}, Json};
use axum::response::IntoResponse;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, error};

use crate::catalog::SharedCatalog;
use crate::directory::SharedDirectory;
use crate::error::AppError;
use crate::identity::{AuthProvider, LocalAuthProvider, LoginRequest, TokenService};

const SESSION_COOKIE: &str = "librarium_session";

/// Fallback signing secret when neither the flag nor the environment provides one.
pub const DEFAULT_TOKEN_SECRET: &str = "access";

/// Shared server state injected into all handlers.
///
/// Holds the catalog and user directory handles plus the token service; all are
/// cheap clones over `Arc`ed interiors. The resolved username from a verified
/// token is passed explicitly into review operations, never read from payloads.
#[derive(Clone)]
pub struct AppState {
    pub catalog: SharedCatalog,
    pub directory: SharedDirectory,
    pub tokens: TokenService,
    pub auth: LocalAuthProvider,
}

impl AppState {
    pub fn new(catalog: SharedCatalog, directory: SharedDirectory, token_secret: &str) -> Self {
        let tokens = TokenService::new(token_secret);
        let auth = LocalAuthProvider::new(directory.clone(), tokens.clone());
        Self { catalog, directory, tokens, auth }
    }
}

/// Log the seeded inventory on startup so something always prints at default verbosity.
fn log_startup_inventory(catalog: &SharedCatalog, directory: &SharedDirectory) {
    let books = catalog.list_all();
    if books.is_empty() {
        println!("No books in catalog");
        tracing::info!("No books in catalog");
        return;
    }
    println!("Installed catalog ({} books):", books.len());
    tracing::info!("Installed catalog ({} books):", books.len());
    for (isbn, book) in books.iter() {
        println!("- {}: {} by {}", isbn, book.title, book.author);
        tracing::info!("- {}: {} by {}", isbn, book.title, book.author);
    }
    tracing::info!("User directory initialized ({} users)", directory.len());
}

/// Start the librarium HTTP server bound to the given port.
///
/// This seeds the catalog, prints the installed inventory, mounts all routes and
/// serves until a shutdown signal arrives.
pub async fn run_with_config(http_port: u16, token_secret: &str) -> anyhow::Result<()> {
    let catalog = SharedCatalog::seeded();
    let directory = SharedDirectory::new();
    log_startup_inventory(&catalog, &directory);

    let app_state = AppState::new(catalog, directory, token_secret);

    let app = Router::new()
        .route("/", get(list_books))
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/isbn/{isbn}", get(book_by_isbn))
        .route("/author/{author}", get(books_by_author))
        .route("/title/{title}", get(books_by_title))
        .route("/review/{isbn}", get(book_reviews))
        .route("/auth/review/{isbn}", put(put_review).delete(remove_review))
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

// Backward-compatible entry that uses defaults
/// Convenience entry point using the default port (7878) and token secret.
pub async fn run() -> anyhow::Result<()> {
    run_with_config(7878, DEFAULT_TOKEN_SECRET).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[derive(Debug, Deserialize)]
struct RegisterPayload { username: Option<String>, password: Option<String> }

#[derive(Debug, Deserialize)]
struct LoginPayload { username: Option<String>, password: Option<String> }

#[derive(Debug, Deserialize)]
struct ReviewQuery { review: Option<String> }

fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name { return Some(v[1..].to_string()); }
        }
    }
    None
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization").or_else(|| headers.get("Authorization"))?;
    let s = value.to_str().ok()?;
    let token = s.strip_prefix("Bearer ").or_else(|| s.strip_prefix("bearer "))?;
    let token = token.trim();
    if token.is_empty() { None } else { Some(token.to_string()) }
}

fn get_token_from_headers(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| parse_cookie(headers, SESSION_COOKIE))
}

/// Resolve the acting username from the request headers, or fail with an auth error.
fn get_username_from_headers(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    let Some(token) = get_token_from_headers(headers) else {
        return Err(AppError::auth("missing_token", "Authentication token is required"));
    };
    state.tokens.resolve(&token)
}

fn set_session_cookie(token: &str) -> HeaderValue {
    // HttpOnly cookie scoped to path / with SameSite=Strict
    HeaderValue::from_str(&format!("{}={}; HttpOnly; Secure; SameSite=Strict; Path=/", SESSION_COOKIE, token)).unwrap()
}

/// Map an `AppError` to the structured JSON error envelope.
fn error_response(err: &AppError) -> (StatusCode, Json<serde_json::Value>) {
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"status":"error","code": err.code_str(), "message": err.message()})))
}

fn field_presence(value: &str) -> &'static str {
    if value.is_empty() { "missing" } else { "provided" }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status":"ok","service":"librarium"})))
}

async fn register(State(state): State<AppState>, Json(payload): Json<RegisterPayload>) -> impl IntoResponse {
    let username = payload.username.as_deref().unwrap_or("");
    let password = payload.password.as_deref().unwrap_or("");
    if username.is_empty() || password.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({
            "status": "error",
            "code": "missing_fields",
            "message": "Registration failed: Username and password are required",
            "details": {
                "username": field_presence(username),
                "password": field_presence(password),
            }
        })));
    }
    match state.directory.register(username, password) {
        Ok(()) => {
            info!("registered user {}", username);
            (StatusCode::CREATED, Json(json!({
                "status": "ok",
                "message": "User registered successfully",
                "username": username
            })))
        }
        Err(e) => error_response(&e),
    }
}

async fn login(State(state): State<AppState>, Json(payload): Json<LoginPayload>) -> impl IntoResponse {
    let username = payload.username.as_deref().unwrap_or("");
    let password = payload.password.as_deref().unwrap_or("");
    if username.is_empty() || password.is_empty() {
        return (StatusCode::BAD_REQUEST, HeaderMap::new(), Json(json!({
            "status": "error",
            "code": "missing_fields",
            "message": "Login failed: Username and password are required",
            "details": {
                "username": field_presence(username),
                "password": field_presence(password),
            }
        })));
    }
    let req = LoginRequest { username: username.to_string(), password: password.to_string() };
    match state.auth.login(&req) {
        Ok(resp) => {
            let mut headers = HeaderMap::new();
            headers.insert("Set-Cookie", set_session_cookie(&resp.token));
            (StatusCode::OK, headers, Json(json!({
                "status": "ok",
                "message": "Login successful",
                "username": resp.username,
                "token": resp.token
            })))
        }
        Err(e) => {
            if e.http_status() >= 500 { error!("login error: {e}"); }
            let (status, body) = error_response(&e);
            (status, HeaderMap::new(), body)
        }
    }
}

async fn list_books(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!(state.catalog.list_all())))
}

async fn book_by_isbn(State(state): State<AppState>, Path(isbn): Path<String>) -> impl IntoResponse {
    match state.catalog.get_by_isbn(&isbn) {
        Ok(book) => (StatusCode::OK, Json(json!(book))),
        Err(e) => error_response(&e),
    }
}

async fn books_by_author(State(state): State<AppState>, Path(author): Path<String>) -> impl IntoResponse {
    match state.catalog.get_by_author(&author) {
        Ok(matches) => (StatusCode::OK, Json(json!(matches))),
        Err(e) => error_response(&e),
    }
}

async fn books_by_title(State(state): State<AppState>, Path(title): Path<String>) -> impl IntoResponse {
    match state.catalog.get_by_title(&title) {
        Ok(matches) => (StatusCode::OK, Json(json!(matches))),
        Err(e) => error_response(&e),
    }
}

async fn book_reviews(State(state): State<AppState>, Path(isbn): Path<String>) -> impl IntoResponse {
    match state.catalog.get_reviews(&isbn) {
        Ok(reviews) => (StatusCode::OK, Json(json!({"isbn": isbn, "reviews": reviews}))),
        Err(e) => error_response(&e),
    }
}

async fn put_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(isbn): Path<String>,
    Query(params): Query<ReviewQuery>,
) -> impl IntoResponse {
    let username = match get_username_from_headers(&state, &headers) {
        Ok(u) => u,
        Err(e) => return error_response(&e),
    };
    let review = params.review.unwrap_or_default();
    match state.catalog.upsert_review(&isbn, &username, &review) {
        Ok(()) => (StatusCode::OK, Json(json!({
            "status": "ok",
            "message": "Review successfully added/updated",
            "isbn": isbn,
            "username": username,
            "review": review
        }))),
        Err(e) => error_response(&e),
    }
}

async fn remove_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(isbn): Path<String>,
) -> impl IntoResponse {
    let username = match get_username_from_headers(&state, &headers) {
        Ok(u) => u,
        Err(e) => return error_response(&e),
    };
    match state.catalog.delete_review(&isbn, &username) {
        Ok(()) => (StatusCode::OK, Json(json!({
            "status": "ok",
            "message": "Review successfully deleted",
            "isbn": isbn,
            "username": username
        }))),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod server_tests;
