// Keep provider request/response plain Rust structs; payload parsing stays in the HTTP layer
use crate::directory::SharedDirectory;
use crate::error::{AppError, AppResult};
use crate::tprintln;

use super::token::TokenService;

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

pub trait AuthProvider: Send + Sync {
    fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse>;
}

/// Directory-backed provider: validates fields, checks credentials by direct
/// equality, and issues a signed token bound to the username.
#[derive(Clone)]
pub struct LocalAuthProvider {
    pub directory: SharedDirectory,
    pub tokens: TokenService,
}

impl LocalAuthProvider {
    pub fn new(directory: SharedDirectory, tokens: TokenService) -> Self {
        Self { directory, tokens }
    }
}

impl AuthProvider for LocalAuthProvider {
    fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse> {
        if req.username.is_empty() || req.password.is_empty() {
            return Err(AppError::user("missing_fields", "Login failed: Username and password are required"));
        }
        if !self.directory.authenticate(&req.username, &req.password) {
            return Err(AppError::auth("invalid_credentials", "Login failed: Username or password is incorrect"));
        }
        let token = self.tokens.issue(&req.username)?;
        tprintln!("auth.login user={}", req.username);
        Ok(LoginResponse { username: req.username.clone(), token })
    }
}
