//! Central identity handling for librarium: credential checks and signed tokens.
//! Keep the public surface thin and split implementation across sub-modules.

mod token;
mod provider;

pub use token::{Claims, TokenService, TOKEN_TTL_SECS};
pub use provider::{AuthProvider, LocalAuthProvider, LoginRequest, LoginResponse};
