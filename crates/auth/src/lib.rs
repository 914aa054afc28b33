//! `contaerp-auth` — authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: claims are
//! validated deterministically, and token decoding lives behind the
//! `JwtValidator` trait so the API layer can swap implementations in tests.

pub mod claims;
pub mod password;
pub mod principal;
pub mod user;
pub mod validator;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use principal::{PrincipalId, Role};
pub use user::User;
pub use validator::{Hs256JwtIssuer, Hs256JwtValidator, JwtValidator};
