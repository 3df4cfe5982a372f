//! Identity adapters.
//!
//! Implementations of the `IdentityProvider` port:
//!
//! - `JwtIdentityProvider` - HS256 bearer tokens
//! - `MockIdentityProvider` - Token table for tests
//! - `DevIdentityProvider` - Treats the token as the user id (local only)

mod jwt;
mod mock;

pub use jwt::{IdentityClaims, JwtIdentityProvider};
pub use mock::{DevIdentityProvider, MockIdentityProvider};
