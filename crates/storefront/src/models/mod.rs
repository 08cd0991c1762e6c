//! Domain models for storefront.
//!
//! Users, purchases, and leads live in the upstream API; the storefront only
//! keeps the signed-in identity in its session.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
