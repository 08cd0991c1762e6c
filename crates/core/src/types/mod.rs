//! Core types for Ventaro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod purchase;

pub use email::{Email, EmailError};
pub use id::UserId;
pub use price::{CurrencyCode, Price};
pub use product::{LEGACY_ALIASES, Product, ProductKey, Tier, catalog};
pub use purchase::Purchase;
