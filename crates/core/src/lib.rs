//! Ventaro Core - Shared domain types.
//!
//! This crate provides the types shared by the Ventaro components:
//! - `storefront` - Public landing page, consultation form, and gated downloads
//! - `cli` - Command-line tools for migrations and access checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for user IDs, emails, prices, and the product catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
