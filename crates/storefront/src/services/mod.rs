//! Business logic for the storefront.
//!
//! # Services
//!
//! - `access` - Purchase-based access gate for digital downloads
//! - `consultation` - Consultation lead form and submission

pub mod access;
pub mod consultation;

pub use access::{AccessDecision, AccessPolicy, PurchaseSource, check_access};
pub use consultation::{ConsultationForm, SubmissionGuard, SubmitOutcome};
