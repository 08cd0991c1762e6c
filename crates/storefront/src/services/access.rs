//! Access gate for digital downloads.
//!
//! Decides whether a visitor may see a gated product. The decision is made
//! before anything is rendered, and every failure path denies access.

use std::future::Future;

use tracing::instrument;
use ventaro_core::{Email, ProductKey, Purchase, UserId};

use crate::models::CurrentUser;
use crate::upstream::{ApiError, UpstreamClient};

/// Source of a user's purchase history.
pub trait PurchaseSource: Send + Sync {
    /// Fetch all purchases recorded for `user_id`.
    fn purchases_for(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Purchase>, ApiError>> + Send;
}

impl PurchaseSource for UpstreamClient {
    fn purchases_for(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<Purchase>, ApiError>> + Send {
        self.confirm_purchases(user_id)
    }
}

/// Who bypasses the purchase check, and which product is gated.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub admin_email: Email,
    pub product: ProductKey,
}

impl AccessPolicy {
    #[must_use]
    pub const fn new(admin_email: Email, product: ProductKey) -> Self {
        Self {
            admin_email,
            product,
        }
    }

    /// Exact, case-sensitive comparison against the admin address.
    #[must_use]
    pub fn is_admin(&self, user: &CurrentUser) -> bool {
        user.email == self.admin_email
    }
}

/// Why access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantReason {
    Admin,
    Purchased,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No signed-in user, or the user has no ID.
    Anonymous,
    /// Purchases were fetched and none matched.
    NotPurchased,
    /// Purchases could not be fetched; ownership is unknown.
    LookupFailed,
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted(GrantReason),
    Denied(DenyReason),
}

impl AccessDecision {
    #[must_use]
    pub const fn has_access(self) -> bool {
        matches!(self, Self::Granted(_))
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Granted(GrantReason::Admin))
    }

    /// Denied because the purchase lookup failed, not because of a missing purchase.
    #[must_use]
    pub const fn is_unverified(self) -> bool {
        matches!(self, Self::Denied(DenyReason::LookupFailed))
    }
}

/// Decide whether `user` may access the policy's product.
///
/// 1. No user or an empty user ID: denied, no request made.
/// 2. Admin email: granted, no request made.
/// 3. Otherwise one purchase lookup; granted iff any purchase resolves to the
///    gated product. Lookup errors are logged and deny access.
#[instrument(skip_all, fields(product = %policy.product))]
pub async fn check_access<P: PurchaseSource>(
    source: &P,
    policy: &AccessPolicy,
    user: Option<&CurrentUser>,
) -> AccessDecision {
    let Some(user) = user.filter(|u| !u.id.is_empty()) else {
        return AccessDecision::Denied(DenyReason::Anonymous);
    };

    if policy.is_admin(user) {
        tracing::debug!(user_id = %user.id, "Admin access granted");
        return AccessDecision::Granted(GrantReason::Admin);
    }

    match source.purchases_for(&user.id).await {
        Ok(purchases) => {
            if purchases.iter().any(|p| p.is_for(policy.product)) {
                AccessDecision::Granted(GrantReason::Purchased)
            } else {
                tracing::debug!(user_id = %user.id, count = purchases.len(), "No matching purchase");
                AccessDecision::Denied(DenyReason::NotPurchased)
            }
        }
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "Failed to fetch user purchases");
            AccessDecision::Denied(DenyReason::LookupFailed)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const ADMIN: &str = "chris.t@ventarosales.com";

    /// Canned purchase source that records every lookup.
    struct FakePurchases {
        result: fn() -> Result<Vec<Purchase>, ApiError>,
        calls: Mutex<Vec<String>>,
    }

    impl FakePurchases {
        fn new(result: fn() -> Result<Vec<Purchase>, ApiError>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PurchaseSource for FakePurchases {
        async fn purchases_for(&self, user_id: &UserId) -> Result<Vec<Purchase>, ApiError> {
            self.calls.lock().unwrap().push(user_id.to_string());
            (self.result)()
        }
    }

    fn purchases(ids: &[&str]) -> Vec<Purchase> {
        ids.iter()
            .map(|id| Purchase {
                product_id: (*id).to_string(),
            })
            .collect()
    }

    fn policy() -> AccessPolicy {
        AccessPolicy::new(
            Email::parse(ADMIN).unwrap(),
            ProductKey::AiToolsMasteryGuide2025,
        )
    }

    fn user(id: &str, email: &str) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            email: Email::parse(email).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_anonymous_is_denied_without_lookup() {
        let source = FakePurchases::new(|| Ok(purchases(&["ebook"])));

        let decision = check_access(&source, &policy(), None).await;

        assert_eq!(decision, AccessDecision::Denied(DenyReason::Anonymous));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_user_id_is_denied_even_for_admin() {
        let source = FakePurchases::new(|| Ok(purchases(&["ebook"])));

        let decision = check_access(&source, &policy(), Some(&user("", ADMIN))).await;

        assert!(!decision.has_access());
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_user_id_is_anonymous() {
        let source = FakePurchases::new(|| Ok(purchases(&["ebook"])));

        let decision =
            check_access(&source, &policy(), Some(&user("  ", "buyer@example.com"))).await;

        assert_eq!(decision, AccessDecision::Denied(DenyReason::Anonymous));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_admin_is_granted_regardless_of_purchases() {
        let source = FakePurchases::new(|| {
            Err(ApiError::Api {
                status: 500,
                message: None,
            })
        });

        let decision = check_access(&source, &policy(), Some(&user("u_admin", ADMIN))).await;

        assert_eq!(decision, AccessDecision::Granted(GrantReason::Admin));
        assert!(decision.is_admin());
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_admin_match_is_case_sensitive() {
        let source = FakePurchases::new(|| Ok(Vec::new()));

        let decision = check_access(
            &source,
            &policy(),
            Some(&user("u_admin", "Chris.T@ventarosales.com")),
        )
        .await;

        assert_eq!(decision, AccessDecision::Denied(DenyReason::NotPurchased));
        assert_eq!(source.calls(), vec!["u_admin".to_string()]);
    }

    #[tokio::test]
    async fn test_each_alias_grants_access() {
        type Canned = fn() -> Result<Vec<Purchase>, ApiError>;
        let cases: [(&str, Canned); 3] = [
            ("ebook", || Ok(purchases(&["2", "ebook"]))),
            ("1", || Ok(purchases(&["1"]))),
            ("ai-tools-mastery-guide-2025", || {
                Ok(purchases(&["3", "ai-tools-mastery-guide-2025"]))
            }),
        ];

        for (alias, result) in cases {
            let source = FakePurchases::new(result);

            let decision =
                check_access(&source, &policy(), Some(&user("u_42", "buyer@example.com"))).await;

            assert_eq!(
                decision,
                AccessDecision::Granted(GrantReason::Purchased),
                "purchase recorded as {alias} should grant access"
            );
        }
    }

    #[tokio::test]
    async fn test_other_products_do_not_grant_access() {
        let source = FakePurchases::new(|| Ok(purchases(&["2", "3", "EBOOK", "ebook "])));

        let decision =
            check_access(&source, &policy(), Some(&user("u_42", "buyer@example.com"))).await;

        assert_eq!(decision, AccessDecision::Denied(DenyReason::NotPurchased));
        assert!(!decision.is_unverified());
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_closed() {
        let source = FakePurchases::new(|| Err(ApiError::Parse("unexpected body".to_string())));

        let decision =
            check_access(&source, &policy(), Some(&user("u_42", "buyer@example.com"))).await;

        assert!(!decision.has_access());
        assert!(decision.is_unverified());
        assert_eq!(source.calls(), vec!["u_42".to_string()]);
    }
}
