//! Purchase records as returned by the purchase-confirmation endpoint.

use serde::{Deserialize, Serialize};

use super::product::ProductKey;

/// A completed purchase.
///
/// Records carry no status; a record's presence is the proof of purchase.
/// Extra fields sent by the upstream are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Raw product identifier, possibly a legacy alias.
    pub product_id: String,
}

impl Purchase {
    /// Resolve the raw identifier to a canonical product, if known.
    #[must_use]
    pub fn product(&self) -> Option<ProductKey> {
        ProductKey::resolve(&self.product_id)
    }

    /// Whether this purchase is for `key` under any of its identifiers.
    #[must_use]
    pub fn is_for(&self, key: ProductKey) -> bool {
        self.product() == Some(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let purchase: Purchase = serde_json::from_str(
            r#"{"product_id":"ebook","user_id":"u1","amount":25,"created_at":"2025-03-01"}"#,
        )
        .unwrap();
        assert!(purchase.is_for(ProductKey::AiToolsMasteryGuide2025));
    }

    #[test]
    fn test_unknown_product() {
        let purchase = Purchase {
            product_id: "gift-card".to_string(),
        };
        assert_eq!(purchase.product(), None);
        assert!(!purchase.is_for(ProductKey::AiToolsMasteryGuide2025));
    }
}
