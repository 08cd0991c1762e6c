//! Catalog listing.
//!
//! Shows every product with its canonical key and the legacy identifiers
//! that still resolve to it, which is what purchase records are matched on.

use ventaro_core::{ProductKey, catalog};

/// One line per product, in landing-page order.
#[must_use]
pub fn lines() -> Vec<String> {
    catalog()
        .iter()
        .map(|product| {
            let aliases: Vec<_> = product.key.legacy_aliases().collect();
            let price = product.compare_at.map_or_else(
                || product.price.to_string(),
                |was| format!("{} (was {was})", product.price),
            );
            format!(
                "{:<8} {:<36} {:<18} aliases: {}",
                product.tier.label(),
                product.key,
                price,
                if aliases.is_empty() {
                    "-".to_string()
                } else {
                    aliases.join(", ")
                }
            )
        })
        .collect()
}

/// Resolve a raw purchase identifier the way the access gate does.
#[must_use]
pub fn resolve(raw: &str) -> Option<ProductKey> {
    ProductKey::resolve(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_list_guide_aliases() {
        let lines = lines();
        assert_eq!(lines.len(), 3);
        let guide = lines
            .iter()
            .find(|l| l.contains("ai-tools-mastery-guide-2025"))
            .map(String::as_str)
            .unwrap_or_default();
        assert!(guide.contains("aliases: ebook, 1"));
        assert!(guide.contains("A$25 (was A$50)"));
    }

    #[test]
    fn test_resolve_matches_gate() {
        assert_eq!(resolve("1"), Some(ProductKey::AiToolsMasteryGuide2025));
        assert_eq!(resolve("Ebook"), None);
    }
}
