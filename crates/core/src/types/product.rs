//! Product catalog and identity resolution.
//!
//! Every product has one canonical key. Purchase records written by older
//! versions of the checkout use other identifiers (`ebook`, `1`, ...); those
//! are listed in [`LEGACY_ALIASES`] and resolve to the canonical key. Code
//! that compares products must go through [`ProductKey::resolve`] rather than
//! comparing raw strings.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Canonical product keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKey {
    /// LITE tier: prompt collection.
    #[serde(rename = "ai-prompts-arsenal-2025")]
    AiPromptsArsenal2025,
    /// ADVANCE tier: the e-book behind the download gate.
    #[serde(rename = "ai-tools-mastery-guide-2025")]
    AiToolsMasteryGuide2025,
    /// PRO tier: coaching session.
    #[serde(rename = "ai-business-strategy-session-2025")]
    AiBusinessStrategySession2025,
}

/// Identifiers found in historical purchase records, mapped to canonical keys.
///
/// Compatibility shim only. New records must use [`ProductKey::as_str`].
pub const LEGACY_ALIASES: &[(&str, ProductKey)] = &[
    ("ebook", ProductKey::AiToolsMasteryGuide2025),
    ("1", ProductKey::AiToolsMasteryGuide2025),
    ("2", ProductKey::AiPromptsArsenal2025),
    ("3", ProductKey::AiBusinessStrategySession2025),
];

impl ProductKey {
    /// All products, in catalog order.
    pub const ALL: [Self; 3] = [
        Self::AiPromptsArsenal2025,
        Self::AiToolsMasteryGuide2025,
        Self::AiBusinessStrategySession2025,
    ];

    /// The canonical string key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AiPromptsArsenal2025 => "ai-prompts-arsenal-2025",
            Self::AiToolsMasteryGuide2025 => "ai-tools-mastery-guide-2025",
            Self::AiBusinessStrategySession2025 => "ai-business-strategy-session-2025",
        }
    }

    /// Resolve a raw product identifier (canonical or legacy) to a key.
    ///
    /// Matching is exact: no trimming, no case folding.
    #[must_use]
    pub fn resolve(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == raw)
            .or_else(|| {
                LEGACY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == raw)
                    .map(|(_, key)| *key)
            })
    }

    /// Legacy identifiers that resolve to this key.
    pub fn legacy_aliases(self) -> impl Iterator<Item = &'static str> {
        LEGACY_ALIASES
            .iter()
            .filter(move |(_, key)| *key == self)
            .map(|(alias, _)| *alias)
    }

    /// Catalog entry for this key.
    #[must_use]
    pub fn product(self) -> &'static Product {
        match self {
            Self::AiPromptsArsenal2025 => &CATALOG[0],
            Self::AiToolsMasteryGuide2025 => &CATALOG[1],
            Self::AiBusinessStrategySession2025 => &CATALOG[2],
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Pricing tier shown on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Lite,
    Advance,
    Pro,
}

impl Tier {
    /// Badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lite => "LITE",
            Self::Advance => "ADVANCE",
            Self::Pro => "PRO",
        }
    }

    /// CSS modifier used by the pricing cards.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Lite => "tier-lite",
            Self::Advance => "tier-advance",
            Self::Pro => "tier-pro",
        }
    }
}

/// A catalog product as sold on the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub key: ProductKey,
    pub tier: Tier,
    pub title: &'static str,
    pub summary: &'static str,
    pub highlights: &'static [&'static str],
    pub price: Price,
    /// Original price shown struck through, if discounted.
    pub compare_at: Option<Price>,
    /// Promotional line shown under the price.
    pub promo: &'static str,
    pub cta_label: &'static str,
    pub cta_href: &'static str,
    /// Highlighted as the most popular tier.
    pub popular: bool,
}

impl Product {
    /// Percentage saved against the compare-at price.
    #[must_use]
    pub fn percent_off(&self) -> Option<u32> {
        self.compare_at
            .as_ref()
            .and_then(|compare_at| self.price.percent_off(compare_at))
    }
}

static CATALOG: [Product; 3] = [
    Product {
        key: ProductKey::AiPromptsArsenal2025,
        tier: Tier::Lite,
        title: "AI Prompts Arsenal 2025",
        summary: "30 professional AI prompts across multiple business categories. Expertly crafted for content creation, marketing, SEO, business automation, e-commerce, and personal branding.",
        highlights: &[
            "Business, marketing & SEO prompts",
            "Creative & e-commerce templates",
            "Personal branding & networking tools",
        ],
        price: Price::aud(10),
        compare_at: None,
        promo: "One-time payment",
        cta_label: "Get Started",
        cta_href: "/products/2",
        popular: false,
    },
    Product {
        key: ProductKey::AiToolsMasteryGuide2025,
        tier: Tier::Advance,
        title: "AI Tools Mastery Guide 2025",
        summary: "Complete 30-lesson guide to making money with AI in 2025. Each lesson focuses on a specific AI tool or business strategy with clear action steps and practical implementation examples.",
        highlights: &[
            "Master advanced AI platform techniques",
            "Build profitable AI-powered businesses",
            "Step-by-step implementation guides",
            "Complete 30/90/365-day roadmap",
        ],
        price: Price::aud(25),
        compare_at: Some(Price::aud(50)),
        promo: "50% OFF Launch Price",
        cta_label: "Get Advanced",
        cta_href: "/products/1",
        popular: true,
    },
    Product {
        key: ProductKey::AiBusinessStrategySession2025,
        tier: Tier::Pro,
        title: "AI Business Strategy Session 2025",
        summary: "60-minute coaching session to learn how to make money online with AI tools and AI prompts. Get personalized strategies.",
        highlights: &[
            "Live 60-minute video coaching session",
            "Master ChatGPT for business applications",
            "Learn Vercel deployment from scratch",
            "Comprehensive implementation report",
        ],
        price: Price::aud(500),
        compare_at: Some(Price::aud(3000)),
        promo: "LAUNCH OFFER - 83% OFF",
        cta_label: "Go Pro",
        cta_href: "/products/3",
        popular: false,
    },
];

/// The full catalog in display order.
#[must_use]
pub fn catalog() -> &'static [Product] {
    &CATALOG
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_guide_resolves_from_all_three_identifiers() {
        for raw in ["ebook", "1", "ai-tools-mastery-guide-2025"] {
            assert_eq!(
                ProductKey::resolve(raw),
                Some(ProductKey::AiToolsMasteryGuide2025),
                "{raw} should resolve to the guide"
            );
        }
    }

    #[test]
    fn test_resolve_is_exact() {
        assert_eq!(ProductKey::resolve("EBOOK"), None);
        assert_eq!(ProductKey::resolve(" ebook"), None);
        assert_eq!(ProductKey::resolve("01"), None);
        assert_eq!(ProductKey::resolve(""), None);
    }

    #[test]
    fn test_aliases_never_shadow_canonical_keys() {
        for (alias, _) in LEGACY_ALIASES {
            assert!(
                ProductKey::ALL.iter().all(|key| key.as_str() != *alias),
                "{alias} collides with a canonical key"
            );
        }
    }

    #[test]
    fn test_legacy_aliases_for_guide() {
        let aliases: Vec<_> = ProductKey::AiToolsMasteryGuide2025
            .legacy_aliases()
            .collect();
        assert_eq!(aliases, vec!["ebook", "1"]);
    }

    #[test]
    fn test_catalog_entries_match_their_keys() {
        for key in ProductKey::ALL {
            assert_eq!(key.product().key, key);
        }
        assert_eq!(catalog().len(), 3);
        assert_eq!(catalog().iter().filter(|p| p.popular).count(), 1);
    }

    #[test]
    fn test_promo_matches_computed_discount() {
        let guide = ProductKey::AiToolsMasteryGuide2025.product();
        assert_eq!(guide.percent_off(), Some(50));
        let session = ProductKey::AiBusinessStrategySession2025.product();
        assert_eq!(session.percent_off(), Some(83));
        let prompts = ProductKey::AiPromptsArsenal2025.product();
        assert_eq!(prompts.percent_off(), None);
    }

    #[test]
    fn test_serde_uses_canonical_key() {
        let json = serde_json::to_string(&ProductKey::AiToolsMasteryGuide2025).unwrap();
        assert_eq!(json, "\"ai-tools-mastery-guide-2025\"");
    }
}
