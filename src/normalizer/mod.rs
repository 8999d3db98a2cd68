pub mod extract;
pub mod rules;
pub mod sanitize;

use chrono::{DateTime, Utc};
use tracing::debug;

use extract::ProcessedProductContent;

pub const DEFAULT_MAX_DESCRIPTION_WORDS: usize = 500;

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub max_description_words: usize,
    /// Emit clearly-flagged placeholder reviews when none can be parsed.
    pub synthetic_reviews: bool,
    /// Reference time for placeholder review dates.
    pub now: DateTime<Utc>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_description_words: DEFAULT_MAX_DESCRIPTION_WORDS,
            synthetic_reviews: false,
            now: Utc::now(),
        }
    }
}

/// Two-step pipeline: raw listing text → sanitized text → structured content.
pub fn process_content(raw: &str, options: &NormalizeOptions) -> ProcessedProductContent {
    let sanitized = sanitize::sanitize(raw);
    debug!(raw_len = raw.len(), clean_len = sanitized.len(), "sanitized listing");
    extract::extract_all(raw, &sanitized, options)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
    }

    fn options(synthetic: bool) -> NormalizeOptions {
        NormalizeOptions {
            synthetic_reviews: synthetic,
            now: Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap(),
            ..NormalizeOptions::default()
        }
    }

    #[test]
    fn empty_input_falls_back() {
        let out = process_content("", &options(false));
        assert!(out.features.is_empty());
        assert!(out.specifications.is_empty());
        assert!(out.images.is_empty());
        assert!(out.review_summary.is_none());
        assert!(out.extracted_reviews.is_none());
        assert!(out.enhanced_review_data.is_none());
        assert!(out.shipping_info.is_none());
        assert!(out.clean_description.contains("Everyday casual wear."));
        assert!(out.clean_description.contains("Weekend outings and relaxed occasions."));
    }

    #[test]
    fn linen_set_listing() {
        let out = process_content(&fixture("linen_set.html"), &options(false));

        assert_eq!(out.specifications.get("Material").map(String::as_str), Some("55% Linen, 45% Cotton"));
        assert_eq!(out.specifications.get("Collar Style").map(String::as_str), Some("Cuban Collar"));
        assert_eq!(out.specifications.get("Set Includes").map(String::as_str), Some("Shirt and Pants"));
        assert!(out.features.iter().any(|f| f.starts_with("Lightweight")));
        assert!(out.features.iter().any(|f| f.starts_with("Retro")));

        assert_eq!(out.images, vec![
            "https://m.media-amazon.com/images/I/71linen-front.jpg".to_string(),
            "https://m.media-amazon.com/images/I/71linen-back.png".to_string(),
        ]);
        assert_eq!(out.videos, vec!["https://m.media-amazon.com/videos/linen-set.mp4".to_string()]);

        let ship = out.shipping_info.unwrap();
        assert_eq!(ship.dimensions.as_deref(), Some("12.71\" × 10.39\" × 1.3\""));
        assert_eq!(ship.weight.as_deref(), Some("1.23 lbs"));
        assert_eq!(ship.sku.as_deref(), Some("B0CXYZ1234"));
        assert_eq!(ship.origin.as_deref(), Some("Mens"));
        assert_eq!(ship.first_available.as_deref(), Some("March 4, 2024"));
        assert_eq!(ship.bestseller_rank.as_deref(), Some("#23,456 in Clothing, Shoes & Jewelry"));
        assert_eq!(ship.shipping_priority.as_deref(), Some("High Priority - Popular Item"));
        assert_eq!(ship.care_instructions.as_deref(), Some("Machine wash cold, tumble dry low"));

        let summary = out.review_summary.unwrap();
        assert_eq!(summary.average_rating, Some(4.3));
        assert_eq!(summary.total_reviews, Some(1287));
        assert!(!summary.highlights.is_empty());

        let reviews = out.extracted_reviews.unwrap();
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| !r.synthetic));
        assert_eq!(reviews[0].reviewer_name, "Daniel K.");
        assert_eq!(reviews[0].date, "2024-05-12");

        let enhanced = out.enhanced_review_data.unwrap();
        assert_eq!(enhanced.total_reviews, 1287);
        assert_eq!(enhanced.sentiment_analysis.positive, 50);
    }

    #[test]
    fn script_noise_does_not_leak() {
        let out = process_content(&fixture("linen_set.html"), &options(false));
        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("ue.count"));
        assert!(!json.contains("P.when"));
        assert!(!json.contains("<script"));
    }

    #[test]
    fn placeholder_reviews_only_when_enabled() {
        let raw = "Customers say the fabric feels soft and breathable in hot weather. \
                   Buyers mention the fit runs slightly large overall. AI Generated from reviews \
                   4.1 out of 5 stars 312 global ratings";
        let off = process_content(raw, &options(false));
        assert!(off.extracted_reviews.is_none());
        assert!(off.enhanced_review_data.is_none());

        let on = process_content(raw, &options(true));
        let reviews = on.extracted_reviews.unwrap();
        assert_eq!(reviews.len(), 3);
        assert!(reviews.iter().all(|r| r.synthetic));
        assert_eq!(reviews[0].date, "2024-06-23");
        assert!(on.enhanced_review_data.is_some());
    }

    #[test]
    fn description_respects_word_limit() {
        let long = "Lightweight beach shirt that is breathable and comfortable. ".repeat(200);
        let raw = format!("Product Description ACME {}", long);
        let out = process_content(&raw, &options(false));
        assert!(out.clean_description.split_whitespace().count() <= 500);
    }

    #[test]
    fn serializes_camel_case() {
        let out = process_content(&fixture("linen_set.html"), &options(false));
        let value = serde_json::to_value(&out).unwrap();
        assert!(value.get("cleanDescription").is_some());
        assert!(value["shippingInfo"].get("bestselerRank").is_some());
        assert!(value["enhancedReviewData"]["ratingDistribution"].get("5").is_some());
    }
}
