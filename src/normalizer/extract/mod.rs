pub mod aggregate;
pub mod description;
pub mod media;
pub mod reviews;
pub mod shipping;
pub mod specs;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::NormalizeOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedProductContent {
    pub clean_description: String,
    pub specifications: BTreeMap<String, String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_summary: Option<ReviewSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_reviews: Option<Vec<ExtractedReview>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_review_data: Option<EnhancedReviewData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<ShippingInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub average_rating: Option<f64>,
    pub total_reviews: Option<u32>,
    pub highlights: Vec<String>,
    /// A "Customers say" section was present, even if no sentence was kept.
    #[serde(default)]
    pub customer_section: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedReview {
    pub id: String,
    /// 1..=5
    pub rating: u8,
    pub reviewer_name: String,
    pub comment: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub helpful: u32,
    pub verified: bool,
    pub has_photos: bool,
    /// Placeholder record, not parsed from the listing.
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedReviewData {
    pub average_rating: f64,
    pub total_reviews: u32,
    /// Star value -> rounded percentage of extracted reviews.
    pub rating_distribution: BTreeMap<u8, u32>,
    pub sentiment_analysis: Sentiment,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: u32,
    pub neutral: u32,
    pub critical: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_priority: Option<String>,
    // Wire name kept as the storefront reads it.
    #[serde(rename = "bestselerRank", skip_serializing_if = "Option::is_none")]
    pub bestseller_rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_instructions: Option<String>,
}

impl ShippingInfo {
    pub fn is_empty(&self) -> bool {
        *self == ShippingInfo::default()
    }
}

/// Run every extractor over the same input and merge the results.
/// `raw` is only used where markup carries data (media URLs).
pub fn extract_all(raw: &str, sanitized: &str, options: &NormalizeOptions) -> ProcessedProductContent {
    let clean_description = description::extract(sanitized, options.max_description_words);
    let specifications = specs::specifications(sanitized);
    let features = specs::features(sanitized);
    let images = media::images(raw);
    let videos = media::videos(raw);
    let review_summary = reviews::summary(sanitized);

    let mut review_rows = reviews::parse_reviews(sanitized);
    if review_rows.is_empty() && options.synthetic_reviews {
        review_rows = reviews::synthetic_reviews(review_summary.as_ref(), &features, options.now);
        debug!(count = review_rows.len(), "synthesized placeholder reviews");
    }
    let extracted_reviews = if review_rows.is_empty() {
        None
    } else {
        Some(review_rows)
    };

    let enhanced_review_data =
        aggregate::enhance(review_summary.as_ref(), extracted_reviews.as_deref());
    let shipping_info = shipping::extract(sanitized);

    debug!(
        specs = specifications.len(),
        features = features.len(),
        images = images.len(),
        videos = videos.len(),
        reviews = extracted_reviews.as_ref().map_or(0, Vec::len),
        shipping = shipping_info.is_some(),
        "extracted product content"
    );

    ProcessedProductContent {
        clean_description,
        specifications,
        features,
        images,
        videos,
        review_summary,
        extracted_reviews,
        enhanced_review_data,
        shipping_info,
    }
}
