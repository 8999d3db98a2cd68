use std::collections::BTreeMap;

use super::{EnhancedReviewData, ExtractedReview, ReviewSummary, Sentiment};

/// Distribution and sentiment over the extracted reviews. Needs both a
/// listing summary and at least one review; percentages are rounded per
/// bucket and need not sum to 100.
pub fn enhance(
    summary: Option<&ReviewSummary>,
    reviews: Option<&[ExtractedReview]>,
) -> Option<EnhancedReviewData> {
    let summary = summary?;
    let reviews = reviews.filter(|r| !r.is_empty())?;

    let mut counts = [0u32; 5];
    for r in reviews {
        let star = r.rating.clamp(1, 5);
        counts[usize::from(star - 1)] += 1;
    }
    let n = reviews.len() as f64;
    let pct = |c: u32| (f64::from(c) * 100.0 / n).round() as u32;

    let rating_distribution: BTreeMap<u8, u32> =
        (1..=5u8).map(|star| (star, pct(counts[usize::from(star - 1)]))).collect();
    let sentiment_analysis = Sentiment {
        positive: pct(counts[3] + counts[4]),
        neutral: pct(counts[2]),
        critical: pct(counts[0] + counts[1]),
    };

    let average_rating = summary.average_rating.unwrap_or_else(|| {
        let sum: f64 = reviews.iter().map(|r| f64::from(r.rating)).sum();
        (sum / n * 10.0).round() / 10.0
    });
    let total_reviews = summary.total_reviews.unwrap_or(reviews.len() as u32);

    Some(EnhancedReviewData {
        average_rating,
        total_reviews,
        rating_distribution,
        sentiment_analysis,
        highlights: summary.highlights.clone(),
    })
}
