use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use tracing::debug;

use super::{ExtractedReview, ReviewSummary};

static CUSTOMERS_SAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Customers say\s+(.*?)(?:(?i:AI[- ]generated)|$)").unwrap());
static AVERAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d\.\d) out of 5(?: stars)?").unwrap());
static TOTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*)\s+(?:global\s+)?ratings?\b").unwrap());
static SENTENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^.!?]+").unwrap());

/// `<Name> 5.0 out of 5 stars <title> Reviewed in <place> on <Month d, yyyy>`
static REVIEW_HEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<name>(?:[A-Z][\w.'-]*\s+){0,2}[A-Z][\w.'-]*)\s+(?P<rating>[1-5])(?:\.0)?\s+out of 5 stars\s*(?P<title>[^.!?]{0,150}?)\s*Reviewed in [A-Za-z ]{2,40}? on (?P<date>[A-Z][a-z]+ \d{1,2}, \d{4})",
    )
    .unwrap()
});
static HELPFUL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*|One) (?:person|people) found this helpful").unwrap());
static REVIEW_META_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Size|Color|Style|Fit Type|Pattern)\s*:\s*[\w-]+").unwrap());
static REVIEW_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Verified Purchase|Images in this review|Read more|Helpful|Report|Translate review to English")
        .unwrap()
});
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const MIN_HIGHLIGHT_CHARS: usize = 20;
const MAX_HIGHLIGHTS: usize = 5;
const MAX_COMMENT_CHARS: usize = 1000;

/// Capitalized words that precede a reviewer name in flattened listings.
const NAME_NOISE: &[&str] = &[
    "Report", "Helpful", "States", "Kingdom", "Canada", "India", "Australia", "Reviews", "Purchase",
    "More",
];

pub fn summary(text: &str) -> Option<ReviewSummary> {
    // Per-review star lines would otherwise be mistaken for the listing average.
    let head = match REVIEW_HEAD_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };

    let average_rating = AVERAGE_RE
        .captures(head)
        .and_then(|c| c[1].parse::<f64>().ok());
    let total_reviews = TOTAL_RE
        .captures(head)
        .and_then(|c| c[1].replace(',', "").parse::<u32>().ok());
    let section = CUSTOMERS_SAY_RE.captures(text);
    let customer_section = section.is_some();
    let highlights = section.map(|c| highlights(&c[1])).unwrap_or_default();

    if average_rating.is_none() && total_reviews.is_none() && !customer_section {
        return None;
    }
    Some(ReviewSummary {
        average_rating,
        total_reviews,
        highlights,
        customer_section,
    })
}

fn highlights(section: &str) -> Vec<String> {
    SENTENCE_RE
        .find_iter(section)
        .map(|m| m.as_str().trim())
        .filter(|s| s.chars().count() > MIN_HIGHLIGHT_CHARS)
        .take(MAX_HIGHLIGHTS)
        .map(str::to_string)
        .collect()
}

/// Parse reviews that appear in the listing text itself.
pub fn parse_reviews(text: &str) -> Vec<ExtractedReview> {
    let heads: Vec<_> = REVIEW_HEAD_RE.captures_iter(text).collect();
    let mut reviews = Vec::with_capacity(heads.len());

    for (i, caps) in heads.iter().enumerate() {
        let whole = caps.get(0).unwrap();
        let body_end = heads.get(i + 1).map_or(text.len(), |next| {
            next.name("name").map_or(text.len(), |n| n.start())
        });
        let body = &text[whole.end()..body_end.max(whole.end())];

        let Some(name) = reviewer_name(&caps["name"]) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(&caps["date"], "%B %d, %Y") else {
            debug!(date = &caps["date"], "skipping review with unparsable date");
            continue;
        };
        let rating: u8 = caps["rating"].parse().unwrap_or(0);
        if !(1..=5).contains(&rating) {
            continue;
        }

        let helpful = HELPFUL_RE.captures(body).map_or(0, |c| match &c[1] {
            "One" => 1,
            n => n.replace(',', "").parse().unwrap_or(0),
        });
        let mut comment = comment_text(body);
        if comment.is_empty() {
            comment = caps["title"].trim().to_string();
        }

        reviews.push(ExtractedReview {
            id: format!("review-{}", reviews.len() + 1),
            rating,
            reviewer_name: name,
            comment,
            date: date.format("%Y-%m-%d").to_string(),
            helpful,
            verified: body.contains("Verified Purchase"),
            has_photos: body.contains("Images in this review") || body.contains("Customer image"),
            synthetic: false,
        });
    }

    reviews
}

fn reviewer_name(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw
        .split_whitespace()
        .skip_while(|t| NAME_NOISE.contains(t))
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

fn comment_text(body: &str) -> String {
    let text = HELPFUL_RE.replace_all(body, " ");
    let text = REVIEW_META_RE.replace_all(&text, " ");
    let text = REVIEW_NOISE_RE.replace_all(&text, " ");
    let text = WS_RE.replace_all(&text, " ");
    text.trim().chars().take(MAX_COMMENT_CHARS).collect()
}

// ── Placeholder reviews ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Comfort,
    Quality,
    Style,
}

const COMFORT_WORDS: &[&str] = &["comfortable", "soft", "breathable", "relaxed"];
const QUALITY_WORDS: &[&str] = &["quality", "durable", "fabric", "material", "well made"];
const STYLE_WORDS: &[&str] = &["stylish", "elegant", "retro", "design", "look"];

const GENERIC_COMMENT: &str = "Good product, matches the description.";

/// Placeholder comment keyed on what the listing text talks about.
pub fn review_comment(text: &str, focus: Focus) -> &'static str {
    let lower = text.to_lowercase();
    let (words, comment) = match focus {
        Focus::Comfort => (
            COMFORT_WORDS,
            "Really comfortable to wear all day, the fabric feels great.",
        ),
        Focus::Quality => (
            QUALITY_WORDS,
            "Well made with quality fabric that holds up nicely after several washes.",
        ),
        Focus::Style => (STYLE_WORDS, "Looks stylish and I get compliments every time I wear it."),
    };
    if words.iter().any(|w| lower.contains(w)) {
        comment
    } else {
        GENERIC_COMMENT
    }
}

/// (name, rating, days ago, comment) for the summary-backed placeholders.
const SUMMARY_PLACEHOLDERS: &[(&str, u8, i64, &str)] = &[
    ("Sarah M.", 5, 7, "Absolutely love it. Fits true to size and the material is great."),
    ("Michael R.", 4, 14, "Nice quality for the price, runs slightly large."),
    ("Jennifer L.", 3, 21, "Decent overall but the color was a bit different than pictured."),
];

/// Flagged placeholder records for listings with no parsable reviews.
/// Three fixed reviews when the listing has a "Customers say" section, otherwise
/// up to two built from the extracted features.
pub fn synthetic_reviews(
    summary: Option<&ReviewSummary>,
    features: &[String],
    now: DateTime<Utc>,
) -> Vec<ExtractedReview> {
    let date = |days: i64| (now - Duration::days(days)).format("%Y-%m-%d").to_string();

    if summary.is_some_and(|s| s.customer_section) {
        return SUMMARY_PLACEHOLDERS
            .iter()
            .enumerate()
            .map(|(i, (name, rating, days, comment))| {
                placeholder(i, name, *rating, comment.to_string(), date(*days))
            })
            .collect();
    }

    let text = features.join(" ");
    let second = if QUALITY_WORDS.iter().any(|w| text.to_lowercase().contains(w)) {
        Focus::Quality
    } else {
        Focus::Style
    };
    let picks = [("Alex T.", 5, 7, Focus::Comfort), ("Jordan P.", 4, 14, second)];

    picks
        .iter()
        .take(features.len().min(picks.len()))
        .enumerate()
        .map(|(i, (name, rating, days, focus))| {
            placeholder(i, name, *rating, review_comment(&text, *focus).to_string(), date(*days))
        })
        .collect()
}

fn placeholder(index: usize, name: &str, rating: u8, comment: String, date: String) -> ExtractedReview {
    ExtractedReview {
        id: format!("synthetic-{}", index + 1),
        rating,
        reviewer_name: name.to_string(),
        comment,
        date,
        helpful: 0,
        verified: false,
        has_photos: false,
        synthetic: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn summary_from_listing() {
        let text = "4.5 out of 5 stars 2,031 global ratings Customers say Buyers like the soft breathable cotton. \
                    Short one. Many say it washes well without shrinking! AI-generated from the text of reviews";
        let s = summary(text).unwrap();
        assert_eq!(s.average_rating, Some(4.5));
        assert_eq!(s.total_reviews, Some(2031));
        assert_eq!(
            s.highlights,
            vec![
                "Buyers like the soft breathable cotton",
                "Many say it washes well without shrinking"
            ]
        );
    }

    #[test]
    fn no_summary_without_signals() {
        assert!(summary("Just a mug.").is_none());
    }

    #[test]
    fn parses_listing_reviews() {
        let text = "Top reviews from the United States Anna B. 4.0 out of 5 stars Cute set Reviewed in the United States on January 5, 2024 \
                    Size: Medium Color: Blue Verified Purchase Fits well, a little thin. 3 people found this helpful Helpful Report \
                    Tom 1.0 out of 5 stars Ripped Reviewed in Canada on February 9, 2024 Images in this review Helpful Report";
        let r = parse_reviews(text);
        assert_eq!(r.len(), 2);

        assert_eq!(r[0].reviewer_name, "Anna B.");
        assert_eq!(r[0].rating, 4);
        assert_eq!(r[0].date, "2024-01-05");
        assert_eq!(r[0].comment, "Fits well, a little thin.");
        assert_eq!(r[0].helpful, 3);
        assert!(r[0].verified);
        assert!(!r[0].has_photos);

        assert_eq!(r[1].reviewer_name, "Tom");
        assert_eq!(r[1].rating, 1);
        assert_eq!(r[1].comment, "Ripped");
        assert!(r[1].has_photos);
        assert!(!r[1].verified);
        assert!(r.iter().all(|x| !x.synthetic));
    }

    #[test]
    fn listing_average_ignores_review_stars() {
        let text = "Bob 5.0 out of 5 stars Great Reviewed in the United States on May 1, 2024 Love it";
        assert!(summary(text).is_none());
        assert_eq!(parse_reviews(text).len(), 1);
    }

    #[test]
    fn summary_placeholders() {
        let s = ReviewSummary {
            average_rating: Some(4.0),
            total_reviews: Some(10),
            highlights: vec!["People enjoy the relaxed fit a lot".into()],
            customer_section: true,
        };
        let r = synthetic_reviews(Some(&s), &[], now());
        let ratings: Vec<u8> = r.iter().map(|x| x.rating).collect();
        assert_eq!(ratings, vec![5, 4, 3]);
        let dates: Vec<&str> = r.iter().map(|x| x.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-23", "2024-02-16", "2024-02-09"]);
        assert!(r.iter().all(|x| x.synthetic));
    }

    #[test]
    fn short_customer_section_still_uses_fixed_placeholders() {
        let s = summary("Customers say Nice. Soft. AI Generated").unwrap();
        assert!(s.customer_section);
        assert!(s.highlights.is_empty());
        assert_eq!(s.average_rating, None);

        let features = vec!["Comfortable relaxed fit for all-day wear".to_string()];
        let r = synthetic_reviews(Some(&s), &features, now());
        assert_eq!(r.len(), 3);
        assert_eq!(r[0].reviewer_name, "Sarah M.");
    }

    #[test]
    fn feature_placeholders() {
        let features = vec![
            "Comfortable relaxed fit for all-day wear".to_string(),
            "Retro 1960s-inspired styling".to_string(),
            "Stylish design with an effortlessly elegant look".to_string(),
        ];
        let r = synthetic_reviews(None, &features, now());
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].comment, "Really comfortable to wear all day, the fabric feels great.");
        assert_eq!(r[1].comment, "Looks stylish and I get compliments every time I wear it.");

        let one = synthetic_reviews(None, &features[..1], now());
        assert_eq!(one.len(), 1);
        assert!(synthetic_reviews(None, &[], now()).is_empty());
    }

    #[test]
    fn comment_defaults_to_generic() {
        assert_eq!(review_comment("ceramic mug", Focus::Quality), GENERIC_COMMENT);
        assert_eq!(
            review_comment("Durable canvas", Focus::Quality),
            "Well made with quality fabric that holds up nicely after several washes."
        );
    }
}
