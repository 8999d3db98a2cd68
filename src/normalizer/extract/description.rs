use std::sync::LazyLock;

use regex::Regex;

use super::specs::MATERIAL_RE;
use crate::normalizer::rules::{all_matches, first_match, Rule, Trigger};

static PRODUCT_DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)Product Description\s+([A-Z][A-Za-z0-9&'-]*)\s+(.*?)\s*(?:Product information|Product details|Customers say|Looking for specific info|Top reviews|Package Dimensions|$)",
    )
    .unwrap()
});
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());
// A terminal only ends a sentence when whitespace or the end follows, so
// "12.71" or "v2.0" never count.
static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?](?:\s|$)").unwrap());

const MAX_BENEFITS: usize = 4;
const MAX_SCENARIOS: usize = 3;
/// Share of the word limit a sentence-boundary cut must keep.
const SENTENCE_CUT_RATIO: f64 = 0.7;

static THEME_RULES: &[Rule<&str>] = &[
    Rule {
        trigger: Trigger::AnyOf(&["beach", "vacation", "tropical", "hawaiian"]),
        output: "Bring easy vacation style to every beach day and tropical getaway.",
    },
    Rule {
        trigger: Trigger::Contains("wedding"),
        output: "Dress the part for destination weddings and special occasions.",
    },
    Rule {
        trigger: Trigger::AnyOf(&["lounge", "pajama", "sleepwear"]),
        output: "Unwind in relaxed comfort made for lounging and slow mornings.",
    },
    Rule {
        trigger: Trigger::Contains("casual"),
        output: "An easygoing everyday piece built for relaxed casual style.",
    },
];

static BENEFIT_RULES: &[Rule<&str>] = &[
    Rule {
        trigger: Trigger::AllOf(&["breathable", "comfortable"]),
        output: "Breathable, comfortable fabric that keeps you cool from morning to night.",
    },
    Rule {
        trigger: Trigger::Contains("lightweight"),
        output: "Lightweight feel that packs easily and wears comfortably all day.",
    },
    Rule {
        trigger: Trigger::Contains("versatile"),
        output: "Versatile styling that moves easily from casual outings to dinner plans.",
    },
    Rule {
        trigger: Trigger::AnyOf(&["stylish", "elegant"]),
        output: "Stylish look that earns compliments wherever you go.",
    },
    Rule {
        trigger: Trigger::AnyOf(&["machine wash", "easy care", "easy-care", "wrinkle"]),
        output: "Easy-care fabric that goes straight into the washing machine.",
    },
];

static SCENARIO_RULES: &[Rule<&str>] = &[
    Rule {
        trigger: Trigger::AnyOf(&["beach", "vacation", "tropical"]),
        output: "Beach vacations and tropical getaways.",
    },
    Rule {
        trigger: Trigger::AnyOf(&["party", "parties"]),
        output: "Summer parties and outdoor gatherings.",
    },
    Rule {
        trigger: Trigger::Contains("wedding"),
        output: "Destination weddings and special events.",
    },
    Rule {
        trigger: Trigger::AnyOf(&["lounge", "lounging", "at home"]),
        output: "Lounging at home in relaxed comfort.",
    },
    Rule {
        trigger: Trigger::AnyOf(&["casual", "everyday"]),
        output: "Relaxed weekends and everyday casual wear.",
    },
];

const FALLBACK_SCENARIOS: &[&str] = &["Everyday casual wear.", "Weekend outings and relaxed occasions."];

/// Build the prose description: overview, brand copy, benefits, scenarios.
pub fn extract(text: &str, max_words: usize) -> String {
    let lower = text.to_lowercase();
    let mut parts: Vec<String> = Vec::new();

    if let Some(overview) = overview(text, &lower) {
        parts.push(overview);
    }

    if let Some(caps) = PRODUCT_DESC_RE.captures(text) {
        let body = caps[2].trim();
        if !body.is_empty() {
            parts.push(format!("{} {}", &caps[1], body));
        }
    }

    let benefits: Vec<&str> = all_matches(BENEFIT_RULES, &lower)
        .take(MAX_BENEFITS)
        .copied()
        .collect();
    if !benefits.is_empty() {
        parts.push(bullets("Key Benefits:", &benefits));
    }

    let mut scenarios: Vec<&str> = all_matches(SCENARIO_RULES, &lower)
        .take(MAX_SCENARIOS)
        .copied()
        .collect();
    if scenarios.is_empty() {
        scenarios = FALLBACK_SCENARIOS.to_vec();
    }
    parts.push(bullets("Perfect For:", &scenarios));

    limit_words(&parts.join("\n\n"), max_words)
}

fn overview(text: &str, lower: &str) -> Option<String> {
    let mut sentences: Vec<String> = Vec::new();
    if let Some(opening) = first_match(THEME_RULES, lower) {
        sentences.push(opening.to_string());
    }
    if let Some(caps) = MATERIAL_RE.captures(text) {
        sentences.push(format!(
            "Crafted from {}% {}, the fabric stays soft and airy against the skin.",
            &caps[1],
            caps[2].to_lowercase()
        ));
    }
    if sentences.is_empty() {
        None
    } else {
        Some(sentences.join(" "))
    }
}

fn bullets(heading: &str, items: &[&str]) -> String {
    let mut out = heading.to_string();
    for item in items {
        out.push_str("\n• ");
        out.push_str(item);
    }
    out
}

/// Cap `text` at `max_words`, preferring the last sentence end that keeps
/// at least 70% of the limit; otherwise hard-cut and append an ellipsis.
pub fn limit_words(text: &str, max_words: usize) -> String {
    if max_words == 0 {
        return String::new();
    }
    let Some(last) = WORD_RE.find_iter(text).nth(max_words - 1) else {
        return text.to_string();
    };
    if last.end() == text.trim_end().len() {
        return text.to_string();
    }

    let head = &text[..last.end()];
    let min_keep = (max_words as f64 * SENTENCE_CUT_RATIO).ceil() as usize;
    if let Some(end) = SENTENCE_END_RE.find_iter(head).last() {
        let kept = &head[..=end.start()];
        if kept.split_whitespace().count() >= min_keep {
            return kept.trim_end().to_string();
        }
    }
    format!("{}...", head.trim_end())
}
