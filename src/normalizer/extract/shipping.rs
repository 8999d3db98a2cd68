use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::ShippingInfo;
use crate::normalizer::rules::{first_match, Rule, Trigger};
use crate::normalizer::sanitize::looks_like_code;

static DIMENSIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:Package|Product) Dimensions\s*:?\s*([\d.]+)\s*x\s*([\d.]+)\s*x\s*([\d.]+)\s*inches\s*;\s*([\d.]+)\s*(pounds|lbs?|ounces|oz)\b",
    )
    .unwrap()
});
static ITEM_WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Item Weight\s*:?\s*([\d.]+)\s*(pounds|lbs?|ounces|oz)\b").unwrap()
});
static DEPARTMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Department\s*:\s*(.+?)\s*(?:Date First Available|Manufacturer|ASIN|Item model number|Best Sellers Rank|Customer Reviews|Package Dimensions|Product Dimensions|Is Discontinued|Number of Items|Package Quantity|Unit Count|$)",
    )
    .unwrap()
});
static ASIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ASIN\s*:\s*([A-Z0-9]{10})\b").unwrap());
static FIRST_AVAILABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Date First Available\s*:\s*([A-Z][a-z]+ \d{1,2}, \d{4})").unwrap()
});
static RANK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Best Sellers Rank\s*:?\s*#(\d[\d,]*) in (.+?)\s*(?:\(|#|Customer Reviews|Date First Available|ASIN|Department|Package Dimensions|Product Dimensions|Manufacturer|$)",
    )
    .unwrap()
});
static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Number of Items|Package Quantity|Unit Count)\s*:\s*(\d+)").unwrap()
});

/// Ranks below this ship as popular items.
const POPULAR_RANK_LIMIT: u64 = 50_000;

const MAX_ORIGIN_CHARS: usize = 50;
const MAX_FIELD_CHARS: usize = 100;

static CARE_RULES: &[Rule<&str>] = &[
    Rule { trigger: Trigger::Contains("machine wash"), output: "Machine wash cold, tumble dry low" },
    Rule { trigger: Trigger::Contains("hand wash"), output: "Hand wash cold, line dry" },
    Rule { trigger: Trigger::Contains("dry clean"), output: "Dry clean only" },
    Rule { trigger: Trigger::Contains("air dry"), output: "Air dry recommended" },
];

pub fn extract(text: &str) -> Option<ShippingInfo> {
    let mut info = ShippingInfo::default();

    if let Some(caps) = DIMENSIONS_RE.captures(text) {
        info.dimensions = Some(format!("{}\" × {}\" × {}\"", &caps[1], &caps[2], &caps[3]));
        info.weight = Some(weight(&caps[4], &caps[5]));
    } else if let Some(caps) = ITEM_WEIGHT_RE.captures(text) {
        info.weight = Some(weight(&caps[1], &caps[2]));
    }

    info.origin = DEPARTMENT_RE
        .captures(text)
        .and_then(|c| accept("origin", &c[1], MAX_ORIGIN_CHARS));
    info.sku = ASIN_RE.captures(text).map(|c| c[1].to_string());
    info.first_available = FIRST_AVAILABLE_RE.captures(text).map(|c| c[1].to_string());
    info.package_info = PACKAGE_RE.captures(text).map(|c| match &c[1] {
        "1" => "1 item per package".to_string(),
        n => format!("{} items per package", n),
    });

    if let Some(caps) = RANK_RE.captures(text) {
        let rank = format!("#{} in {}", &caps[1], caps[2].trim());
        if let Some(rank) = accept("bestseller rank", &rank, MAX_FIELD_CHARS) {
            let position: u64 = caps[1].replace(',', "").parse().unwrap_or(u64::MAX);
            info.shipping_priority = Some(shipping_priority(position).to_string());
            info.bestseller_rank = Some(rank);
        }
    }

    let lower = text.to_lowercase();
    info.care_instructions = first_match(CARE_RULES, &lower).map(|s| s.to_string());

    if info.is_empty() {
        None
    } else {
        Some(info)
    }
}

pub fn shipping_priority(rank: u64) -> &'static str {
    if rank < POPULAR_RANK_LIMIT {
        "High Priority - Popular Item"
    } else {
        "Standard Priority"
    }
}

fn weight(amount: &str, unit: &str) -> String {
    match unit.to_lowercase().as_str() {
        "ounces" | "oz" => format!("{} oz", amount),
        _ => format!("{} lbs", amount),
    }
}

/// Drop captures that are empty, too long, or leftover script.
fn accept(field: &str, value: &str, max_chars: usize) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if looks_like_code(value) || value.chars().count() > max_chars {
        debug!(field, len = value.len(), "discarding suspicious shipping field");
        return None;
    }
    Some(value.to_string())
}
