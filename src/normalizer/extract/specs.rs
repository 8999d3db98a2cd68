use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::normalizer::rules::{all_matches, Rule, Trigger};

pub static MATERIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"(?i)\b(\d{1,3})\s*%\s*(",
            r"(?:(?:organic|recycled|pima|supima|egyptian|merino)\s+)?",
            r"(?:cotton|linen|hemp|jute|ramie|polyester|polyamide|nylon|acrylic|acetate|",
            r"rayon|viscose|modal|lyocell|tencel|bamboo|spandex|elastane|lycra|polyurethane|",
            r"silk|wool|merino|cashmere|alpaca|mohair|angora|leather|microfiber)",
            r")\b",
        ),
    )
    .unwrap()
});
static SET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"shirt\s+and\s+(?:[a-z-]+\s+){0,3}pants").unwrap());

/// (key, value) pairs; the first rule to claim a key wins.
static SPEC_RULES: &[Rule<(&str, &str)>] = &[
    Rule { trigger: Trigger::Contains("cuban collar"), output: ("Collar Style", "Cuban Collar") },
    Rule { trigger: Trigger::Contains("long sleeve"), output: ("Sleeve Length", "Long Sleeve") },
    Rule { trigger: Trigger::Contains("short sleeve"), output: ("Sleeve Length", "Short Sleeve") },
    Rule { trigger: Trigger::Contains("drawstring"), output: ("Waist", "Elastic Drawstring Waist") },
    Rule { trigger: Trigger::Matches(&SET_RE), output: ("Set Includes", "Shirt and Pants") },
    Rule { trigger: Trigger::Contains("beach"), output: ("Occasion", "Beach, Vacation, Casual") },
    Rule {
        trigger: Trigger::AnyOf(&["button-down", "button down", "button front"]),
        output: ("Closure", "Button Front"),
    },
];

static FEATURE_RULES: &[Rule<&str>] = &[
    Rule { trigger: Trigger::Contains("lightweight"), output: "Lightweight, breathable fabric for warm weather" },
    Rule { trigger: Trigger::Contains("comfortable"), output: "Comfortable relaxed fit for all-day wear" },
    Rule { trigger: Trigger::Contains("versatile"), output: "Versatile pieces that work together or as separates" },
    Rule {
        trigger: Trigger::AnyOf(&["stylish", "elegant"]),
        output: "Stylish design with an effortlessly elegant look",
    },
    Rule { trigger: Trigger::AnyOf(&["retro", "1960s"]), output: "Retro 1960s-inspired styling" },
];

pub fn specifications(text: &str) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();

    if let Some(material) = material(text) {
        specs.insert("Material".to_string(), material);
    }

    let lower = text.to_lowercase();
    for (key, value) in all_matches(SPEC_RULES, &lower) {
        specs
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
    specs
}

pub fn features(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    all_matches(FEATURE_RULES, &lower)
        .map(|f| f.to_string())
        .collect()
}

/// Every `NN% fiber` composition, e.g. "55% Linen, 45% Cotton".
fn material(text: &str) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for caps in MATERIAL_RE.captures_iter(text) {
        let fiber: Vec<String> = caps[2].split_whitespace().map(title_case).collect();
        let part = format!("{}% {}", &caps[1], fiber.join(" "));
        if !parts.contains(&part) {
            parts.push(part);
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn title_case(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
