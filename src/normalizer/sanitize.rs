use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static EVENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
});
static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\bfunction\b\s*[\w$]*\s*\([^)]*\)\s*\{[^{}]*\}").unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static EMPTY_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)|\[\s*\]|[{}]").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Analytics/tracking calls seen in scraped retail listings, applied in order.
static TRACKING_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // P.when('A').execute(function(A){ ... });
        r"(?s)\bP\.when\([^)]*\)\.(?:execute|register)\(\s*(?:'[^']*'\s*,\s*)?function\s*\([^)]*\)\s*\{[^{}]*\}\s*\)\s*;?",
        r"\bP\.when\([^)]*\)(?:\.\w+\([^)]*\))*\s*;?",
        r"\bue\.(?:count|tag|mark|event)\s*\([^)]*\)\s*;?",
        r"\b(?:gtag|fbq|ga|_gaq\.push|dataLayer\.push|analytics\.(?:track|page|identify))\s*\([^)]*\)\s*;?",
        r"\bwindow\.[\w.$]+\s*=\s*[^;]*;",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Substrings that mark a captured field as leftover script rather than prose.
const CODE_MARKERS: &[&str] = &[
    "function", "ue.count", "p.when", "=>", "{", "}", "window.", "var ", "();", ".execute(",
];

const MAX_FUNCTION_PASSES: usize = 8;

/// Best-effort denoise: strips scripts, handlers, tracking calls, function
/// bodies and tags, then collapses whitespace. Order matters.
pub fn sanitize(raw: &str) -> String {
    let mut text = SCRIPT_RE.replace_all(raw, " ").into_owned();
    text = STYLE_RE.replace_all(&text, " ").into_owned();
    text = COMMENT_RE.replace_all(&text, " ").into_owned();
    text = EVENT_ATTR_RE.replace_all(&text, "").into_owned();

    for re in TRACKING_RES.iter() {
        text = re.replace_all(&text, " ").into_owned();
    }

    // Innermost bodies go first; repeat so enclosing functions become matchable.
    for _ in 0..MAX_FUNCTION_PASSES {
        if !FUNCTION_RE.is_match(&text) {
            break;
        }
        text = FUNCTION_RE.replace_all(&text, " ").into_owned();
    }

    text = TAG_RE.replace_all(&text, " ").into_owned();
    // Nested pairs like "(())" open up one layer per pass. Each pass removes
    // at least one bracket, so this terminates.
    while EMPTY_PAIR_RE.is_match(&text) {
        text = EMPTY_PAIR_RE.replace_all(&text, " ").into_owned();
    }
    WS_RE.replace_all(&text, " ").trim().to_string()
}

pub fn looks_like_code(text: &str) -> bool {
    let lower = text.to_lowercase();
    CODE_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_keeps_text() {
        let out = sanitize("<script>alert(1)</script>Hello world");
        assert!(!out.contains("<script>"));
        assert!(!out.contains("alert(1)"));
        assert!(out.contains("Hello world"));
    }

    #[test]
    fn idempotent_on_plain_text() {
        for input in [
            "Soft linen shirt.   Great for the beach!\n\nMachine wash cold.",
            "  Package Dimensions: 12.71 x 10.39 x 1.3 inches; 1.23 Pounds ",
            "",
            "Pack of 2 (())",
            "Set [()] of { ( ) } three",
        ] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn nested_empty_pairs_collapse() {
        assert_eq!(sanitize("Pack of 2 (())"), "Pack of 2");
        assert_eq!(sanitize("Set [()] of {(  )} three"), "Set of three");
        assert_eq!(sanitize("Size (M) only"), "Size (M) only");
    }

    #[test]
    fn tags_become_spaces() {
        assert_eq!(sanitize("<p>Linen</p><p>Shirt</p>"), "Linen Shirt");
        assert_eq!(sanitize("one<br/>two"), "one two");
    }

    #[test]
    fn removes_event_handlers_and_comments() {
        let out = sanitize(r#"<a href="x" onclick="track('buy')">Buy now</a><!-- promo -->"#);
        assert_eq!(out, "Buy now");
    }

    #[test]
    fn removes_tracking_calls() {
        let raw = "Great shirt ue.count(\"CSMLibrarySize\", 84); \
                   P.when('A', 'ready').execute(function(A) { A.trigger('x'); }); \
                   gtag('event', 'view'); window.ue_t0 = 123; fits well";
        let out = sanitize(raw);
        assert_eq!(out, "Great shirt fits well");
    }

    #[test]
    fn removes_nested_function_blocks() {
        let raw = "Before function outer(a) { var x = function() { return 1; }; } After";
        assert_eq!(sanitize(raw), "Before After");
    }

    #[test]
    fn code_guard() {
        assert!(looks_like_code("function(){ return 1 }"));
        assert!(looks_like_code("P.when('A')"));
        assert!(!looks_like_code("Womens Clothing"));
    }
}
