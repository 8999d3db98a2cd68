use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>()]+?\.(?:jpe?g|png|gif|webp|avif)\b(?:\?[^\s"'<>()]*)?"#).unwrap()
});
static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>()]+?\.(?:mp4|webm|mov|m4v|m3u8)\b(?:\?[^\s"'<>()]*)?"#).unwrap()
});

pub fn images(raw: &str) -> Vec<String> {
    unique_urls(&IMAGE_RE, raw)
}

pub fn videos(raw: &str) -> Vec<String> {
    unique_urls(&VIDEO_RE, raw)
}

fn unique_urls(re: &Regex, raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    re.find_iter(raw)
        .map(|m| m.as_str().to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
