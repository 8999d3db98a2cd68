use std::sync::LazyLock;

use regex::Regex;

/// Condition checked against lower-cased listing text.
pub enum Trigger {
    Contains(&'static str),
    AnyOf(&'static [&'static str]),
    AllOf(&'static [&'static str]),
    Matches(&'static LazyLock<Regex>),
}

impl Trigger {
    pub fn fires(&self, lower: &str) -> bool {
        match self {
            Trigger::Contains(kw) => lower.contains(kw),
            Trigger::AnyOf(kws) => kws.iter().any(|kw| lower.contains(kw)),
            Trigger::AllOf(kws) => kws.iter().all(|kw| lower.contains(kw)),
            Trigger::Matches(re) => re.is_match(lower),
        }
    }
}

pub struct Rule<T> {
    pub trigger: Trigger,
    pub output: T,
}

/// Output of the first rule whose trigger fires, in table order.
pub fn first_match<'a, T>(rules: &'a [Rule<T>], lower: &str) -> Option<&'a T> {
    rules.iter().find(|r| r.trigger.fires(lower)).map(|r| &r.output)
}

/// Outputs of every firing rule, in table order.
pub fn all_matches<'a, T>(rules: &'a [Rule<T>], lower: &'a str) -> impl Iterator<Item = &'a T> + 'a {
    rules
        .iter()
        .filter(move |r| r.trigger.fires(lower))
        .map(|r| &r.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    static SET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"shirt and \w+ pants").unwrap());

    static TABLE: &[Rule<&str>] = &[
        Rule { trigger: Trigger::AllOf(&["soft", "warm"]), output: "cozy" },
        Rule { trigger: Trigger::Contains("soft"), output: "soft" },
        Rule { trigger: Trigger::AnyOf(&["red", "blue"]), output: "colored" },
        Rule { trigger: Trigger::Matches(&SET_RE), output: "set" },
    ];

    #[test]
    fn first_match_respects_order() {
        assert_eq!(first_match(TABLE, "soft and warm"), Some(&"cozy"));
        assert_eq!(first_match(TABLE, "soft only"), Some(&"soft"));
        assert_eq!(first_match(TABLE, "nothing here"), None);
    }

    #[test]
    fn all_matches_collects_in_order() {
        let hits: Vec<_> = all_matches(TABLE, "soft blue shirt and linen pants").copied().collect();
        assert_eq!(hits, vec!["soft", "colored", "set"]);
    }
}
