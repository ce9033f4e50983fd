//! Placement rules applied when a window is adopted.
use serde::{Deserialize, Serialize};

/// Geometry relative to the monitor rect, each component in `0.0..=1.0`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RelativeArea {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One placement policy entry. Only windows whose class matches exactly are
/// affected; absent directives leave the default placement untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Rule {
    pub class: String,
    pub workspace: Option<usize>,
    pub monitor: Option<usize>,
    pub floating: Option<bool>,
    pub area: Option<RelativeArea>,
}

/// Immutable, ordered rule list. Rules are evaluated in insertion order and
/// the first match wins, so insertion order is the explicit priority.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Pure matcher, safe to call from any thread.
    #[must_use]
    pub fn matched(&self, class: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| !r.class.is_empty() && r.class == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let rules = Rules::new(vec![
            Rule {
                class: "Firefox".to_string(),
                workspace: Some(2),
                ..Rule::default()
            },
            Rule {
                class: "Firefox".to_string(),
                workspace: Some(5),
                ..Rule::default()
            },
        ]);
        assert_eq!(rules.matched("Firefox").and_then(|r| r.workspace), Some(2));
    }

    #[test]
    fn match_is_exact_not_substring() {
        let rules = Rules::new(vec![Rule {
            class: "term".to_string(),
            floating: Some(true),
            ..Rule::default()
        }]);
        assert!(rules.matched("xterm").is_none());
        assert!(rules.matched("term").is_some());
    }

    #[test]
    fn empty_class_never_matches() {
        let rules = Rules::new(vec![Rule::default()]);
        assert!(rules.matched("").is_none());
    }
}
