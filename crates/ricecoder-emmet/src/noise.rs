/// Validity and noise heuristics for suggestions
///
/// Almost every word a user types is a syntactically valid abbreviation:
/// `hello` expands to `<hello></hello>` and `abc` in a stylesheet to
/// `abc: ;`. These checks hide such low-value expansions from passive
/// completion lists. They are approximate by nature, so every rule can be
/// switched off through [`NoisePolicy`].
use crate::data;
use crate::expander::ExpandOptions;
use crate::syntax::Syntax;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{1,6}$").unwrap());
static STYLESHEET_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[a-zA-Z!@#]").unwrap());
static MARKUP_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z!(\[#.{]").unwrap());
static JSX_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z!(\[#.]").unwrap());
static MARKUP_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z.]").unwrap());

// grouping is an abbreviation only inside text, around a nesting operator,
// or inside a quoted attribute value
static GROUP_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^\}\{]*[\(\)]+[^\}\{]*\}(?:[>\+\*\^]|$)").unwrap());
static GROUP_BEFORE_OPERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*\)[>\+\*\^]").unwrap());
static GROUP_IN_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[[^\[\]\(\)]+=".*"\]"#).unwrap());
static GROUP_AFTER_OPERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[>\+\*\^]\(.*\)").unwrap());

static TRAILING_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-zA-Z\d]*)\.$").unwrap());
static PASCAL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z][A-Za-z0-9]*)+$").unwrap());

/// Tunable noise-suppression rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoisePolicy {
    /// Hide stylesheet expansions that only echo the property name
    pub suppress_unresolved_properties: bool,
    /// Hide markup expansions that only wrap the typed word in a tag
    pub suppress_unresolved_tags: bool,
    /// Hide `word.` which is usually the end of a sentence
    pub suppress_trailing_period: bool,
    /// Stylesheet abbreviations longer than this that prefix a css property
    /// are treated as the property being typed
    pub long_property_threshold: usize,
}

impl Default for NoisePolicy {
    fn default() -> Self {
        Self {
            suppress_unresolved_properties: true,
            suppress_unresolved_tags: true,
            suppress_trailing_period: true,
            long_property_threshold: 4,
        }
    }
}

impl NoisePolicy {
    /// Whether `abbreviation` is worth sending to the engine at all
    pub fn is_abbreviation_valid(&self, syntax: Syntax, abbreviation: &str) -> bool {
        if abbreviation.is_empty() {
            return false;
        }

        if syntax.is_stylesheet() {
            if let Some(hash) = abbreviation.find('#') {
                if hash == 0 {
                    return HEX_COLOR.is_match(abbreviation);
                }
                if data::is_commonly_used_tag(&abbreviation[..hash]) {
                    return false;
                }
            }
            return STYLESHEET_START.is_match(abbreviation);
        }

        if abbreviation.starts_with('!') {
            return abbreviation.chars().all(|c| c == '!');
        }

        // `(some text)` is prose, not a group
        if abbreviation.contains(['(', ')'])
            && !GROUP_IN_TEXT.is_match(abbreviation)
            && !GROUP_BEFORE_OPERATOR.is_match(abbreviation)
            && !GROUP_IN_ATTRIBUTE.is_match(abbreviation)
            && !GROUP_AFTER_OPERATOR.is_match(abbreviation)
        {
            return false;
        }

        let start = if syntax == Syntax::Jsx {
            &*JSX_START
        } else {
            &*MARKUP_START
        };
        start.is_match(abbreviation) && MARKUP_BODY.is_match(abbreviation)
    }

    /// Stylesheet expansion that merely echoes the typed property
    ///
    /// An unresolved property is never a useful result, not even on commit.
    pub fn is_unresolved_property(
        &self,
        abbreviation: &str,
        expanded_text: &str,
        options: &ExpandOptions,
    ) -> bool {
        if !self.suppress_unresolved_properties {
            return false;
        }

        let between = options.stylesheet.between.as_str();
        let after = options.stylesheet.after.as_str();

        // drop overlap between the abbreviation tail and `between`
        let search_from = abbreviation.len().saturating_sub(between.len());
        let prefix_end = between
            .chars()
            .next()
            .and_then(|sep| {
                abbreviation
                    .get(search_from..)
                    .and_then(|tail| tail.find(sep))
                    .map(|i| search_from + i)
            })
            .unwrap_or(abbreviation.len());
        let property = &abbreviation[..prefix_end];

        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();

        expanded_text == format!("{}{}${{0}}{}", property, between, after)
            || strip(expanded_text) == format!("{}{}", strip(abbreviation), after)
    }

    /// Markup expansion that is most likely ordinary typing
    pub fn is_markup_noise(
        &self,
        syntax: Syntax,
        abbreviation: &str,
        expanded_text: &str,
        snippet_keys: &[String],
    ) -> bool {
        let lower = abbreviation.to_lowercase();

        // html tags are not useful in xml
        if syntax == Syntax::Xml && data::commonly_used_tags().any(|tag| tag.starts_with(&lower)) {
            return true;
        }

        if data::is_commonly_used_tag(&lower) || snippet_keys.iter().any(|k| k == abbreviation) {
            return false;
        }

        // custom elements
        if abbreviation.contains(['-', ':'])
            && !abbreviation.contains("--")
            && !abbreviation.contains("::")
            && !abbreviation.ends_with(':')
        {
            return false;
        }

        // a lone `.` must reach the engine so `.foo` can follow
        if abbreviation == "." {
            return false;
        }

        if let Some(captures) = TRAILING_PERIOD.captures(abbreviation) {
            let word = captures.get(1).map_or("", |m| m.as_str());
            if !word.is_empty() && data::is_html_tag(word) {
                return false;
            }
            return self.suppress_trailing_period;
        }

        // component names
        if syntax == Syntax::Jsx && PASCAL_CASE.is_match(abbreviation) {
            return false;
        }

        self.suppress_unresolved_tags
            && expanded_text.to_lowercase() == format!("<{0}>${{1}}</{0}>", lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expander::ExpandConfig;

    fn policy() -> NoisePolicy {
        NoisePolicy::default()
    }

    #[test]
    fn test_stylesheet_validity() {
        let p = policy();
        assert!(p.is_abbreviation_valid(Syntax::Css, "m10"));
        assert!(p.is_abbreviation_valid(Syntax::Css, "-wm"));
        assert!(p.is_abbreviation_valid(Syntax::Css, "#fff"));
        assert!(!p.is_abbreviation_valid(Syntax::Css, "#zzz"));
        assert!(!p.is_abbreviation_valid(Syntax::Css, "div#main"));
        assert!(!p.is_abbreviation_valid(Syntax::Css, "10px"));
    }

    #[test]
    fn test_markup_validity() {
        let p = policy();
        assert!(p.is_abbreviation_valid(Syntax::Html, "!"));
        assert!(!p.is_abbreviation_valid(Syntax::Html, "!a"));
        assert!(p.is_abbreviation_valid(Syntax::Html, "ul>li*3"));
        assert!(p.is_abbreviation_valid(Syntax::Html, "div>(header+main)"));
        assert!(p.is_abbreviation_valid(Syntax::Html, "(a+b)>c"));
        assert!(p.is_abbreviation_valid(Syntax::Html, "span[onclick=\"alert();\"]"));
        assert!(!p.is_abbreviation_valid(Syntax::Html, "(sometext)"));
        assert!(p.is_abbreviation_valid(Syntax::Html, "{text}"));
        assert!(!p.is_abbreviation_valid(Syntax::Jsx, "{text}"));
        assert!(!p.is_abbreviation_valid(Syntax::Html, "#"));
    }

    #[test]
    fn test_unresolved_property_echo() {
        let p = policy();
        let options = ExpandConfig::new(Syntax::Css).options;
        assert!(p.is_unresolved_property("abc", "abc: ${0};", &options));
        assert!(p.is_unresolved_property("abc:", "abc: ${0};", &options));
        assert!(p.is_unresolved_property("abc:d", "abc: d;", &options));
        assert!(!p.is_unresolved_property("m10", "margin: 10px;", &options));
    }

    #[test]
    fn test_unresolved_property_respects_stylus_separators() {
        let p = policy();
        let options = ExpandConfig::new(Syntax::Stylus).options;
        assert!(p.is_unresolved_property("abc", "abc ${0}", &options));
    }

    #[test]
    fn test_markup_noise() {
        let p = policy();
        let keys = vec!["btn:s".to_string()];
        assert!(p.is_markup_noise(Syntax::Html, "hello", "<hello>${1}</hello>", &keys));
        assert!(!p.is_markup_noise(Syntax::Html, "div", "<div>${1}</div>", &keys));
        assert!(!p.is_markup_noise(Syntax::Html, "btn:s", "<button>${0}</button>", &keys));
        assert!(!p.is_markup_noise(Syntax::Html, "my-el", "<my-el>${1}</my-el>", &keys));
        assert!(!p.is_markup_noise(Syntax::Html, ".", "<div class=\"${1}\">${2}</div>", &keys));
        assert!(p.is_markup_noise(Syntax::Html, "end.", "<end class=\"\">${1}</end>", &keys));
        assert!(!p.is_markup_noise(Syntax::Html, "div.", "<div class=\"\">${1}</div>", &keys));
        assert!(!p.is_markup_noise(Syntax::Jsx, "MyWidget", "<MyWidget>${1}</MyWidget>", &keys));
        assert!(p.is_markup_noise(Syntax::Xml, "di", "<di>${1}</di>", &keys));
    }

    #[test]
    fn test_policy_toggles() {
        let p = NoisePolicy {
            suppress_unresolved_tags: false,
            suppress_trailing_period: false,
            ..NoisePolicy::default()
        };
        assert!(!p.is_markup_noise(Syntax::Html, "hello", "<hello>${1}</hello>", &[]));
        assert!(!p.is_markup_noise(Syntax::Html, "end.", "<end class=\"\"></end>", &[]));
    }
}
