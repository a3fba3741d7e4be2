/// Seam to the abbreviation-expansion engine
///
/// The engine itself (abbreviation grammar, snippet database, output
/// formatting) lives outside this crate. Embedders implement [`Expander`]
/// over whatever engine they ship and this crate only decides *when* and
/// *with which options* to call it.
use crate::error::ExpandError;
use crate::extractor::{FilterSuffix, OutputFilter};
use crate::syntax::{Syntax, SyntaxType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name to template mapping
pub type SnippetsMap = BTreeMap<String, String>;

/// Black-box expansion engine
pub trait Expander: Send + Sync {
    /// Expand an abbreviation into text with tab-stop markers
    fn expand(&self, abbreviation: &str, config: &ExpandConfig) -> Result<String, ExpandError>;

    /// Built-in snippets the engine knows for a syntax
    fn default_snippets(&self, _syntax: Syntax) -> SnippetsMap {
        SnippetsMap::new()
    }
}

/// How tab stops are written into engine output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStyle {
    /// `${index}` / `${index:placeholder}`
    #[default]
    Numbered,
    /// Every field rendered as `${0}` so the first one receives the cursor
    FinalOnly,
}

impl FieldStyle {
    pub fn render(&self, index: u32, placeholder: &str) -> String {
        match self {
            FieldStyle::Numbered if placeholder.is_empty() => format!("${{{}}}", index),
            FieldStyle::Numbered => format!("${{{}:{}}}", index, placeholder),
            FieldStyle::FinalOnly => "${0}".to_string(),
        }
    }
}

/// Comment filter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentOptions {
    pub enabled: bool,
    pub trigger: Vec<String>,
    pub before: String,
    pub after: String,
}

/// BEM filter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BemOptions {
    pub enabled: bool,
    pub element: String,
    pub modifier: String,
}

/// Stylesheet output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylesheetOptions {
    pub short_hex: bool,
    pub between: String,
    pub after: String,
    pub int_unit: String,
    pub float_unit: String,
    pub unit_aliases: BTreeMap<String, String>,
    pub fuzzy_search_min_score: f32,
}

/// Options forwarded to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandOptions {
    pub field: FieldStyle,
    pub format: bool,
    pub format_skip: Vec<String>,
    pub format_force: Vec<String>,
    pub inline_break: u32,
    pub compact_boolean: bool,
    pub reverse_attributes: bool,
    pub self_closing_style: String,
    pub markup_href: bool,
    pub jsx_enabled: bool,
    pub comment: CommentOptions,
    pub bem: BemOptions,
    pub stylesheet: StylesheetOptions,
}

impl ExpandOptions {
    pub fn for_syntax(syntax: Syntax, filters: &FilterSuffix) -> Self {
        let unit_aliases = [("e", "em"), ("p", "%"), ("x", "ex"), ("r", "rem")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            field: FieldStyle::Numbered,
            format: true,
            format_skip: vec!["html".to_string()],
            format_force: vec!["body".to_string()],
            inline_break: 0,
            compact_boolean: false,
            reverse_attributes: false,
            self_closing_style: "html".to_string(),
            markup_href: true,
            jsx_enabled: syntax == Syntax::Jsx,
            comment: CommentOptions {
                enabled: filters.contains(OutputFilter::Comment),
                trigger: vec!["id".to_string(), "class".to_string()],
                before: String::new(),
                after: "\n<!-- /[#ID][.CLASS] -->".to_string(),
            },
            bem: BemOptions {
                enabled: filters.contains(OutputFilter::Bem),
                element: "__".to_string(),
                modifier: "_".to_string(),
            },
            stylesheet: StylesheetOptions {
                short_hex: true,
                between: syntax.stylesheet_between().to_string(),
                after: syntax.stylesheet_after().to_string(),
                int_unit: "px".to_string(),
                float_unit: "em".to_string(),
                unit_aliases,
                fuzzy_search_min_score: 0.3,
            },
        }
    }
}

/// Full configuration for one engine call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandConfig {
    pub syntax: Syntax,
    pub syntax_type: SyntaxType,
    pub options: ExpandOptions,
    /// Custom snippets layered over the engine's own
    pub snippets: SnippetsMap,
    pub variables: SnippetsMap,
    /// Trim filter: strip list markers from wrapped text
    pub trim: bool,
    pub max_repeat: u32,
}

impl ExpandConfig {
    pub fn new(syntax: Syntax) -> Self {
        Self::with_filters(syntax, &FilterSuffix::default())
    }

    pub fn with_filters(syntax: Syntax, filters: &FilterSuffix) -> Self {
        Self {
            syntax,
            syntax_type: syntax.syntax_type(),
            options: ExpandOptions::for_syntax(syntax, filters),
            snippets: SnippetsMap::new(),
            variables: SnippetsMap::new(),
            trim: filters.contains(OutputFilter::Trim),
            max_repeat: 1000,
        }
    }

    pub fn with_snippets(mut self, snippets: SnippetsMap) -> Self {
        self.snippets = snippets;
        self
    }

    pub fn with_field(mut self, field: FieldStyle) -> Self {
        self.options.field = field;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::parse_filters;

    #[test]
    fn test_field_style_render() {
        assert_eq!(FieldStyle::Numbered.render(1, ""), "${1}");
        assert_eq!(FieldStyle::Numbered.render(2, "alt"), "${2:alt}");
        assert_eq!(FieldStyle::FinalOnly.render(3, "alt"), "${0}");
    }

    #[test]
    fn test_stylesheet_options_follow_syntax() {
        let sass = ExpandConfig::new(Syntax::Sass);
        assert_eq!(sass.options.stylesheet.after, "");
        assert_eq!(sass.syntax_type, SyntaxType::Stylesheet);

        let stylus = ExpandConfig::new(Syntax::Stylus);
        assert_eq!(stylus.options.stylesheet.between, " ");
        assert_eq!(stylus.options.stylesheet.unit_aliases["p"], "%");
    }

    #[test]
    fn test_filters_enable_options() {
        let config = ExpandConfig::with_filters(Syntax::Html, &parse_filters("ul|bem|c|t", 3));
        assert!(config.options.bem.enabled);
        assert!(config.options.comment.enabled);
        assert!(config.trim);
        assert!(!config.options.jsx_enabled);
        assert!(ExpandConfig::new(Syntax::Jsx).options.jsx_enabled);
    }
}
