/// Token-context classification
///
/// Decides from the host tokenizer's output whether the cursor sits somewhere
/// an abbreviation may be expanded. Attribute values, strings and leading
/// indentation are all rejected here so that normal typing is never
/// clobbered.
use crate::syntax::Syntax;
use crate::types::Token;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Token-type markers the classifier matches against
///
/// The defaults match the Monarch grammars shipped with Monaco. Hosts using a
/// different grammar set can override them through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenRules {
    /// Type of the `<`, `>` and `/>` delimiters in markup
    pub markup_delimiter: String,
    /// Type a TextMate html grammar assigns to the first token of a line
    pub plain_text_marker: String,
    /// Prefix of the selector token type in stylesheets; the language id is appended
    pub stylesheet_selector_prefix: String,
    /// Identifier token kinds in script code
    pub script_identifiers: Vec<String>,
    /// Token languages whose untyped tokens are markup embedded in script
    pub embedded_markup_languages: Vec<String>,
}

impl Default for TokenRules {
    fn default() -> Self {
        Self {
            markup_delimiter: "delimiter.html".to_string(),
            plain_text_marker: "text.html.basic".to_string(),
            stylesheet_selector_prefix: "tag.".to_string(),
            script_identifiers: vec![
                "identifier.js".to_string(),
                "type.identifier.js".to_string(),
                "identifier.ts".to_string(),
                "type.identifier.ts".to_string(),
            ],
            embedded_markup_languages: vec!["mdx".to_string()],
        }
    }
}

/// Outcome of classifying a cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Index of the token under or before the cursor
    pub token_index: Option<usize>,
    pub legal: bool,
}

impl Classification {
    pub fn illegal() -> Self {
        Self {
            token_index: None,
            legal: false,
        }
    }
}

/// Classifies token context for one syntax / language pair
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    syntax: Syntax,
    language: String,
    rules: TokenRules,
}

impl TokenClassifier {
    pub fn new(syntax: Syntax, language: impl Into<String>) -> Self {
        Self::with_rules(syntax, language, TokenRules::default())
    }

    pub fn with_rules(syntax: Syntax, language: impl Into<String>, rules: TokenRules) -> Self {
        Self {
            syntax,
            language: language.into(),
            rules,
        }
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Classify the cursor position against the tokens of its line
    ///
    /// `first_non_whitespace_column` is the host's value for the line (0 for a
    /// blank line). A cursor at column 1 or inside leading indentation is
    /// illegal without looking at tokens.
    pub fn classify(
        &self,
        tokens: &[Token],
        cursor_column: u32,
        first_non_whitespace_column: u32,
    ) -> Classification {
        if cursor_column <= 1 || cursor_column <= first_non_whitespace_column {
            return Classification::illegal();
        }

        let Some(index) = current_token_index(tokens, cursor_column) else {
            return Classification::illegal();
        };

        let legal = self.is_legal_token(tokens, index);
        trace!(
            syntax = %self.syntax,
            token_type = %tokens[index].token_type,
            index,
            legal,
            "classified token"
        );

        Classification {
            token_index: Some(index),
            legal,
        }
    }

    fn is_legal_token(&self, tokens: &[Token], index: usize) -> bool {
        let current = &tokens[index];
        let token_type = current.token_type.as_str();

        match self.syntax {
            Syntax::Html | Syntax::Xml => {
                (token_type.is_empty()
                    && (index == 0 || tokens[index - 1].token_type == self.rules.markup_delimiter))
                    || tokens[0].token_type == self.rules.plain_text_marker
            }
            Syntax::Css | Syntax::Scss | Syntax::Less | Syntax::Sass | Syntax::Stylus => {
                if token_type.is_empty() {
                    return true;
                }
                // words inside a rule body are tokenized as selectors
                token_type
                    .strip_prefix(self.rules.stylesheet_selector_prefix.as_str())
                    .is_some_and(|lang| lang == self.language)
            }
            Syntax::Jsx => {
                if token_type.is_empty()
                    && self
                        .rules
                        .embedded_markup_languages
                        .iter()
                        .any(|lang| *lang == current.language)
                {
                    return true;
                }
                index > 0
                    && self
                        .rules
                        .script_identifiers
                        .iter()
                        .any(|kind| kind == token_type)
            }
        }
    }
}

/// Rightmost token whose offset is strictly before the character left of the cursor
pub fn current_token_index(tokens: &[Token], cursor_column: u32) -> Option<usize> {
    let caret = cursor_column.checked_sub(1)? as usize;
    tokens.iter().rposition(|token| token.offset < caret)
}
