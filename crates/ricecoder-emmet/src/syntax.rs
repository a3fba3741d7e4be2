/// Emmet syntaxes and host language mapping
///
/// Host editors identify buffers by a language id (`html`, `scss`,
/// `typescript`, ...). Emmet cares about the syntax profile that language
/// expands with, and the classifier cares about which family of token rules
/// applies to it.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntax profile passed to the expansion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    Html,
    Xml,
    Css,
    Scss,
    Less,
    Sass,
    Stylus,
    Jsx,
}

/// Output family of a syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxType {
    Markup,
    Stylesheet,
}

const MARKUP_TRIGGERS: &[char] = &[
    '!', '.', '}', ':', '*', '$', ']', '/', '>', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];
const XML_TRIGGERS: &[char] = &[
    '.', '}', '*', '$', ']', '/', '>', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];
const XSL_TRIGGERS: &[char] = &[
    '!', '.', '}', '*', '$', '/', ']', '>', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];
const DASHED_STYLESHEET_TRIGGERS: &[char] =
    &[':', '!', '-', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const INDENTED_STYLESHEET_TRIGGERS: &[char] =
    &[':', '!', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const SCRIPT_TRIGGERS: &[char] = &[
    '!', '.', '}', '*', '$', ']', '/', '>', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

impl Syntax {
    /// Resolve the syntax a host language id expands with
    ///
    /// Template languages that embed html (`handlebars`, `php`, `twig`) map to
    /// html; script languages map to jsx.
    pub fn from_language_id(language: &str) -> Option<Self> {
        match language.to_lowercase().as_str() {
            "html" | "jade" | "pug" | "slim" | "haml" | "handlebars" | "php" | "twig" => {
                Some(Syntax::Html)
            }
            "xml" | "xsl" => Some(Syntax::Xml),
            "css" => Some(Syntax::Css),
            "scss" => Some(Syntax::Scss),
            "less" => Some(Syntax::Less),
            "sass" => Some(Syntax::Sass),
            "stylus" => Some(Syntax::Stylus),
            "jsx" | "javascript" | "javascriptreact" | "typescript" | "typescriptreact" | "mdx" => {
                Some(Syntax::Jsx)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::Html => "html",
            Syntax::Xml => "xml",
            Syntax::Css => "css",
            Syntax::Scss => "scss",
            Syntax::Less => "less",
            Syntax::Sass => "sass",
            Syntax::Stylus => "stylus",
            Syntax::Jsx => "jsx",
        }
    }

    pub fn syntax_type(&self) -> SyntaxType {
        if self.is_stylesheet() {
            SyntaxType::Stylesheet
        } else {
            SyntaxType::Markup
        }
    }

    pub fn is_stylesheet(&self) -> bool {
        matches!(
            self,
            Syntax::Css | Syntax::Scss | Syntax::Less | Syntax::Sass | Syntax::Stylus
        )
    }

    pub fn is_markup(&self) -> bool {
        !self.is_stylesheet()
    }

    /// Base syntax whose snippets this syntax inherits: css or html
    pub fn base(&self) -> Syntax {
        if self.is_stylesheet() {
            Syntax::Css
        } else {
            Syntax::Html
        }
    }

    /// Separator between a stylesheet property and its value
    pub fn stylesheet_between(&self) -> &'static str {
        match self {
            Syntax::Stylus => " ",
            _ => ": ",
        }
    }

    /// Terminator after a stylesheet declaration
    pub fn stylesheet_after(&self) -> &'static str {
        match self {
            Syntax::Sass | Syntax::Stylus => "",
            _ => ";",
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Characters that re-trigger the completion list for a host language
pub fn trigger_characters(language: &str) -> &'static [char] {
    match language.to_lowercase().as_str() {
        "html" | "jade" | "slim" | "haml" | "handlebars" | "php" | "twig" => MARKUP_TRIGGERS,
        "xml" => XML_TRIGGERS,
        "xsl" => XSL_TRIGGERS,
        "css" | "scss" | "less" => DASHED_STYLESHEET_TRIGGERS,
        "sass" | "stylus" => INDENTED_STYLESHEET_TRIGGERS,
        "javascript" | "typescript" => SCRIPT_TRIGGERS,
        _ => &[],
    }
}
