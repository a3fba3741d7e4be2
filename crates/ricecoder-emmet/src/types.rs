//! Core data types shared by the abbreviation pipeline
//!
//! Positions follow the host editor convention: lines and columns are 1-based,
//! and a column counts characters, so column 1 is before the first character.

use serde::{Deserialize, Serialize};

/// A lexical span produced by the host tokenizer
///
/// Tokens for one line are ordered by ascending offset and cover the line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Character offset of the token start within its line
    pub offset: usize,
    /// Syntax-class label, possibly empty
    #[serde(rename = "type")]
    pub token_type: String,
    /// Language the tokenizer was in when it produced the token
    pub language: String,
}

impl Token {
    pub fn new(offset: usize, token_type: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            offset,
            token_type: token_type.into(),
            language: language.into(),
        }
    }
}

/// Cursor position in a text model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line number
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A span between two positions; `end` is exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering `start_column..end_column` on a single line
    pub fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        Self::new(Position::new(line, start_column), Position::new(line, end_column))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Abbreviation text found immediately left of the cursor
///
/// `end_column - start_column` equals the text length, except when the
/// abbreviation carries a filter suffix such as `|bem`: the suffix is left out
/// of `text` but stays inside the column span, so replacing the span removes
/// it from the buffer as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateAbbreviation {
    pub text: String,
    /// Column of the first abbreviation character
    pub start_column: u32,
    /// Cursor column; the abbreviation ends right before it
    pub end_column: u32,
}

impl CandidateAbbreviation {
    pub fn new(text: impl Into<String>, end_column: u32) -> Self {
        let text = text.into();
        let len = text.chars().count() as u32;
        Self {
            start_column: end_column.saturating_sub(len),
            end_column,
            text,
        }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn range(&self, line: u32) -> Range {
        Range::on_line(line, self.start_column, self.end_column)
    }
}

/// A tab-stop marker found in engine output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Tab-stop number; 0 is the final stop
    pub index: u32,
    /// Character offset of the marker within the expanded text
    pub offset: usize,
    /// Default text of a `${n:label}` marker
    pub label: Option<String>,
}

/// Output of a successful expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionResult {
    /// Raw engine output, markers included
    pub expanded_text: String,
    /// Markers in order of appearance
    pub placeholders: Vec<Placeholder>,
    /// Position within `placeholders` of the designated final stop
    pub final_placeholder: Option<usize>,
}

impl ExpansionResult {
    pub fn final_stop(&self) -> Option<&Placeholder> {
        self.final_placeholder.and_then(|i| self.placeholders.get(i))
    }
}

/// Single replace edit produced for an expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCommand {
    /// Exactly the span of the matched abbreviation
    pub range: Range,
    pub replacement_text: String,
    pub resulting_cursor: Position,
}

/// Buffer edit as issued to the host editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub text: String,
    pub force_move_markers: bool,
}

/// Completion item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionItemKind {
    Property,
    Snippet,
}

/// How the host should interpret `insert_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertTextRule {
    /// Plain text
    None,
    /// Editor-native snippet with tab-stop navigation
    InsertAsSnippet,
}

/// A completion suggestion offered to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    pub detail: Option<String>,
    pub documentation: Option<String>,
    pub insert_text: String,
    pub insert_text_rules: InsertTextRule,
    pub range: Range,
    pub sort_text: Option<String>,
    pub filter_text: Option<String>,
}

impl CompletionItem {
    /// Snippet-style property item, the shape every Emmet suggestion takes
    pub fn snippet(label: impl Into<String>, insert_text: impl Into<String>, range: Range) -> Self {
        Self {
            label: label.into(),
            kind: CompletionItemKind::Property,
            detail: None,
            documentation: None,
            insert_text: insert_text.into(),
            insert_text_rules: InsertTextRule::InsertAsSnippet,
            range,
            sort_text: None,
            filter_text: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// Completion response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionList {
    pub suggestions: Vec<CompletionItem>,
    /// Emmet lists are always re-requested as the user keeps typing
    pub incomplete: bool,
}

impl CompletionList {
    pub fn incomplete(suggestions: Vec<CompletionItem>) -> Self {
        Self {
            suggestions,
            incomplete: true,
        }
    }
}
