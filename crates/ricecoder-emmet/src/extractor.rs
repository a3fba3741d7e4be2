/// Abbreviation extraction
///
/// Abbreviations are right-anchored at the cursor. Extraction walks the text
/// between the classified token's start and the cursor and keeps the longest
/// suffix that can be an abbreviation: whitespace is only tolerated inside an
/// unclosed `{}` or `[]` group counted from the right, so `a{click me}`
/// survives while `the quick fox` shrinks to `fox`.
use crate::syntax::Syntax;
use crate::types::CandidateAbbreviation;
use serde::{Deserialize, Serialize};

/// Output filter requested with a `|name` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFilter {
    /// `|bem`: BEM class naming
    Bem,
    /// `|c`: comment after elements with id or class
    Comment,
    /// `|t`: trim list markers from wrapped text
    Trim,
}

impl OutputFilter {
    const ALL: [OutputFilter; 3] = [OutputFilter::Bem, OutputFilter::Comment, OutputFilter::Trim];

    pub fn suffix(&self) -> &'static str {
        match self {
            OutputFilter::Bem => "bem",
            OutputFilter::Comment => "c",
            OutputFilter::Trim => "t",
        }
    }
}

/// Filters peeled off the end of the text before the cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSuffix {
    /// Filters in the order they were written
    pub filters: Vec<OutputFilter>,
    /// Characters occupied by the suffix, delimiters included
    pub len: usize,
}

impl FilterSuffix {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn contains(&self, filter: OutputFilter) -> bool {
        self.filters.contains(&filter)
    }

    /// `|bem|c` style label fragment
    pub fn label(&self) -> String {
        self.filters
            .iter()
            .map(|f| format!("|{}", f.suffix()))
            .collect()
    }
}

/// Peel up to `max_filters` trailing `|bem`, `|c` or `|t` suffixes
pub fn parse_filters(text: &str, max_filters: usize) -> FilterSuffix {
    let mut rest = text;
    let mut suffix = FilterSuffix::default();

    for _ in 0..max_filters {
        let found = OutputFilter::ALL.iter().find(|filter| {
            rest.strip_suffix(filter.suffix())
                .is_some_and(|head| head.ends_with('|'))
        });
        let Some(filter) = found else {
            break;
        };
        rest = &rest[..rest.len() - filter.suffix().len() - 1];
        suffix.len += filter.suffix().len() + 1;
        suffix.filters.insert(0, *filter);
    }

    suffix
}

/// Extracts the candidate abbreviation left of the cursor
#[derive(Debug, Clone, Copy)]
pub struct AbbreviationExtractor {
    syntax: Syntax,
}

impl AbbreviationExtractor {
    pub fn new(syntax: Syntax) -> Self {
        Self { syntax }
    }

    /// Extract from the line text, starting at the classified token
    ///
    /// `token_offset` is a character offset, `cursor_column` is 1-based. The
    /// returned candidate always ends at the cursor.
    pub fn candidate(
        &self,
        line_text: &str,
        token_offset: usize,
        cursor_column: u32,
    ) -> Option<CandidateAbbreviation> {
        let caret = cursor_column.checked_sub(1)? as usize;
        if token_offset >= caret {
            return None;
        }

        let slice: String = line_text
            .chars()
            .skip(token_offset)
            .take(caret - token_offset)
            .collect();
        let text = self.extract(&slice);

        if text.is_empty() {
            None
        } else {
            Some(CandidateAbbreviation::new(text, cursor_column))
        }
    }

    /// Reduce `text` (everything from the token start to the cursor) to a
    /// legal abbreviation; an empty string means there is none
    pub fn extract(&self, text: &str) -> String {
        // empty or ends with white space
        if text.is_empty() || text.ends_with(char::is_whitespace) {
            return String::new();
        }

        let mut text = text.trim_start();
        if self.syntax.is_stylesheet() {
            // last declaration in the line
            text = text
                .rsplit(|c: char| matches!(c, '{' | '}' | ';'))
                .next()
                .unwrap_or_default()
                .trim_start();
        }

        let text = right_anchored_suffix(text);
        if self.has_legal_start(text) {
            text.to_string()
        } else {
            String::new()
        }
    }

    fn has_legal_start(&self, text: &str) -> bool {
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        match self.syntax {
            Syntax::Css | Syntax::Scss | Syntax::Less | Syntax::Sass | Syntax::Stylus => {
                let first = if first == '-' {
                    match chars.next() {
                        Some(c) => c,
                        None => return false,
                    }
                } else {
                    first
                };
                first.is_ascii_alphabetic() || matches!(first, '!' | '@' | '#')
            }
            // `{` collides with script braces
            Syntax::Jsx => first.is_ascii_alphabetic() || matches!(first, '[' | '(' | '.' | '#' | '!'),
            Syntax::Html | Syntax::Xml => {
                first.is_ascii_alphabetic() || matches!(first, '[' | '(' | '.' | '#' | '{' | '!')
            }
        }
    }
}

/// Cut `text` after the rightmost whitespace that is not inside an unclosed
/// `{}` / `[]` group counted from the right
fn right_anchored_suffix(text: &str) -> &str {
    let mut depth: i32 = 0;

    // index 0 is never whitespace after trimming
    for (index, ch) in text.char_indices().rev() {
        if index == 0 {
            break;
        }
        match ch {
            '{' | '[' => depth += 1,
            '}' | ']' => depth -= 1,
            _ => {}
        }
        if ch.is_whitespace() && depth >= 0 {
            return &text[index + ch.len_utf8()..];
        }
    }

    text
}
