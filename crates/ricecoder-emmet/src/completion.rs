//! Completion-list mode
//!
//! The provider offers the expanded abbreviation under the cursor as a
//! snippet completion, along with snippet names that start with the tag
//! being typed. Lists are always marked incomplete so the host asks again on
//! the next keystroke.

use crate::config::ShowExpandedAbbreviation;
use crate::context::EmmetContext;
use crate::data;
use crate::expander::ExpandConfig;
use crate::host::TextModel;
use crate::invoker::InvokeMode;
use crate::placeholder::{remove_tab_stops, replace_tab_stops_with_cursors, PlaceholderResolver};
use crate::syntax::Syntax;
use crate::types::{CompletionItem, CompletionItemKind, CompletionList, Position, Range};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Tag typed after the last `>` or `+`
static NEW_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[>+]([\w:-]+)$").unwrap());

const ABBREVIATION_DETAIL: &str = "Emmet Abbreviation";
const EXPANDED_DETAIL: &str = "Emmet abbreviation";
const CUSTOM_SNIPPET_DETAIL: &str = "Emmet Custom Snippet";

/// Completion provider for one host language
#[derive(Debug, Clone)]
pub struct EmmetCompletionProvider {
    context: Arc<EmmetContext>,
    syntax: Syntax,
    language: String,
}

impl EmmetCompletionProvider {
    pub fn new(context: Arc<EmmetContext>, syntax: Syntax, language: impl Into<String>) -> Self {
        Self {
            context,
            syntax,
            language: language.into(),
        }
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Completion items for the cursor position, `None` when Emmet has
    /// nothing to offer
    pub fn provide_completion_items(
        &self,
        model: &dyn TextModel,
        position: Position,
    ) -> Option<CompletionList> {
        let config = self.context.config();
        match config.show_expanded_abbreviation {
            ShowExpandedAbbreviation::Never => return None,
            ShowExpandedAbbreviation::InMarkupAndStylesheetFilesOnly
                if self.syntax == Syntax::Jsx =>
            {
                return None
            }
            _ => {}
        }

        let located = self
            .context
            .locate(model, position, self.syntax, &self.language)?;
        let abbreviation = located.candidate.text.as_str();
        let range = located.candidate.range(position.line);
        let is_stylesheet = self.syntax.is_stylesheet();

        if !is_stylesheet && is_open_tag(&located.text_before_cursor, abbreviation) {
            debug!(abbreviation, "Cursor is inside an open tag");
            return None;
        }

        let expand_config = self.context.expand_config(self.syntax, &located.filters);
        let snippet_keys = if is_stylesheet {
            Vec::new()
        } else {
            self.context
                .snippets()
                .markup_snippet_keys(self.syntax, self.context.expander())
        };

        let resolver = PlaceholderResolver::new();
        let expanded = self
            .context
            .invoker()
            .invoke(abbreviation, &expand_config, InvokeMode::Passive, &snippet_keys)
            .map(|result| {
                let text = result.expanded_text;
                let item = CompletionItem::snippet(
                    format!("{}{}", abbreviation, located.filters.label()),
                    resolver.snippet_text(&text),
                    range,
                )
                .with_detail(EXPANDED_DETAIL)
                .with_documentation(replace_tab_stops_with_cursors(&text));
                (item, text)
            });

        let mut items = if is_stylesheet {
            let threshold = config.noise.long_property_threshold;
            if abbreviation.chars().count() > threshold && data::prefixes_css_property(abbreviation) {
                debug!(abbreviation, "Abbreviation reads as a css property name");
                return Some(CompletionList::incomplete(Vec::new()));
            }

            match expanded {
                Some((mut item, text)) => {
                    item.label = remove_tab_stops(&text);
                    item.filter_text = Some(abbreviation.to_string());

                    let keys = self.context.snippets().stylesheet_snippet_keys(self.syntax);
                    let mut items = self.snippet_suggestions(
                        &keys,
                        abbreviation,
                        abbreviation,
                        range,
                        &expand_config,
                        CUSTOM_SNIPPET_DETAIL,
                        false,
                    );

                    // typing a property name fuzzily matches unrelated snippets
                    if !items.iter().any(|x| x.insert_text == item.insert_text)
                        && (abbreviation.chars().any(|c| c.is_ascii_digit())
                            || is_fuzzy_match(abbreviation, &item.label))
                    {
                        items.push(item);
                    }
                    items
                }
                None => Vec::new(),
            }
        } else {
            self.markup_items(abbreviation, range, &expand_config, &snippet_keys, expanded)
        };

        if config.show_suggestions_as_snippets {
            for item in &mut items {
                item.kind = CompletionItemKind::Snippet;
            }
        }

        debug!(abbreviation, count = items.len(), "Emmet completion items");
        (!items.is_empty()).then(|| CompletionList::incomplete(items))
    }

    fn markup_items(
        &self,
        abbreviation: &str,
        range: Range,
        expand_config: &ExpandConfig,
        snippet_keys: &[String],
        expanded: Option<(CompletionItem, String)>,
    ) -> Vec<CompletionItem> {
        let mut main = expanded.map(|(item, _)| item);

        let tag = NEW_TAG
            .captures(abbreviation)
            .and_then(|c| c.get(1))
            .map_or(abbreviation, |m| m.as_str());

        let tag_items = if self.syntax == Syntax::Xml {
            Vec::new()
        } else {
            let tags: Vec<String> = data::commonly_used_tags().map(str::to_string).collect();
            self.snippet_suggestions(
                &tags,
                tag,
                abbreviation,
                range,
                expand_config,
                ABBREVIATION_DETAIL,
                true,
            )
        };

        let mut abbreviation_items = Vec::new();
        if self.context.config().show_abbreviation_suggestions {
            let keys: Vec<String> = snippet_keys
                .iter()
                .filter(|key| !data::is_commonly_used_tag(key))
                .cloned()
                .collect();
            abbreviation_items = self.snippet_suggestions(
                &keys,
                tag,
                abbreviation,
                range,
                expand_config,
                ABBREVIATION_DETAIL,
                true,
            );

            // keep the full expansion above suggestions for the last tag only
            if let Some(item) = main.as_mut() {
                if !abbreviation_items.is_empty() && tag != abbreviation {
                    item.sort_text = Some(format!("0{}", item.label));
                    for suggestion in &mut abbreviation_items {
                        suggestion.filter_text = Some(abbreviation.to_string());
                        suggestion.sort_text = Some(format!("9{}", abbreviation));
                    }
                }
            }
        }

        let echoes_colon_tag = main.as_ref().is_some_and(|item| {
            item.insert_text == format!("<{0}>${{0}}</{0}>", abbreviation)
        });

        let mut items: Vec<CompletionItem> = main.into_iter().collect();
        items.extend(tag_items);
        items.extend(abbreviation_items);

        // `ns:tag` would otherwise be listed twice
        if self.syntax == Syntax::Html
            && items.len() >= 2
            && abbreviation.contains(':')
            && echoes_colon_tag
        {
            items.retain(|item| item.label != abbreviation);
        }

        items
    }

    /// Items for every key that starts with `prefix`
    ///
    /// The suggested abbreviation is `abbreviation` completed with the rest
    /// of the key, so `ul>l` suggests `ul>li`, `ul>link` and so on.
    #[allow(clippy::too_many_arguments)]
    fn snippet_suggestions(
        &self,
        keys: &[String],
        prefix: &str,
        abbreviation: &str,
        range: Range,
        expand_config: &ExpandConfig,
        detail: &str,
        skip_full_match: bool,
    ) -> Vec<CompletionItem> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let prefix_lower = prefix.to_lowercase();
        let resolver = PlaceholderResolver::new();

        keys.iter()
            .filter(|key| {
                key.starts_with(&prefix_lower) && !(skip_full_match && **key == prefix_lower)
            })
            .filter_map(|key| {
                let rest = &key[prefix_lower.len()..];
                let expanded = self
                    .context
                    .invoker()
                    .expand_raw(&format!("{}{}", abbreviation, rest), expand_config)?;

                Some(
                    CompletionItem::snippet(
                        format!("{}{}", prefix, rest),
                        resolver.snippet_text(&expanded),
                        range,
                    )
                    .with_detail(detail)
                    .with_documentation(replace_tab_stops_with_cursors(&expanded)),
                )
            })
            .collect()
    }
}

/// `<div` with the cursor after `div`: the user is writing a tag by hand
fn is_open_tag(text_before_cursor: &str, abbreviation: &str) -> bool {
    let word_start = text_before_cursor
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || matches!(c, '_' | ',' | ':' | '-' | '.'))
        .last()
        .map_or(text_before_cursor.len(), |(i, _)| i);
    let word = &text_before_cursor[word_start..];

    word == abbreviation && text_before_cursor.ends_with(&format!("<{}", abbreviation))
}

/// Case-insensitive subsequence test
fn is_fuzzy_match(abbreviation: &str, label: &str) -> bool {
    let mut label = label.chars().flat_map(char::to_lowercase);
    abbreviation
        .chars()
        .flat_map(char::to_lowercase)
        .all(|c| label.any(|l| l == c))
}
