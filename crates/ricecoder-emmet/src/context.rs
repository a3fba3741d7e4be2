/// The configuration context shared by providers and sessions
///
/// An [`EmmetContext`] bundles what every expansion needs: configuration,
/// the custom snippet registry, the token environment and the engine. The
/// embedding application owns it (usually behind an `Arc`) and hands it to
/// [`emmet_html`](crate::registration::emmet_html) and friends, so two
/// contexts in one process never share snippets or caches.
use crate::classifier::TokenClassifier;
use crate::config::{ConfigLoader, EmmetConfig};
use crate::error::{EmmetError, EmmetResult};
use crate::expander::{ExpandConfig, Expander, SnippetsMap};
use crate::extractor::{parse_filters, AbbreviationExtractor, FilterSuffix};
use crate::host::{ModelId, TextModel, TokenEnvironment};
use crate::invoker::ExpansionInvoker;
use crate::placeholder::PlaceholderResolver;
use crate::snippets::SnippetRegistry;
use crate::syntax::Syntax;
use crate::types::{CandidateAbbreviation, Position};
use std::sync::Arc;
use tracing::{debug, trace};

/// Abbreviation found at a cursor position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedAbbreviation {
    /// Abbreviation without filter suffix; its columns span the suffix too,
    /// so `start_column + text length + filters.len == end_column`
    pub candidate: CandidateAbbreviation,
    pub filters: FilterSuffix,
    /// Line text left of the cursor
    pub text_before_cursor: String,
}

/// Owned configuration context
pub struct EmmetContext {
    config: EmmetConfig,
    snippets: SnippetRegistry,
    tokens: TokenEnvironment,
    expander: Arc<dyn Expander>,
    invoker: ExpansionInvoker,
}

impl EmmetContext {
    /// Build a context, registering the configured custom snippets
    ///
    /// # Errors
    ///
    /// Returns `EmmetError` if the configuration fails validation or names
    /// snippets for a language without an Emmet syntax.
    pub fn new(
        expander: Arc<dyn Expander>,
        tokens: TokenEnvironment,
        config: EmmetConfig,
    ) -> EmmetResult<Self> {
        ConfigLoader::validate_config(&config)?;

        let snippets = SnippetRegistry::new();
        for (language, map) in &config.snippets {
            let syntax = Syntax::from_language_id(language)
                .ok_or_else(|| EmmetError::UnsupportedLanguage(language.clone()))?;
            snippets.register_custom_snippets(syntax, map.clone());
        }

        let invoker = ExpansionInvoker::new(expander.clone(), config.noise.clone());
        debug!(
            probes = tokens.probe_count(),
            snippet_languages = config.snippets.len(),
            "Created emmet context"
        );

        Ok(Self {
            config,
            snippets,
            tokens,
            expander,
            invoker,
        })
    }

    pub fn config(&self) -> &EmmetConfig {
        &self.config
    }

    pub fn snippets(&self) -> &SnippetRegistry {
        &self.snippets
    }

    pub fn tokens(&self) -> &TokenEnvironment {
        &self.tokens
    }

    pub fn expander(&self) -> &dyn Expander {
        self.expander.as_ref()
    }

    pub fn invoker(&self) -> &ExpansionInvoker {
        &self.invoker
    }

    /// Merge custom snippets for `syntax` into this context
    pub fn register_custom_snippets(&self, syntax: Syntax, snippets: SnippetsMap) {
        self.snippets.register_custom_snippets(syntax, snippets);
    }

    /// Engine configuration for `syntax` with the registered custom snippets
    pub fn expand_config(&self, syntax: Syntax, filters: &FilterSuffix) -> ExpandConfig {
        ExpandConfig::with_filters(syntax, filters).with_snippets(self.snippets.snippets_for(syntax))
    }

    /// Expand an abbreviation into editor snippet text
    ///
    /// Unlike the providers, which swallow engine failures, this surfaces
    /// them to the caller.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = context.expand_config(Syntax::Html, &FilterSuffix::default());
    /// let text = context.expand_abbreviation("ul>li*2", &config)?;
    /// ```
    pub fn expand_abbreviation(&self, abbreviation: &str, config: &ExpandConfig) -> EmmetResult<String> {
        let expanded = self.expander.expand(abbreviation, config)?;
        Ok(PlaceholderResolver::new().snippet_text(&expanded))
    }

    /// Find the abbreviation left of `position`
    ///
    /// Returns `None` when the model has no tokenizer, the token context is
    /// illegal, or nothing left of the cursor can be an abbreviation.
    pub fn locate(
        &self,
        model: &dyn TextModel,
        position: Position,
        syntax: Syntax,
        language: &str,
    ) -> Option<LocatedAbbreviation> {
        let tokens = self.tokens.line_tokens(model, position.line)?;
        let classifier =
            TokenClassifier::with_rules(syntax, language, self.config.token_rules.clone());
        let classification = classifier.classify(
            &tokens,
            position.column,
            model.first_non_whitespace_column(position.line),
        );
        if !classification.legal {
            return None;
        }
        let token = &tokens[classification.token_index?];

        let line_text = model.line_content(position.line)?;
        let caret = position.column as usize - 1;
        let text_before_cursor: String = line_text.chars().take(caret).collect();

        let filters = parse_filters(&text_before_cursor, self.config.max_filters());
        let abbreviation_end = position.column.checked_sub(filters.len as u32)?;
        // script tokens split an abbreviation at every operator
        let start_offset = if syntax == Syntax::Jsx { 0 } else { token.offset };
        let found = AbbreviationExtractor::new(syntax).candidate(
            &line_text,
            start_offset,
            abbreviation_end,
        )?;
        trace!(abbreviation = %found.text, filters = %filters.label(), "Located abbreviation");

        Some(LocatedAbbreviation {
            candidate: CandidateAbbreviation {
                text: found.text,
                start_column: found.start_column,
                end_column: position.column,
            },
            filters,
            text_before_cursor,
        })
    }

    /// Drop per-model caches after the host disposed a model
    pub fn model_disposed(&self, id: ModelId) {
        self.tokens.model_disposed(id);
    }
}

impl std::fmt::Debug for EmmetContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmmetContext")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
