/// RiceCoder Emmet
///
/// Emmet abbreviation support for embedded code editors: find the
/// abbreviation left of the cursor, decide whether the token context allows
/// expanding it, and turn the engine's output into a completion item or a
/// single buffer edit with the cursor on the final tab stop.
///
/// # Architecture
///
/// The crate sits between a host editor and an expansion engine, both of
/// which are supplied by the embedder through traits:
///
/// 1. **Host Layer**: [`TextModel`], [`LineTokenizer`] and [`EditorHost`]
///    give read and write access to the buffer; [`TokenizationProbe`]s locate
///    a tokenizer across host versions
/// 2. **Classification Layer**: [`TokenClassifier`] rejects attribute values,
///    strings and leading indentation
/// 3. **Extraction Layer**: [`AbbreviationExtractor`] keeps the longest
///    right-anchored suffix that can be an abbreviation
/// 4. **Invocation Layer**: [`ExpansionInvoker`] calls the [`Expander`] and
///    applies the [`NoisePolicy`]
/// 5. **Presentation Layer**: [`PlaceholderResolver`] strips or keeps tab
///    stops, [`EditApplier`] issues the edit
///
/// # Modes
///
/// - **Completion lists**: [`EmmetCompletionProvider`], registered per
///   language by [`emmet_html`], [`emmet_css`] and [`emmet_jsx`]
/// - **Tab expansion**: [`EmmetSession`], gated on the `emmetLegal` context
///   key
///
/// # Configuration
///
/// [`EmmetConfig`] is loaded from YAML or JSON through [`ConfigLoader`] and
/// owned by an [`EmmetContext`], together with the custom snippet registry.
/// Contexts are independent of each other.
///
/// # Example
///
/// ```ignore
/// use ricecoder_emmet::*;
/// use std::sync::Arc;
///
/// let tokens = TokenEnvironment::new().with_probe(FnProbe::new("monarch", |model| {
///     monarch_tokenizer_for(model)
/// }));
/// let context = Arc::new(EmmetContext::new(
///     Arc::new(MyEngine),
///     tokens,
///     EmmetConfig::default(),
/// )?);
///
/// let disposer = emmet_html(Some(&mut registrar), context.clone(), DEFAULT_HTML_LANGUAGES);
/// // ...
/// disposer.dispose();
/// ```
pub mod classifier;
pub mod completion;
pub mod config;
pub mod context;
pub mod data;
pub mod edit;
pub mod error;
pub mod expander;
pub mod extractor;
pub mod host;
pub mod invoker;
pub mod noise;
pub mod placeholder;
pub mod registration;
pub mod session;
pub mod snippets;
pub mod syntax;
pub mod types;

// Re-export public types and traits
pub use classifier::{current_token_index, Classification, TokenClassifier, TokenRules};
pub use completion::EmmetCompletionProvider;
pub use config::{ConfigFormat, ConfigLoader, EmmetConfig, FilterConfig, ShowExpandedAbbreviation};
pub use context::{EmmetContext, LocatedAbbreviation};
pub use edit::{EditApplier, EditorHost, EDIT_SOURCE};
pub use error::{EmmetError, EmmetResult, ExpandError};
pub use expander::{
    BemOptions, CommentOptions, ExpandConfig, ExpandOptions, Expander, FieldStyle, SnippetsMap,
    StylesheetOptions,
};
pub use extractor::{parse_filters, AbbreviationExtractor, FilterSuffix, OutputFilter};
pub use host::{FnProbe, LineTokenizer, ModelId, TextModel, TokenEnvironment, TokenizationProbe};
pub use invoker::{ExpansionInvoker, InvokeMode};
pub use noise::NoisePolicy;
pub use placeholder::{
    add_final_tab_stop, escape_non_tab_stop_dollar, remove_tab_stops,
    replace_tab_stops_with_cursors, PlaceholderResolver, ResolvedInsertion,
};
pub use registration::{
    emmet_css, emmet_html, emmet_jsx, Disposer, ProviderRegistrar, DEFAULT_CSS_LANGUAGES,
    DEFAULT_HTML_LANGUAGES, DEFAULT_JSX_LANGUAGES,
};
pub use session::{ContextKey, EmmetSession, EMMET_LEGAL, KEYBINDING_CONDITION};
pub use snippets::SnippetRegistry;
pub use syntax::{trigger_characters, Syntax, SyntaxType};
pub use types::*;
