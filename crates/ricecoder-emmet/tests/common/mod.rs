//! Shared fixtures: an in-memory host and a small fake expansion engine
#![allow(dead_code)]

use ricecoder_emmet::{
    ContextKey, EditorHost, EmmetConfig, EmmetContext, ExpandConfig, ExpandError, Expander,
    FieldStyle, FnProbe, LineTokenizer, ModelId, Position, SnippetsMap, TextEdit, TextModel,
    Token, TokenEnvironment,
};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Install a test log writer once per binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Fake engine
///
/// Markup abbreviations support `>` nesting, `*N` repetition, `.class` and
/// `#id`; stylesheet abbreviations come from a fixed table. Anything the
/// table does not know echoes back as an unresolved property, the way the
/// real engine does.
pub struct FakeExpander;

const STYLESHEET_TABLE: &[(&str, &str)] = &[
    ("m10", "margin: 10px;"),
    ("p10", "padding: 10px;"),
    ("w100", "width: 100px;"),
    ("bgc", "background-color: #${1:fff};"),
    ("pos", "position: ${1:relative};"),
];

impl Expander for FakeExpander {
    fn expand(&self, abbreviation: &str, config: &ExpandConfig) -> Result<String, ExpandError> {
        if let Some(snippet) = config.snippets.get(abbreviation) {
            return Ok(snippet.clone());
        }
        if config.syntax.is_stylesheet() {
            return Ok(expand_stylesheet(abbreviation, config));
        }
        if let Some(snippet) = self.default_snippets(config.syntax).get(abbreviation) {
            return Ok(snippet.clone());
        }
        expand_markup(abbreviation, config)
    }

    fn default_snippets(&self, syntax: ricecoder_emmet::Syntax) -> SnippetsMap {
        if syntax.is_stylesheet() {
            return SnippetsMap::new();
        }
        [
            ("a:link", "<a href=\"http://${1}\">${2}</a>"),
            ("btn:s", "<button type=\"submit\">${0}</button>"),
            ("link:css", "<link rel=\"stylesheet\" href=\"${1:style}.css\">"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

fn expand_stylesheet(abbreviation: &str, config: &ExpandConfig) -> String {
    let stylesheet = &config.options.stylesheet;
    STYLESHEET_TABLE
        .iter()
        .find(|(abbr, _)| *abbr == abbreviation)
        .map(|(_, text)| {
            text.replace(": ", &stylesheet.between)
                .replace(';', &stylesheet.after)
        })
        .unwrap_or_else(|| {
            let property = abbreviation.trim_end_matches(':');
            format!(
                "{}{}{}{}",
                property,
                stylesheet.between,
                config.options.field.render(0, ""),
                stylesheet.after
            )
        })
}

fn expand_markup(abbreviation: &str, config: &ExpandConfig) -> Result<String, ExpandError> {
    let segments: Vec<&str> = abbreviation.split('>').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ExpandError::invalid(abbreviation, "empty element"));
    }
    if abbreviation.contains(['+', '^', '(', ')', '{', '}', '[', ']', '|', ' ']) {
        return Err(ExpandError::Engine(format!(
            "fake engine cannot expand `{}`",
            abbreviation
        )));
    }

    let mut field = 0;
    let lines = render(&segments, 0, config.options.field, &mut field, abbreviation)?;
    Ok(lines.join("\n"))
}

fn render(
    segments: &[&str],
    depth: usize,
    style: FieldStyle,
    field: &mut u32,
    abbreviation: &str,
) -> Result<Vec<String>, ExpandError> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(Vec::new());
    };

    let (element, count) = match head.split_once('*') {
        Some((element, n)) => (
            element,
            n.parse::<usize>()
                .map_err(|_| ExpandError::invalid(abbreviation, "bad repeat count"))?,
        ),
        None => (*head, 1),
    };

    let mut parts = element.split(['.', '#']);
    let name = match parts.next() {
        Some("") | None => "div",
        Some(name) => name,
    };
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':') {
        return Err(ExpandError::invalid(abbreviation, "bad tag name"));
    }
    let mut attributes = String::new();
    if let Some(class) = element.split('.').nth(1) {
        attributes.push_str(&format!(" class=\"{}\"", class.split('#').next().unwrap_or("")));
    }
    if let Some(id) = element.split('#').nth(1) {
        attributes.push_str(&format!(" id=\"{}\"", id.split('.').next().unwrap_or("")));
    }

    let indent = "\t".repeat(depth);
    let mut lines = Vec::new();
    for _ in 0..count {
        if rest.is_empty() {
            *field += 1;
            lines.push(format!(
                "{indent}<{name}{attributes}>{}</{name}>",
                style.render(*field, "")
            ));
        } else {
            lines.push(format!("{indent}<{name}{attributes}>"));
            lines.extend(render(rest, depth + 1, style, field, abbreviation)?);
            lines.push(format!("{indent}</{name}>"));
        }
    }
    Ok(lines)
}

/// Text model backed by a vector of lines
pub struct MemoryModel {
    pub id: ModelId,
    pub language: String,
    pub lines: Vec<String>,
}

impl MemoryModel {
    pub fn new(id: u64, language: &str, text: &str) -> Self {
        Self {
            id: ModelId(id),
            language: language.to_string(),
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }
}

impl TextModel for MemoryModel {
    fn id(&self) -> ModelId {
        self.id
    }

    fn language_id(&self) -> &str {
        &self.language
    }

    fn line_content(&self, line: u32) -> Option<String> {
        self.lines.get(line.checked_sub(1)? as usize).cloned()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Line-local html tokenizer emitting Monarch-style token types
pub struct HtmlTokenizer;

#[derive(Clone, Copy, PartialEq)]
enum HtmlState {
    Text,
    TagName,
    InTag,
    AttributeName,
    AttributeValue(char),
}

impl HtmlTokenizer {
    pub fn tokenize(line: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut push = |offset: usize, kind: &str| {
            if tokens.last().map(|t| t.token_type.as_str()) != Some(kind) {
                tokens.push(Token::new(offset, kind, "html"));
            }
        };

        let mut state = HtmlState::Text;
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match state {
                HtmlState::Text if c == '<' => {
                    push(i, "delimiter.html");
                    if chars.get(i + 1) == Some(&'/') {
                        i += 1;
                    }
                    state = HtmlState::TagName;
                }
                HtmlState::Text => push(i, ""),
                HtmlState::TagName if c.is_alphanumeric() || c == '-' || c == ':' => {
                    push(i, "tag.html")
                }
                HtmlState::TagName | HtmlState::InTag | HtmlState::AttributeName
                    if c == '>' || c == '/' =>
                {
                    push(i, "delimiter.html");
                    if c == '>' {
                        state = HtmlState::Text;
                    }
                }
                HtmlState::TagName | HtmlState::InTag | HtmlState::AttributeName
                    if c.is_whitespace() =>
                {
                    push(i, "");
                    state = HtmlState::InTag;
                }
                HtmlState::InTag | HtmlState::AttributeName if c == '=' => {
                    push(i, "delimiter.html");
                    state = HtmlState::InTag;
                }
                HtmlState::InTag if c == '"' || c == '\'' => {
                    push(i, "attribute.value.html");
                    state = HtmlState::AttributeValue(c);
                }
                HtmlState::TagName | HtmlState::InTag | HtmlState::AttributeName => {
                    push(i, "attribute.name.html");
                    state = HtmlState::AttributeName;
                }
                HtmlState::AttributeValue(quote) => {
                    push(i, "attribute.value.html");
                    if c == quote {
                        state = HtmlState::InTag;
                    }
                }
            }
            i += 1;
        }
        tokens
    }
}

impl LineTokenizer for HtmlTokenizer {
    fn line_tokens(&self, model: &dyn TextModel, line: u32) -> Option<Vec<Token>> {
        Some(Self::tokenize(&model.line_content(line)?))
    }
}

/// Tokenizer that reports the whole line as one token
pub struct UniformTokenizer {
    pub token_type: String,
    pub language: String,
}

impl LineTokenizer for UniformTokenizer {
    fn line_tokens(&self, model: &dyn TextModel, line: u32) -> Option<Vec<Token>> {
        model.line_content(line)?;
        Some(vec![Token::new(0, self.token_type.clone(), self.language.clone())])
    }
}

/// Script tokenizer: identifiers, keywords, whitespace and delimiters
pub struct ScriptTokenizer;

const KEYWORDS: &[&str] = &["return", "const", "let", "function"];

impl LineTokenizer for ScriptTokenizer {
    fn line_tokens(&self, model: &dyn TextModel, line: u32) -> Option<Vec<Token>> {
        let text = model.line_content(line)?;
        let mut tokens = Vec::new();
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let start = i;
            let c = chars[i];
            let kind = if c.is_alphabetic() || c == '_' {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if KEYWORDS.contains(&word.as_str()) {
                    "keyword.js"
                } else {
                    "identifier.js"
                }
            } else if c.is_whitespace() {
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                ""
            } else {
                i += 1;
                "delimiter.js"
            };
            tokens.push(Token::new(start, kind, "javascript"));
        }
        Some(tokens)
    }
}

/// Context whose token environment resolves `tokenizer` for every model
pub fn context_with(
    tokenizer: impl LineTokenizer + 'static,
    config: EmmetConfig,
) -> Arc<EmmetContext> {
    let tokenizer: Arc<dyn LineTokenizer> = Arc::new(tokenizer);
    let tokens = TokenEnvironment::new().with_probe(FnProbe::new("test", move |_| {
        Some(tokenizer.clone())
    }));
    Arc::new(
        EmmetContext::new(Arc::new(FakeExpander), tokens, config)
            .expect("test configuration is valid"),
    )
}

pub fn html_context() -> Arc<EmmetContext> {
    context_with(HtmlTokenizer, EmmetConfig::default())
}

pub fn css_context(language: &str) -> Arc<EmmetContext> {
    context_with(
        UniformTokenizer {
            token_type: String::new(),
            language: language.to_string(),
        },
        EmmetConfig::default(),
    )
}

/// Every call an [`EditorHost`] received, in order
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    UndoStop,
    Edit(Vec<TextEdit>),
    Cursor(Position),
}

#[derive(Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl EditorHost for RecordingHost {
    fn push_undo_stop(&mut self) {
        self.calls.push(HostCall::UndoStop);
    }

    fn execute_edits(&mut self, source: &str, edits: &[TextEdit]) {
        assert_eq!(source, "emmet");
        self.calls.push(HostCall::Edit(edits.to_vec()));
    }

    fn set_position(&mut self, position: Position) {
        self.calls.push(HostCall::Cursor(position));
    }
}

/// Context key whose value the test can observe
#[derive(Clone, Default)]
pub struct SharedFlag(pub Arc<AtomicBool>);

impl SharedFlag {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl ContextKey for SharedFlag {
    fn set(&mut self, value: bool) {
        self.0.store(value, Ordering::SeqCst);
    }
}

/// Registrar that stores providers instead of handing them to an editor
#[derive(Default)]
pub struct RecordingRegistrar {
    pub registered: Arc<Mutex<Vec<(String, Vec<char>)>>>,
    pub providers: Vec<ricecoder_emmet::EmmetCompletionProvider>,
}

impl ricecoder_emmet::ProviderRegistrar for RecordingRegistrar {
    fn register_completion_provider(
        &mut self,
        language: &str,
        trigger_characters: &'static [char],
        provider: ricecoder_emmet::EmmetCompletionProvider,
    ) -> ricecoder_emmet::Disposer {
        self.registered
            .lock()
            .unwrap()
            .push((language.to_string(), trigger_characters.to_vec()));
        self.providers.push(provider);

        let registered = self.registered.clone();
        let language = language.to_string();
        ricecoder_emmet::Disposer::new(move || {
            registered.lock().unwrap().retain(|(l, _)| *l != language);
        })
    }
}
