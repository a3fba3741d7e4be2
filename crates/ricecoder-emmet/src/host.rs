//! Host editor seams
//!
//! Hosts expose their tokenizer through internals that shift between
//! releases. Rather than reaching into those internals, the embedder
//! registers an ordered list of [`TokenizationProbe`]s; each knows one way of
//! reaching a tokenizer for a model. The first probe that succeeds is cached
//! per [`ModelId`] until the host reports the model disposed.

use crate::error::{EmmetError, EmmetResult};
use crate::types::Token;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Stable identifier the host assigns to a text model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(pub u64);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read access to a host text buffer
pub trait TextModel: Send + Sync {
    fn id(&self) -> ModelId;

    /// Host language id of the buffer
    fn language_id(&self) -> &str;

    /// Content of a 1-based line, `None` past the end of the buffer
    fn line_content(&self, line: u32) -> Option<String>;

    /// 1-based column of the first non-whitespace character, 0 for a blank
    /// line
    fn first_non_whitespace_column(&self, line: u32) -> u32 {
        self.line_content(line)
            .and_then(|text| text.chars().position(|c| !c.is_whitespace()))
            .map_or(0, |index| index as u32 + 1)
    }

    /// Concrete model, for probes that need host-specific access
    fn as_any(&self) -> &dyn Any;
}

/// Produces the tokens of one line
pub trait LineTokenizer: Send + Sync {
    fn line_tokens(&self, model: &dyn TextModel, line: u32) -> Option<Vec<Token>>;
}

/// One strategy for locating a model's tokenizer
pub trait TokenizationProbe: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn probe(&self, model: &dyn TextModel) -> Option<Arc<dyn LineTokenizer>>;
}

type ProbeFn = dyn Fn(&dyn TextModel) -> Option<Arc<dyn LineTokenizer>> + Send + Sync;

/// Probe backed by a closure
pub struct FnProbe {
    name: String,
    probe: Box<ProbeFn>,
}

impl FnProbe {
    pub fn new<F>(name: impl Into<String>, probe: F) -> Self
    where
        F: Fn(&dyn TextModel) -> Option<Arc<dyn LineTokenizer>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            probe: Box::new(probe),
        }
    }
}

impl TokenizationProbe for FnProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&self, model: &dyn TextModel) -> Option<Arc<dyn LineTokenizer>> {
        (self.probe)(model)
    }
}

/// Resolves and caches tokenizers per model
#[derive(Default)]
pub struct TokenEnvironment {
    probes: Vec<Arc<dyn TokenizationProbe>>,
    /// `None` records a model no probe could handle
    cache: RwLock<HashMap<ModelId, Option<Arc<dyn LineTokenizer>>>>,
}

impl TokenEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe; probes are tried in registration order
    pub fn with_probe(mut self, probe: impl TokenizationProbe + 'static) -> Self {
        self.probes.push(Arc::new(probe));
        self
    }

    pub fn add_probe(&mut self, probe: Arc<dyn TokenizationProbe>) {
        self.probes.push(probe);
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    /// Tokenizer for `model`, probing on first use
    pub fn resolve(&self, model: &dyn TextModel) -> EmmetResult<Arc<dyn LineTokenizer>> {
        let id = model.id();

        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        if let Some(entry) = cached {
            return entry.ok_or(EmmetError::TokenizerUnavailable(id.0));
        }

        let found = self.probes.iter().find_map(|probe| {
            let tokenizer = probe.probe(model)?;
            debug!(model = %id, probe = probe.name(), "Tokenization probe matched");
            Some(tokenizer)
        });
        if found.is_none() {
            warn!(
                model = %id,
                probes = self.probes.len(),
                "No tokenization probe matched; emmet is disabled for this model"
            );
        }

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, found.clone());

        found.ok_or(EmmetError::TokenizerUnavailable(id.0))
    }

    /// Tokens of a 1-based line; `None` when the model has no tokenizer
    pub fn line_tokens(&self, model: &dyn TextModel, line: u32) -> Option<Vec<Token>> {
        self.resolve(model).ok()?.line_tokens(model, line)
    }

    /// Forget everything cached for a model
    pub fn model_disposed(&self, id: ModelId) {
        let removed = self
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if removed.is_some() {
            debug!(model = %id, "Dropped cached tokenizer");
        }
    }

    pub fn is_cached(&self, id: ModelId) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }
}

impl fmt::Debug for TokenEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.probes.iter().map(|p| p.name()).collect();
        f.debug_struct("TokenEnvironment")
            .field("probes", &names)
            .finish_non_exhaustive()
    }
}
