/// Custom snippet registration
///
/// Snippets registered for a syntax are layered over the engine's built-in
/// snippets. Registering for a derived syntax (`scss`) inherits anything
/// already registered for its base syntax (`css`). The registry belongs to an
/// [`EmmetContext`](crate::context::EmmetContext), so independent contexts
/// never see each other's snippets.
use crate::expander::{Expander, SnippetsMap};
use crate::syntax::Syntax;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Default)]
pub struct SnippetRegistry {
    custom: RwLock<HashMap<Syntax, SnippetsMap>>,
    /// Custom stylesheet snippet names, offered as prefix completions
    stylesheet_keys: RwLock<HashMap<Syntax, Vec<String>>>,
    /// Built-in plus custom markup snippet names, computed lazily
    markup_keys: RwLock<HashMap<Syntax, Vec<String>>>,
}

impl SnippetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `snippets` into the registry for `syntax`
    pub fn register_custom_snippets(&self, syntax: Syntax, snippets: SnippetsMap) {
        let base = syntax.base();
        let mut custom = self.custom.write().unwrap_or_else(PoisonError::into_inner);

        let mut incoming = match custom.get(&base) {
            Some(inherited) if base != syntax => inherited.clone(),
            _ => SnippetsMap::new(),
        };
        incoming.extend(snippets);

        if syntax.is_stylesheet() {
            let mut keys = self
                .stylesheet_keys
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let entry = keys.entry(syntax).or_default();
            for name in incoming.keys() {
                if !entry.contains(name) {
                    entry.push(name.clone());
                }
            }
        }

        debug!(%syntax, count = incoming.len(), "Registered custom snippets");
        custom.entry(syntax).or_default().extend(incoming);

        self.markup_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&syntax);
    }

    /// Custom snippets registered for `syntax`
    pub fn snippets_for(&self, syntax: Syntax) -> SnippetsMap {
        self.custom
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&syntax)
            .cloned()
            .unwrap_or_default()
    }

    /// Custom stylesheet snippet names; falls back to the css list
    pub fn stylesheet_snippet_keys(&self, syntax: Syntax) -> Vec<String> {
        let keys = self
            .stylesheet_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        keys.get(&syntax)
            .or_else(|| keys.get(&Syntax::Css))
            .cloned()
            .unwrap_or_default()
    }

    /// Every markup snippet name known for `syntax`, built-ins first
    pub fn markup_snippet_keys(&self, syntax: Syntax, expander: &dyn Expander) -> Vec<String> {
        if let Some(keys) = self
            .markup_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&syntax)
        {
            return keys.clone();
        }

        let mut registry = expander.default_snippets(syntax);
        registry.extend(self.snippets_for(syntax));
        let keys: Vec<String> = registry.into_keys().collect();

        self.markup_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(syntax, keys.clone());
        keys
    }
}
