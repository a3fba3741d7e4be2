/// Expansion invocation with failure and noise handling
use crate::expander::{ExpandConfig, Expander};
use crate::noise::NoisePolicy;
use crate::placeholder::PlaceholderResolver;
use crate::types::ExpansionResult;
use std::sync::Arc;
use tracing::debug;

const IMPORTANT: &str = "!important";

/// Why the expansion is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeMode {
    /// Explicit commit (Tab); only unresolved stylesheet properties are dropped
    Commit,
    /// Passive completion list; every validity and noise rule applies
    Passive,
}

/// Calls the engine and turns failures into "no suggestion"
#[derive(Clone)]
pub struct ExpansionInvoker {
    expander: Arc<dyn Expander>,
    noise: NoisePolicy,
    resolver: PlaceholderResolver,
}

impl ExpansionInvoker {
    pub fn new(expander: Arc<dyn Expander>, noise: NoisePolicy) -> Self {
        Self {
            expander,
            noise,
            resolver: PlaceholderResolver::new(),
        }
    }

    pub fn noise(&self) -> &NoisePolicy {
        &self.noise
    }

    /// Expand `abbreviation`, returning `None` when the engine fails or the
    /// output is not worth offering
    ///
    /// `snippet_keys` are the markup snippet names known for the syntax; a
    /// snippet key is never treated as noise.
    pub fn invoke(
        &self,
        abbreviation: &str,
        config: &ExpandConfig,
        mode: InvokeMode,
        snippet_keys: &[String],
    ) -> Option<ExpansionResult> {
        let syntax = config.syntax;

        if mode == InvokeMode::Passive && !self.noise.is_abbreviation_valid(syntax, abbreviation) {
            debug!(abbreviation, %syntax, "Abbreviation rejected as invalid");
            return None;
        }

        let mut expanded = self.expand_raw(abbreviation, config)?;

        if syntax.is_stylesheet() && IMPORTANT.starts_with(abbreviation) {
            expanded = IMPORTANT.to_string();
        }

        if syntax.is_stylesheet() {
            if self
                .noise
                .is_unresolved_property(abbreviation, &expanded, &config.options)
            {
                debug!(abbreviation, "Unresolved stylesheet property suppressed");
                return None;
            }
        } else if mode == InvokeMode::Passive
            && self
                .noise
                .is_markup_noise(syntax, abbreviation, &expanded, snippet_keys)
        {
            debug!(abbreviation, "Markup expansion suppressed as noise");
            return None;
        }

        let (stripped, _) = self.resolver.strip_markers(&expanded);
        if stripped.is_empty() {
            debug!(abbreviation, "Expansion has no text once markers are removed");
            return None;
        }

        Some(self.resolver.parse(&expanded))
    }

    /// Raw engine output; errors and empty output both become `None`
    pub fn expand_raw(&self, abbreviation: &str, config: &ExpandConfig) -> Option<String> {
        match self.expander.expand(abbreviation, config) {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                debug!(abbreviation, error = %err, "Expansion failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for ExpansionInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpansionInvoker")
            .field("noise", &self.noise)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpandError;
    use crate::syntax::Syntax;

    struct TableExpander;

    impl Expander for TableExpander {
        fn expand(&self, abbreviation: &str, config: &ExpandConfig) -> Result<String, ExpandError> {
            match (config.syntax.is_stylesheet(), abbreviation) {
                (true, "m10") => Ok("margin: 10px;".to_string()),
                (true, "!") => Ok("!${0}".to_string()),
                (true, other) => Ok(format!("{}: ${{0}};", other)),
                (false, "div") => Ok("<div>${0}</div>".to_string()),
                (false, "empty") => Ok("${0}".to_string()),
                (false, "ul>") => Err(ExpandError::invalid("ul>", "unexpected end")),
                (false, other) => Ok(format!("<{0}>${{1}}</{0}>", other)),
            }
        }
    }

    fn invoker() -> ExpansionInvoker {
        ExpansionInvoker::new(Arc::new(TableExpander), NoisePolicy::default())
    }

    #[test]
    fn test_engine_error_is_no_suggestion() {
        let config = ExpandConfig::new(Syntax::Html);
        assert!(invoker().invoke("ul>", &config, InvokeMode::Commit, &[]).is_none());
    }

    #[test]
    fn test_valid_expansion_is_parsed() {
        let config = ExpandConfig::new(Syntax::Html);
        let result = invoker().invoke("div", &config, InvokeMode::Passive, &[]).unwrap();
        assert_eq!(result.expanded_text, "<div>${0}</div>");
        assert_eq!(result.final_stop().map(|p| p.offset), Some(5));
    }

    #[test]
    fn test_markup_noise_only_applies_passively() {
        let config = ExpandConfig::new(Syntax::Html);
        assert!(invoker().invoke("hello", &config, InvokeMode::Passive, &[]).is_none());
        assert!(invoker().invoke("hello", &config, InvokeMode::Commit, &[]).is_some());
    }

    #[test]
    fn test_unresolved_property_is_dropped_in_both_modes() {
        let config = ExpandConfig::new(Syntax::Css);
        assert!(invoker().invoke("abc", &config, InvokeMode::Commit, &[]).is_none());
        assert!(invoker().invoke("abc", &config, InvokeMode::Passive, &[]).is_none());
        assert!(invoker().invoke("m10", &config, InvokeMode::Commit, &[]).is_some());
    }

    #[test]
    fn test_important_prefix_expands_to_important() {
        let config = ExpandConfig::new(Syntax::Css);
        let result = invoker().invoke("!", &config, InvokeMode::Passive, &[]).unwrap();
        assert_eq!(result.expanded_text, "!important");
    }

    #[test]
    fn test_marker_only_output_is_no_suggestion() {
        let config = ExpandConfig::new(Syntax::Html);
        assert!(invoker().invoke("empty", &config, InvokeMode::Commit, &[]).is_none());
    }
}
