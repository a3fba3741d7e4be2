/// Setup entry points
///
/// Each entry point registers one [`EmmetCompletionProvider`] per host
/// language and returns a [`Disposer`] that unregisters all of them.
use crate::completion::EmmetCompletionProvider;
use crate::context::EmmetContext;
use crate::error::EmmetError;
use crate::syntax::{trigger_characters, Syntax};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const DEFAULT_HTML_LANGUAGES: &[&str] = &["html"];
pub const DEFAULT_CSS_LANGUAGES: &[&str] = &["css"];
pub const DEFAULT_JSX_LANGUAGES: &[&str] = &["javascript"];

/// Host registry for completion providers
pub trait ProviderRegistrar {
    /// Register `provider` for `language`, returning its unregistration handle
    fn register_completion_provider(
        &mut self,
        language: &str,
        trigger_characters: &'static [char],
        provider: EmmetCompletionProvider,
    ) -> Disposer;
}

/// Undoes a registration when disposed
pub struct Disposer {
    dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl Disposer {
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Disposer with nothing to undo
    pub fn noop() -> Self {
        Self { dispose: None }
    }

    /// Single disposer for several registrations
    pub fn all(disposers: Vec<Disposer>) -> Self {
        if disposers.iter().all(Disposer::is_noop) {
            return Self::noop();
        }
        Self::new(move || disposers.into_iter().for_each(Disposer::dispose))
    }

    pub fn is_noop(&self) -> bool {
        self.dispose.is_none()
    }

    pub fn dispose(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Register Emmet for markup languages (`html` by default)
pub fn emmet_html(
    registrar: Option<&mut dyn ProviderRegistrar>,
    context: Arc<EmmetContext>,
    languages: &[&str],
) -> Disposer {
    register_provider(registrar, context, languages, Syntax::Html)
}

/// Register Emmet for stylesheet languages (`css` by default)
///
/// Each language expands with its own stylesheet syntax when it has one,
/// so `scss` keeps its nesting rules.
pub fn emmet_css(
    registrar: Option<&mut dyn ProviderRegistrar>,
    context: Arc<EmmetContext>,
    languages: &[&str],
) -> Disposer {
    register_provider(registrar, context, languages, Syntax::Css)
}

/// Register Emmet for script languages (`javascript` by default)
pub fn emmet_jsx(
    registrar: Option<&mut dyn ProviderRegistrar>,
    context: Arc<EmmetContext>,
    languages: &[&str],
) -> Disposer {
    register_provider(registrar, context, languages, Syntax::Jsx)
}

fn register_provider(
    registrar: Option<&mut dyn ProviderRegistrar>,
    context: Arc<EmmetContext>,
    languages: &[&str],
    syntax: Syntax,
) -> Disposer {
    let Some(registrar) = registrar else {
        error!(
            error = %EmmetError::host_unavailable("no completion provider registrar was supplied"),
            %syntax,
            "Emmet setup aborted"
        );
        return Disposer::noop();
    };

    let mut disposers = Vec::with_capacity(languages.len());
    for &language in languages {
        if context.config().is_language_excluded(language) {
            debug!(language, "Language excluded from emmet");
            continue;
        }

        let language_syntax = match Syntax::from_language_id(language) {
            Some(own) if own.is_stylesheet() && syntax.is_stylesheet() => own,
            _ => syntax,
        };
        let provider = EmmetCompletionProvider::new(context.clone(), language_syntax, language);
        disposers.push(registrar.register_completion_provider(
            language,
            trigger_characters(language),
            provider,
        ));
    }

    info!(%syntax, count = disposers.len(), "Registered emmet completion providers");
    Disposer::all(disposers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_noop_disposer() {
        let disposer = Disposer::noop();
        assert!(disposer.is_noop());
        disposer.dispose();
    }

    #[test]
    fn test_all_runs_each_disposer_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let disposers = (0..3)
            .map(|_| {
                let count = count.clone();
                Disposer::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        Disposer::all(disposers).dispose();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_all_of_noops_is_noop() {
        assert!(Disposer::all(vec![Disposer::noop(), Disposer::noop()]).is_noop());
    }
}
