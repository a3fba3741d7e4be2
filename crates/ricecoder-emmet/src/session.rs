/// Caret mode: expand on Tab
///
/// A session follows one editor instance. Every cursor movement re-evaluates
/// the abbreviation left of the cursor and publishes the result through the
/// `emmetLegal` context key; the host binds Tab to [`EmmetSession::on_tab`]
/// under [`KEYBINDING_CONDITION`], so Tab keeps its normal meaning wherever
/// nothing would expand.
use crate::context::EmmetContext;
use crate::edit::{EditApplier, EditorHost};
use crate::expander::FieldStyle;
use crate::host::{ModelId, TextModel};
use crate::invoker::InvokeMode;
use crate::placeholder::PlaceholderResolver;
use crate::syntax::Syntax;
use crate::types::{CandidateAbbreviation, Position, Range};
use std::sync::Arc;
use tracing::{debug, trace};

/// Name of the context key the session maintains
pub const EMMET_LEGAL: &str = "emmetLegal";

/// Condition under which the host should route Tab to the session
pub const KEYBINDING_CONDITION: &str = "emmetLegal && !suggestWidgetVisible";

/// Host-side boolean flag consulted by conditional key bindings
pub trait ContextKey {
    fn set(&mut self, value: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingExpansion {
    model: ModelId,
    cursor: Position,
    candidate: CandidateAbbreviation,
    expanded_text: String,
}

/// Tab-triggered expansion for one editor
pub struct EmmetSession {
    context: Arc<EmmetContext>,
    syntax: Syntax,
    language: String,
    legal: Box<dyn ContextKey>,
    pending: Option<PendingExpansion>,
    applier: EditApplier,
}

impl EmmetSession {
    pub fn new(
        context: Arc<EmmetContext>,
        syntax: Syntax,
        language: impl Into<String>,
        mut legal: Box<dyn ContextKey>,
    ) -> Self {
        legal.set(false);
        Self {
            context,
            syntax,
            language: language.into(),
            legal,
            pending: None,
            applier: EditApplier::new(),
        }
    }

    /// Whether Tab would expand right now
    pub fn is_legal(&self) -> bool {
        self.pending.is_some()
    }

    /// Abbreviation Tab would replace
    pub fn pending_abbreviation(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.candidate.text.as_str())
    }

    /// Re-evaluate after the cursor or selection moved
    ///
    /// Non-empty selections are ignored and leave the previous state in
    /// place.
    pub fn on_cursor_selection_change(&mut self, model: &dyn TextModel, selection: Range) {
        if !selection.is_empty() {
            return;
        }

        self.pending = self.evaluate(model, selection.end);
        self.legal.set(self.pending.is_some());
    }

    fn evaluate(&self, model: &dyn TextModel, cursor: Position) -> Option<PendingExpansion> {
        let located = self
            .context
            .locate(model, cursor, self.syntax, &self.language)?;

        let expand_config = self
            .context
            .expand_config(self.syntax, &located.filters)
            .with_field(FieldStyle::FinalOnly);
        let result = self.context.invoker().invoke(
            &located.candidate.text,
            &expand_config,
            InvokeMode::Commit,
            &[],
        )?;

        trace!(abbreviation = %located.candidate.text, "Tab expansion available");
        Some(PendingExpansion {
            model: model.id(),
            cursor,
            candidate: located.candidate,
            expanded_text: result.expanded_text,
        })
    }

    /// Expand the pending abbreviation
    ///
    /// Returns `false` when nothing was pending, so the host can fall back
    /// to its own Tab handling.
    pub fn on_tab(&mut self, host: &mut dyn EditorHost) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };

        let matched = (pending.cursor.column - pending.candidate.start_column) as usize;
        let insertion =
            PlaceholderResolver::new().resolve(&pending.expanded_text, matched, pending.cursor);
        let command = self
            .applier
            .command(pending.cursor.line, &pending.candidate, insertion);

        debug!(abbreviation = %pending.candidate.text, "Expanding on tab");
        self.applier.apply(host, &command);
        self.legal.set(false);
        true
    }

    /// Forget state tied to a disposed model
    pub fn model_disposed(&mut self, id: ModelId) {
        if self.pending.as_ref().is_some_and(|p| p.model == id) {
            self.pending = None;
            self.legal.set(false);
        }
        self.context.model_disposed(id);
    }
}

impl std::fmt::Debug for EmmetSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmmetSession")
            .field("syntax", &self.syntax)
            .field("language", &self.language)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
