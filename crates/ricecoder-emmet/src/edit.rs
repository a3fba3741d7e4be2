/// Applying an expansion to the host buffer
use crate::placeholder::ResolvedInsertion;
use crate::types::{CandidateAbbreviation, EditCommand, Position, TextEdit};
use tracing::trace;

/// Source tag attached to every edit issued by this crate
pub const EDIT_SOURCE: &str = "emmet";

/// Mutating side of the host editor
pub trait EditorHost {
    /// Close the current undo group
    fn push_undo_stop(&mut self);

    fn execute_edits(&mut self, source: &str, edits: &[TextEdit]);

    fn set_position(&mut self, position: Position);
}

/// Issues the single replace edit of an expansion
#[derive(Debug, Clone, Copy, Default)]
pub struct EditApplier;

impl EditApplier {
    pub fn new() -> Self {
        Self
    }

    /// Edit replacing exactly the candidate span on `line`
    pub fn command(
        &self,
        line: u32,
        candidate: &CandidateAbbreviation,
        insertion: ResolvedInsertion,
    ) -> EditCommand {
        EditCommand {
            range: candidate.range(line),
            replacement_text: insertion.text,
            resulting_cursor: insertion.cursor,
        }
    }

    /// Apply `command` as one undoable step, then move the cursor
    pub fn apply(&self, host: &mut dyn EditorHost, command: &EditCommand) {
        trace!(range = ?command.range, cursor = ?command.resulting_cursor, "Applying expansion");

        host.push_undo_stop();
        host.execute_edits(
            EDIT_SOURCE,
            &[TextEdit {
                range: command.range,
                text: command.replacement_text.clone(),
                force_move_markers: true,
            }],
        );
        host.set_position(command.resulting_cursor);
        host.push_undo_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Range;

    #[derive(Debug, PartialEq)]
    enum Call {
        UndoStop,
        Edit(String, Vec<TextEdit>),
        Cursor(Position),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl EditorHost for Recorder {
        fn push_undo_stop(&mut self) {
            self.calls.push(Call::UndoStop);
        }

        fn execute_edits(&mut self, source: &str, edits: &[TextEdit]) {
            self.calls.push(Call::Edit(source.to_string(), edits.to_vec()));
        }

        fn set_position(&mut self, position: Position) {
            self.calls.push(Call::Cursor(position));
        }
    }

    #[test]
    fn test_command_covers_candidate_span() {
        let candidate = CandidateAbbreviation::new("div", 10);
        let command = EditApplier::new().command(
            3,
            &candidate,
            ResolvedInsertion {
                text: "<div></div>".to_string(),
                cursor: Position::new(3, 12),
            },
        );
        assert_eq!(command.range, Range::on_line(3, 7, 10));
        assert_eq!(command.replacement_text, "<div></div>");
    }

    #[test]
    fn test_apply_brackets_edit_with_undo_stops() {
        let command = EditCommand {
            range: Range::on_line(1, 1, 4),
            replacement_text: "<p></p>".to_string(),
            resulting_cursor: Position::new(1, 4),
        };
        let mut host = Recorder::default();
        EditApplier::new().apply(&mut host, &command);

        assert_eq!(
            host.calls,
            vec![
                Call::UndoStop,
                Call::Edit(
                    "emmet".to_string(),
                    vec![TextEdit {
                        range: Range::on_line(1, 1, 4),
                        text: "<p></p>".to_string(),
                        force_move_markers: true,
                    }]
                ),
                Call::Cursor(Position::new(1, 4)),
                Call::UndoStop,
            ]
        );
    }
}
