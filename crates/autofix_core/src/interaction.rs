//! Decides which stage the operator is looking at, what input it accepts and
//! where a submission goes.

use crate::model::{RootCauseSelection, Stage, StageKind};

/// Shown once the backend accepted a root-cause selection.
pub const ROOT_CAUSE_CONFIRMATION: &str = "Great, let's move forward with this root cause.";
pub const ROOT_CAUSE_PLACEHOLDER: &str = "Or propose your own root cause instead...";
pub const INSTRUCTION_PLACEHOLDER: &str = "Say something...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputAffordance {
    /// Nothing to steer: no stage yet, a deliverable was produced, or the stage is unknown.
    #[default]
    Disabled,
    /// The active root-cause stage awaits a selection.
    RootCauseConfirmation,
    /// Arbitrary text, forwarded as a new start instruction.
    FreeInstruction,
}

impl InputAffordance {
    pub fn placeholder(self) -> &'static str {
        match self {
            InputAffordance::RootCauseConfirmation => ROOT_CAUSE_PLACEHOLDER,
            InputAffordance::Disabled | InputAffordance::FreeInstruction => {
                INSTRUCTION_PLACEHOLDER
            }
        }
    }

    pub fn accepts_input(self) -> bool {
        self != InputAffordance::Disabled
    }
}

/// Everything the view derives from the current stage sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction<'a> {
    pub active: Option<&'a Stage>,
    pub affordance: InputAffordance,
    pub status_line: Option<String>,
}

pub fn resolve(steps: &[Stage]) -> Interaction<'_> {
    let active = steps.last();
    Interaction {
        active,
        affordance: affordance_for(active),
        status_line: active.map(status_line),
    }
}

pub fn affordance_for(active: Option<&Stage>) -> InputAffordance {
    let Some(stage) = active else {
        return InputAffordance::Disabled;
    };
    match &stage.kind {
        StageKind::RootCauseAnalysis {
            selection: None, ..
        } => InputAffordance::RootCauseConfirmation,
        StageKind::RootCauseAnalysis { .. } | StageKind::Default => {
            InputAffordance::FreeInstruction
        }
        StageKind::Changes { .. } | StageKind::Unknown => InputAffordance::Disabled,
    }
}

/// The live line for a stage: its latest progress message, otherwise the
/// completion message of a finished stage, otherwise its title.
pub fn status_line(stage: &Stage) -> String {
    if let Some(item) = stage.latest_progress() {
        return item.message.clone();
    }
    match &stage.header.completed_message {
        Some(message) if stage.status().is_terminal() => message.clone(),
        _ => stage.header.title.clone(),
    }
}

/// A backend call produced by an operator submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    StartRun { instruction: String },
    SelectRootCause(RootCauseSelection),
}

/// Routes submitted text against the active stage. `None` means the
/// submission has nowhere to go and is dropped.
pub fn route_submission(steps: &[Stage], text: &str) -> Option<Submission> {
    let active = steps.last();
    let text = text.trim();
    match affordance_for(active) {
        InputAffordance::Disabled => None,
        InputAffordance::FreeInstruction if text.is_empty() => None,
        InputAffordance::FreeInstruction => Some(Submission::StartRun {
            instruction: text.to_string(),
        }),
        InputAffordance::RootCauseConfirmation if !text.is_empty() => Some(
            Submission::SelectRootCause(RootCauseSelection::custom(text)),
        ),
        InputAffordance::RootCauseConfirmation => match active.map(|stage| &stage.kind) {
            Some(StageKind::RootCauseAnalysis { causes, .. }) => causes
                .first()
                .map(|cause| Submission::SelectRootCause(RootCauseSelection::cause(&cause.id))),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{status_line, InputAffordance};
    use crate::model::{ProgressItem, Stage, StageKind, Status};

    #[test]
    fn completed_message_only_replaces_title_once_terminal() {
        let running = Stage::new("1", 0, Status::Processing, "Looking", StageKind::Default)
            .with_completed_message("Found it");
        assert_eq!(status_line(&running), "Looking");

        let mut done = running.clone();
        done.header.status = Status::Completed;
        assert_eq!(status_line(&done), "Found it");
    }

    #[test]
    fn progress_wins_over_completed_message() {
        let stage = Stage::new("1", 0, Status::Completed, "Title", StageKind::Default)
            .with_completed_message("Done")
            .with_progress(vec![
                ProgressItem::new("first", "2023-01-01T00:00:00Z"),
                ProgressItem::new("second", "2023-01-01T00:00:01Z"),
            ]);
        assert_eq!(status_line(&stage), "second");
    }

    #[test]
    fn placeholders_follow_affordance() {
        assert_eq!(
            InputAffordance::RootCauseConfirmation.placeholder(),
            "Or propose your own root cause instead..."
        );
        assert_eq!(InputAffordance::Disabled.placeholder(), "Say something...");
        assert!(!InputAffordance::Disabled.accepts_input());
    }
}
