//! Autofix core: run data model, stage interaction rules and the pure
//! operator state machine.
mod effect;
mod interaction;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use interaction::{
    affordance_for, resolve, route_submission, status_line, InputAffordance, Interaction,
    Submission, INSTRUCTION_PLACEHOLDER, ROOT_CAUSE_CONFIRMATION, ROOT_CAUSE_PLACEHOLDER,
};
pub use model::{
    is_polling, AutofixResponse, CodeContext, CodeSnippet, CodebaseChange, Insight, ProgressItem,
    PullRequest, RootCause, RootCauseSelection, Run, Stage, StageHeader, StageKind, Status,
};
pub use msg::Msg;
pub use state::OperatorState;
pub use update::update;
pub use view_model::{AppViewModel, StageRowView};
