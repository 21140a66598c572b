use crate::model::RootCauseSelection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartRun {
        instruction: String,
    },
    SelectRootCause {
        run_id: String,
        selection: RootCauseSelection,
    },
    ResetView,
}
