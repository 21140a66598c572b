use crate::model::Run;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The engine observed a new (reset-aware) run for this view.
    RunObserved(Option<Run>),
    /// Operator edited the input box.
    InputChanged(String),
    /// Operator submitted the current input.
    InputSubmitted,
    /// Operator asked to start a run, e.g. from the start banner.
    StartRequested(String),
    /// Backend answered a root-cause selection.
    RootCauseSelectionFinished(Result<(), String>),
    /// Operator clicked Reset.
    ResetClicked,
    /// Operator dismissed the notice.
    NoticeDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}
