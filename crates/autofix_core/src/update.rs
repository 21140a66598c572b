use crate::{route_submission, Effect, Msg, OperatorState, Submission, ROOT_CAUSE_CONFIRMATION};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: OperatorState, msg: Msg) -> (OperatorState, Vec<Effect>) {
    let effects = match msg {
        Msg::RunObserved(run) => {
            state.observe_run(run);
            Vec::new()
        }
        Msg::InputChanged(text) => {
            // A disabled input rejects edits outright.
            if state.affordance().accepts_input() {
                state.set_input(text);
            }
            Vec::new()
        }
        Msg::InputSubmitted => {
            let Some(submission) = route_submission(state.steps(), state.input()) else {
                return (state, Vec::new());
            };
            state.clear_input();
            match submission {
                Submission::StartRun { instruction } => {
                    state.set_notice(None);
                    vec![Effect::StartRun { instruction }]
                }
                Submission::SelectRootCause(selection) => {
                    let run_id = state
                        .run()
                        .map(|run| run.run_id.clone())
                        .unwrap_or_default();
                    state.begin_selection();
                    vec![Effect::SelectRootCause { run_id, selection }]
                }
            }
        }
        Msg::StartRequested(instruction) => {
            state.set_notice(None);
            vec![Effect::StartRun {
                instruction: instruction.trim().to_string(),
            }]
        }
        Msg::RootCauseSelectionFinished(result) => {
            // Only an answer to a selection this view sent may confirm it.
            if state.finish_selection() && result.is_ok() {
                state.set_notice(Some(ROOT_CAUSE_CONFIRMATION.to_string()));
            }
            Vec::new()
        }
        Msg::ResetClicked => vec![Effect::ResetView],
        Msg::NoticeDismissed => {
            state.set_notice(None);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
