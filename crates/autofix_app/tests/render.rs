use autofix_app::render::{render, EMPTY_HINT};
use autofix_core::{
    update, Msg, OperatorState, ProgressItem, RootCause, Run, Stage, StageKind, Status,
    ROOT_CAUSE_CONFIRMATION,
};
use pretty_assertions::assert_eq;

fn root_cause_run() -> Run {
    Run {
        run_id: "run1".to_string(),
        status: Status::Processing,
        created_at: "2023-01-01T00:00:00Z".to_string(),
        repositories: Vec::new(),
        steps: vec![
            Stage::new("1", 0, Status::Completed, "Gathering", StageKind::Default),
            Stage::new(
                "2",
                1,
                Status::Completed,
                "Root cause",
                StageKind::RootCauseAnalysis {
                    causes: vec![RootCause {
                        id: "cause1".to_string(),
                        title: "cause 1".to_string(),
                        description: "Root cause 1".to_string(),
                        code_context: Vec::new(),
                    }],
                    selection: None,
                },
            )
            .with_progress(vec![ProgressItem::new("Log message", "2023-01-01T00:00:01Z")]),
        ],
    }
}

fn observed(run: Option<Run>) -> OperatorState {
    let (state, _) = update(OperatorState::new(), Msg::RunObserved(run));
    state
}

#[test]
fn empty_view_shows_start_hint() {
    assert_eq!(render(&observed(None).view()), vec![EMPTY_HINT.to_string()]);
}

#[test]
fn root_cause_stage_renders_as_prompt() {
    let lines = render(&observed(Some(root_cause_run())).view());

    assert_eq!(
        lines,
        vec![
            "== run run1 [PROCESSING] polling".to_string(),
            "   1 Gathering (COMPLETED, DEFAULT)".to_string(),
            " > 2 Root cause (COMPLETED, ROOT_CAUSE_ANALYSIS)".to_string(),
            "   Log message".to_string(),
            "-- Or propose your own root cause instead... (empty line accepts the suggested cause)"
                .to_string(),
        ]
    );
}

#[test]
fn placeholder_run_has_no_id_yet() {
    let lines = render(&observed(Some(Run::placeholder("now"))).view());
    assert_eq!(lines[0], "== run (pending) [PROCESSING] polling");
    assert_eq!(lines[1], " > 1 Starting Autofix... (PROCESSING, DEFAULT)");
    assert_eq!(lines.last().unwrap(), "-- Say something...");
}

#[test]
fn errored_run_shows_message_and_disabled_input_is_not_offered() {
    let mut run = Run::errored("boom", "now");
    run.steps[0].kind = StageKind::Changes {
        changes: Vec::new(),
    };
    let lines = render(&observed(Some(run)).view());

    assert_eq!(lines[0], "== run (pending) [ERROR]");
    assert!(lines.contains(&"   boom".to_string()));
    assert_eq!(
        lines.last().unwrap(),
        "-- input disabled; :start <text> or :reset"
    );
}

#[test]
fn notice_is_rendered_after_a_confirmed_selection() {
    let state = observed(Some(root_cause_run()));
    let (state, _) = update(state, Msg::InputSubmitted);
    let (state, _) = update(state, Msg::RootCauseSelectionFinished(Ok(())));

    let lines = render(&state.view());
    assert!(lines.contains(&format!("** {ROOT_CAUSE_CONFIRMATION}")));
}
