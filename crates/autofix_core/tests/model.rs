use autofix_core::{
    is_polling, AutofixResponse, Insight, RootCauseSelection, Run, Stage, StageKind, Status,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn run_with_status(status: Status) -> Run {
    Run {
        status,
        ..Run::placeholder("2023-01-01T00:00:00Z")
    }
}

#[test]
fn placeholder_is_processing_with_one_starting_stage() {
    let run = Run::placeholder("2023-01-01T00:00:00Z");

    assert_eq!(run.status, Status::Processing);
    assert_eq!(run.run_id, "");
    assert_eq!(run.created_at, "2023-01-01T00:00:00Z");
    assert_eq!(
        run.steps,
        vec![Stage::new(
            "1",
            0,
            Status::Processing,
            "Starting Autofix...",
            StageKind::Default
        )]
    );
}

#[test]
fn errored_run_carries_message_on_its_only_stage() {
    let run = Run::errored("boom", "2023-01-01T00:00:00Z");

    assert_eq!(run.status, Status::Error);
    assert_eq!(run.steps.len(), 1);
    assert_eq!(run.steps[0].header.status, Status::Error);
    assert_eq!(run.steps[0].header.title, "Something went wrong");
    assert_eq!(run.steps[0].header.completed_message.as_deref(), Some("boom"));
}

#[test]
fn polling_stops_only_for_terminal_statuses() {
    assert!(is_polling(None));
    for status in [Status::Error, Status::Completed, Status::Cancelled] {
        assert!(!is_polling(Some(&run_with_status(status))));
    }
    for status in [
        Status::Processing,
        Status::from("NEED_MORE_INFORMATION"),
        Status::from("PENDING"),
    ] {
        assert!(is_polling(Some(&run_with_status(status))));
    }
}

#[test]
fn unknown_status_is_kept_verbatim() {
    let status = Status::from("WAITING_FOR_USER_RESPONSE");
    assert_eq!(status, Status::Other("WAITING_FOR_USER_RESPONSE".to_string()));
    assert_eq!(status.to_string(), "WAITING_FOR_USER_RESPONSE");
    assert!(!status.is_terminal());
}

#[test]
fn backend_snapshot_deserializes_every_stage_kind() {
    let body = json!({
        "autofix": {
            "run_id": "42",
            "status": "PROCESSING",
            "created_at": "2023-01-01T00:00:00Z",
            "repositories": [{"name": "sentry"}],
            "steps": [
                {
                    "type": "DEFAULT",
                    "id": "1",
                    "index": 0,
                    "status": "COMPLETED",
                    "title": "Gathering context",
                    "completedMessage": "Done gathering",
                    "insights": ["plain", {"insight": "detailed", "justification": "why"}],
                    "progress": [{"message": "Reading files", "timestamp": "2023-01-01T00:00:00Z"}]
                },
                {
                    "type": "ROOT_CAUSE_ANALYSIS",
                    "id": "2",
                    "index": 1,
                    "status": "COMPLETED",
                    "title": "Root cause",
                    "causes": [{
                        "id": "cause1",
                        "title": "cause 1",
                        "description": "Root cause 1",
                        "code_context": [{
                            "id": "ctx",
                            "title": "ctx title",
                            "description": "ctx description",
                            "snippet": {"file_path": "src/lib.rs", "snippet": "fn x() {}"}
                        }]
                    }],
                    "selection": {"cause_id": "cause1", "fix_id": "fix1"},
                    "progress": []
                },
                {
                    "type": "CHANGES",
                    "id": "3",
                    "index": 2,
                    "status": "PROCESSING",
                    "title": "Changes",
                    "changes": [{
                        "repo_id": 7,
                        "repo_name": "getsentry/sentry",
                        "title": "Fix it",
                        "description": "desc",
                        "diff_str": "--- a\n+++ b\n"
                    }],
                    "progress": []
                },
                {
                    "type": "SOMETHING_NEW",
                    "id": "4",
                    "index": 3,
                    "status": "PROCESSING",
                    "title": "Future stage"
                }
            ]
        }
    });

    let response: AutofixResponse = serde_json::from_value(body).expect("valid snapshot");
    let run = response.autofix.expect("run present");

    assert_eq!(run.run_id, "42");
    assert_eq!(run.steps.len(), 4);

    let default = &run.steps[0];
    assert_eq!(default.kind, StageKind::Default);
    assert_eq!(default.header.completed_message.as_deref(), Some("Done gathering"));
    let insights: Vec<&str> = default.header.insights.iter().map(Insight::text).collect();
    assert_eq!(insights, vec!["plain", "detailed"]);
    assert_eq!(default.header.progress[0].message, "Reading files");

    match &run.steps[1].kind {
        StageKind::RootCauseAnalysis { causes, selection } => {
            assert_eq!(causes[0].id, "cause1");
            assert_eq!(
                causes[0].code_context[0].snippet.as_ref().unwrap().file_path,
                "src/lib.rs"
            );
            assert_eq!(selection, &Some(RootCauseSelection::cause("cause1")));
        }
        other => panic!("unexpected kind {other:?}"),
    }

    match &run.steps[2].kind {
        StageKind::Changes { changes } => {
            assert_eq!(changes[0].repo_name, "getsentry/sentry");
            assert_eq!(changes[0].diff_str.as_deref(), Some("--- a\n+++ b\n"));
        }
        other => panic!("unexpected kind {other:?}"),
    }

    assert_eq!(run.steps[3].kind, StageKind::Unknown);
}

#[test]
fn null_autofix_and_null_selection_deserialize() {
    let empty: AutofixResponse = serde_json::from_value(json!({"autofix": null})).unwrap();
    assert_eq!(empty.autofix, None);

    let stage: Stage = serde_json::from_value(json!({
        "type": "ROOT_CAUSE_ANALYSIS",
        "id": "2",
        "index": 1,
        "status": "COMPLETED",
        "title": "Root cause",
        "causes": [],
        "selection": null
    }))
    .unwrap();
    assert_eq!(
        stage.kind,
        StageKind::RootCauseAnalysis {
            causes: Vec::new(),
            selection: None
        }
    );

    let custom: RootCauseSelection =
        serde_json::from_value(json!({"custom_root_cause": "my idea"})).unwrap();
    assert_eq!(custom, RootCauseSelection::custom("my idea"));
}

#[test]
fn snapshot_continuity_rejects_dropped_or_reordered_stages() {
    let mut previous = Run::placeholder("t");
    previous.run_id = "run".to_string();
    previous
        .steps
        .push(Stage::new("2", 1, Status::Processing, "Next", StageKind::Default));

    let mut extended = previous.clone();
    extended
        .steps
        .push(Stage::new("3", 2, Status::Processing, "Third", StageKind::Default));
    assert!(extended.continues(&previous));

    let mut refined = previous.clone();
    refined.steps[1].header.status = Status::Completed;
    assert!(refined.continues(&previous));

    let mut truncated = previous.clone();
    truncated.steps.pop();
    assert!(!truncated.continues(&previous));

    let mut reordered = previous.clone();
    reordered.steps.swap(0, 1);
    assert!(!reordered.continues(&previous));

    let mut other_run = truncated;
    other_run.run_id = "another".to_string();
    assert!(other_run.continues(&previous));
}
