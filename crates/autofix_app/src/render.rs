use autofix_core::{AppViewModel, InputAffordance, StageRowView};

/// Shown instead of the stage list while the view holds no run.
pub const EMPTY_HINT: &str = "No autofix run. Type :start <instruction> to begin.";

/// Lays the view model out as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let Some(status) = &view.run_status else {
        return vec![EMPTY_HINT.to_string()];
    };

    let mut lines = Vec::with_capacity(view.stages.len() + 4);
    lines.push(format!(
        "== run {} [{}]{}",
        view.run_id.as_deref().unwrap_or("(pending)"),
        status,
        if view.is_polling { " polling" } else { "" }
    ));
    for stage in &view.stages {
        let active = view.active_stage_id.as_deref() == Some(stage.id.as_str());
        lines.push(stage_line(stage, active));
    }
    if let Some(status_line) = &view.status_line {
        lines.push(format!("   {status_line}"));
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("** {notice}"));
    }
    lines.push(prompt_line(view));
    lines
}

fn stage_line(stage: &StageRowView, active: bool) -> String {
    let marker = if active { '>' } else { ' ' };
    format!(
        " {marker} {} {} ({}, {})",
        stage.id, stage.title, stage.status, stage.kind
    )
}

fn prompt_line(view: &AppViewModel) -> String {
    match view.affordance {
        InputAffordance::Disabled => "-- input disabled; :start <text> or :reset".to_string(),
        InputAffordance::RootCauseConfirmation => format!(
            "-- {} (empty line accepts the suggested cause)",
            view.placeholder
        ),
        InputAffordance::FreeInstruction => format!("-- {}", view.placeholder),
    }
}
