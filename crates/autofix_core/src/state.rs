use crate::interaction::{resolve, InputAffordance};
use crate::model::{is_polling, Run};
use crate::view_model::{AppViewModel, StageRowView};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperatorState {
    run: Option<Run>,
    input: String,
    notice: Option<String>,
    selection_pending: bool,
    dirty: bool,
}

impl OperatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn affordance(&self) -> InputAffordance {
        resolve(self.steps()).affordance
    }

    pub fn view(&self) -> AppViewModel {
        let interaction = resolve(self.steps());
        AppViewModel {
            run_id: self
                .run
                .as_ref()
                .map(|run| run.run_id.clone())
                .filter(|id| !id.is_empty()),
            run_status: self.run.as_ref().map(|run| run.status.clone()),
            stages: self
                .steps()
                .iter()
                .map(|stage| StageRowView {
                    id: stage.header.id.clone(),
                    title: stage.header.title.clone(),
                    status: stage.header.status.clone(),
                    kind: stage.kind.name(),
                })
                .collect(),
            active_stage_id: interaction.active.map(|stage| stage.header.id.clone()),
            affordance: interaction.affordance,
            placeholder: interaction.affordance.placeholder(),
            input: self.input.clone(),
            status_line: interaction.status_line,
            is_polling: is_polling(self.run.as_ref()),
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn steps(&self) -> &[crate::model::Stage] {
        match &self.run {
            Some(run) => &run.steps,
            None => &[],
        }
    }

    pub(crate) fn input(&self) -> &str {
        &self.input
    }

    pub(crate) fn observe_run(&mut self, run: Option<Run>) {
        if self.run != run {
            self.run = run;
            self.dirty = true;
        }
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.dirty = true;
        }
    }

    pub(crate) fn clear_input(&mut self) {
        self.set_input(String::new());
    }

    pub(crate) fn begin_selection(&mut self) {
        self.selection_pending = true;
    }

    /// Ends a pending selection; returns false when none was pending.
    pub(crate) fn finish_selection(&mut self) -> bool {
        std::mem::take(&mut self.selection_pending)
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        if self.notice != notice {
            self.notice = notice;
            self.dirty = true;
        }
    }
}
