use crate::interaction::InputAffordance;
use crate::model::Status;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// `None` until the backend assigned an id.
    pub run_id: Option<String>,
    pub run_status: Option<Status>,
    pub stages: Vec<StageRowView>,
    pub active_stage_id: Option<String>,
    pub affordance: InputAffordance,
    pub placeholder: &'static str,
    pub input: String,
    pub status_line: Option<String>,
    pub is_polling: bool,
    pub notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRowView {
    pub id: String,
    pub title: String,
    pub status: Status,
    pub kind: &'static str,
}
