use std::fmt;

use serde::{Deserialize, Serialize};

const PLACEHOLDER_TITLE: &str = "Starting Autofix...";
const ERROR_TITLE: &str = "Something went wrong";
const SEED_STAGE_ID: &str = "1";

/// Status shared by runs and their stages.
///
/// Values the backend sends that are not listed here are kept verbatim in
/// `Other` and count as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Processing,
    Completed,
    Error,
    Cancelled,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Processing => "PROCESSING",
            Status::Completed => "COMPLETED",
            Status::Error => "ERROR",
            Status::Cancelled => "CANCELLED",
            Status::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Error | Status::Completed | Status::Cancelled)
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PROCESSING" => Status::Processing,
            "COMPLETED" => Status::Completed,
            "ERROR" => Status::Error,
            "CANCELLED" => Status::Cancelled,
            _ => Status::Other(raw),
        }
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Status::from(raw.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of the fetch endpoint: `{ "autofix": Run | null }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AutofixResponse {
    #[serde(default)]
    pub autofix: Option<Run>,
}

/// One execution of the remediation process, as last reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub run_id: String,
    pub status: Status,
    #[serde(default)]
    pub created_at: String,
    /// Opaque to this client.
    #[serde(default)]
    pub repositories: Vec<serde_json::Value>,
    #[serde(default)]
    pub steps: Vec<Stage>,
}

impl Run {
    /// The run shown the instant a start is requested, before the backend answers.
    pub fn placeholder(created_at: impl Into<String>) -> Self {
        Self {
            run_id: String::new(),
            status: Status::Processing,
            created_at: created_at.into(),
            repositories: Vec::new(),
            steps: vec![Stage::new(
                SEED_STAGE_ID,
                0,
                Status::Processing,
                PLACEHOLDER_TITLE,
                StageKind::Default,
            )],
        }
    }

    /// A terminal run carrying a human-readable failure message on its only stage.
    pub fn errored(message: impl Into<String>, created_at: impl Into<String>) -> Self {
        let stage = Stage::new(SEED_STAGE_ID, 0, Status::Error, ERROR_TITLE, StageKind::Default)
            .with_completed_message(message);
        Self {
            status: Status::Error,
            steps: vec![stage],
            ..Self::placeholder(created_at)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The stage the operator interacts with: always the last one.
    pub fn active_stage(&self) -> Option<&Stage> {
        self.steps.last()
    }

    /// Whether this snapshot extends or refines `previous` without dropping or
    /// reordering its stages. Snapshots of different runs are unrelated and
    /// always continue.
    pub fn continues(&self, previous: &Run) -> bool {
        if self.run_id != previous.run_id {
            return true;
        }
        previous.steps.len() <= self.steps.len()
            && previous
                .steps
                .iter()
                .zip(&self.steps)
                .all(|(before, after)| before.header.id == after.header.id)
    }
}

/// True while a run still needs to be fetched: no run yet, or a non-terminal one.
pub fn is_polling(run: Option<&Run>) -> bool {
    run.map_or(true, |run| !run.is_terminal())
}

/// One ordered step within a run: a common header plus a kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(flatten)]
    pub header: StageHeader,
    #[serde(flatten)]
    pub kind: StageKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageHeader {
    pub id: String,
    #[serde(default)]
    pub index: usize,
    pub status: Status,
    #[serde(default)]
    pub title: String,
    #[serde(
        rename = "completedMessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_message: Option<String>,
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub progress: Vec<ProgressItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StageKind {
    #[serde(rename = "DEFAULT")]
    Default,
    #[serde(rename = "ROOT_CAUSE_ANALYSIS")]
    RootCauseAnalysis {
        #[serde(default)]
        causes: Vec<RootCause>,
        #[serde(default)]
        selection: Option<RootCauseSelection>,
    },
    #[serde(rename = "CHANGES")]
    Changes {
        #[serde(default)]
        changes: Vec<CodebaseChange>,
    },
    /// A kind this client does not know; never interactive.
    #[serde(other)]
    Unknown,
}

impl StageKind {
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Default => "DEFAULT",
            StageKind::RootCauseAnalysis { .. } => "ROOT_CAUSE_ANALYSIS",
            StageKind::Changes { .. } => "CHANGES",
            StageKind::Unknown => "UNKNOWN",
        }
    }
}

impl Stage {
    pub fn new(
        id: impl Into<String>,
        index: usize,
        status: Status,
        title: impl Into<String>,
        kind: StageKind,
    ) -> Self {
        Self {
            header: StageHeader {
                id: id.into(),
                index,
                status,
                title: title.into(),
                completed_message: None,
                insights: Vec::new(),
                progress: Vec::new(),
            },
            kind,
        }
    }

    pub fn with_completed_message(mut self, message: impl Into<String>) -> Self {
        self.header.completed_message = Some(message.into());
        self
    }

    pub fn with_progress(mut self, progress: Vec<ProgressItem>) -> Self {
        self.header.progress = progress;
        self
    }

    pub fn id(&self) -> &str {
        &self.header.id
    }

    pub fn status(&self) -> &Status {
        &self.header.status
    }

    pub fn latest_progress(&self) -> Option<&ProgressItem> {
        self.header.progress.last()
    }
}

/// A finding attached to a stage. Older backends send bare strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insight {
    Text(String),
    Detailed {
        insight: String,
        #[serde(default)]
        justification: String,
    },
}

impl Insight {
    pub fn text(&self) -> &str {
        match self {
            Insight::Text(text) => text,
            Insight::Detailed { insight, .. } => insight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressItem {
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

impl ProgressItem {
    pub fn new(message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: timestamp.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootCause {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code_context: Vec<CodeContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContext {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub snippet: Option<CodeSnippet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub file_path: String,
    pub snippet: String,
}

/// The operator's decision on a root-cause stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RootCauseSelection {
    Cause { cause_id: String },
    Custom { custom_root_cause: String },
}

impl RootCauseSelection {
    pub fn cause(cause_id: impl Into<String>) -> Self {
        RootCauseSelection::Cause {
            cause_id: cause_id.into(),
        }
    }

    pub fn custom(text: impl Into<String>) -> Self {
        RootCauseSelection::Custom {
            custom_root_cause: text.into(),
        }
    }
}

/// A proposed modification to one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodebaseChange {
    #[serde(default)]
    pub repo_id: Option<serde_json::Value>,
    #[serde(default)]
    pub repo_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub diff_str: Option<String>,
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub pr_number: u64,
    pub pr_url: String,
}
