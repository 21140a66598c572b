use std::sync::Arc;

use autofix_core::{Effect, Msg};
use autofix_engine::AutofixSession;
use autofix_logging::{autofix_info, autofix_warn};
use tokio::sync::mpsc;

/// Executes effects against the session; answers come back as messages.
pub struct EffectRunner {
    session: Arc<AutofixSession>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl EffectRunner {
    pub fn new(session: Arc<AutofixSession>, msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self { session, msg_tx }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun { instruction } => {
                    autofix_info!(
                        "StartRun group_id={} instruction_len={}",
                        self.session.group_id(),
                        instruction.len()
                    );
                    // The cache change reaches the view through the subscription.
                    let session = self.session.clone();
                    tokio::spawn(async move { session.start(&instruction).await });
                }
                Effect::SelectRootCause { run_id, selection } => {
                    let session = self.session.clone();
                    let msg_tx = self.msg_tx.clone();
                    tokio::spawn(async move {
                        let result = session
                            .select_root_cause(&run_id, &selection)
                            .await
                            .map_err(|err| err.to_string());
                        let _ = msg_tx.send(Msg::RootCauseSelectionFinished(result));
                    });
                }
                Effect::ResetView => {
                    self.session.reset();
                    // Reset does not write the cache, so nothing else would notify.
                    if self
                        .msg_tx
                        .send(Msg::RunObserved(self.session.current()))
                        .is_err()
                    {
                        autofix_warn!("View closed before reset was observed");
                    }
                }
            }
        }
    }
}
