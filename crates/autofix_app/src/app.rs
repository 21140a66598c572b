use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use autofix_core::{update, Msg, OperatorState};
use autofix_engine::{ReqwestBackend, SyncEngine};
use autofix_logging::{autofix_debug, autofix_info, autofix_warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::WatchArgs;
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::input::{parse_line, OperatorCommand};
use crate::render::{render, EMPTY_HINT};

pub(crate) async fn watch(args: WatchArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_overrides(&args);
    config.validate()?;
    autofix_logging::initialize(config.log_destination()?, config.log_level()?);
    autofix_info!(
        "Watching group_id={} event_id={} base_url={}",
        args.group_id,
        args.event_id,
        config.base_url
    );

    let backend = ReqwestBackend::new(config.backend_settings())
        .context("failed to build HTTP client")?;
    let engine = SyncEngine::new(Arc::new(backend), config.sync_settings());
    let session = Arc::new(engine.open(args.group_id.clone(), args.event_id.clone()));

    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Msg>();
    let runner = EffectRunner::new(session.clone(), msg_tx.clone());
    let mut shell = Shell::new(runner);

    let mut runs = session.subscribe();
    shell.dispatch(Msg::RunObserved(session.current()));
    if shell.state.run().is_none() {
        shell.print(&[EMPTY_HINT.to_string()]);
    }
    if let Some(instruction) = args.instruction {
        shell.dispatch(Msg::StartRequested(instruction));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    autofix_debug!("stdin closed");
                    break;
                };
                match parse_line(&line) {
                    OperatorCommand::Quit => break,
                    OperatorCommand::Start(instruction) => {
                        shell.dispatch(Msg::StartRequested(instruction));
                    }
                    OperatorCommand::Reset => shell.dispatch(Msg::ResetClicked),
                    OperatorCommand::Submit(text) => {
                        shell.dispatch(Msg::NoticeDismissed);
                        shell.dispatch(Msg::InputChanged(text));
                        shell.dispatch(Msg::InputSubmitted);
                    }
                    OperatorCommand::Unknown(name) => {
                        autofix_warn!("Unknown command :{}", name);
                        shell.print(&[format!("unknown command :{name}")]);
                    }
                }
            }
            changed = runs.changed() => {
                if changed.is_err() {
                    break;
                }
                let _ = runs.borrow_and_update();
                shell.dispatch(Msg::RunObserved(session.current()));
            }
            Some(msg) = msg_rx.recv() => shell.dispatch(msg),
        }
    }

    autofix_info!("Stopped watching group_id={}", args.group_id);
    Ok(())
}

/// Owns the operator state and renders it after every change.
struct Shell {
    state: OperatorState,
    runner: EffectRunner,
}

impl Shell {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: OperatorState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        if !effects.is_empty() {
            self.runner.enqueue(effects);
        }
        if was_dirty {
            self.print(&render(&view));
        }
    }

    fn print(&self, lines: &[String]) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}
