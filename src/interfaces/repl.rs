//! Line-oriented interactive chat on a single session.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::config::AppConfig;
use crate::core::orchestrator::{
    Orchestrator, OrchestratorError, RunOutcome, RunStatus, StepSink,
};
use crate::core::session::{AgentStep, SessionStore};
use crate::core::terminal::{self, GuideSection};

/// Runs one submission; Ctrl-C while it is in flight cancels the run instead
/// of killing the process.
pub(crate) async fn submit_interruptible(
    orchestrator: &Orchestrator,
    session: &SessionStore,
    config: &AppConfig,
    text: &str,
) -> Result<RunOutcome, OrchestratorError> {
    let observer: Arc<dyn StepSink> =
        Arc::new(|step: AgentStep| terminal::print_agent_step(&step));
    let run = orchestrator.submit_active(session, config, text, Some(observer));
    tokio::pin!(run);
    loop {
        tokio::select! {
            outcome = &mut run => return outcome,
            _ = tokio::signal::ctrl_c() => {
                orchestrator.cancel(session);
            }
        }
    }
}

pub(crate) fn print_outcome(outcome: &RunOutcome) {
    println!();
    match outcome.status {
        RunStatus::Completed => println!("{}", outcome.content),
        RunStatus::Fallback | RunStatus::Cancelled => terminal::print_warn(&outcome.content),
    }
    println!();
}

fn print_commands() {
    GuideSection::new("Commands")
        .command("/solutions", "List solutions")
        .command("/use <id>", "Switch the active solution for this session")
        .command("/help", "Show this list")
        .command("/exit", "Leave the chat")
        .hint("Ctrl-C while agents are working cancels the current run.")
        .print();
}

fn print_solutions(config: &AppConfig) {
    for scheme in &config.solutions {
        let marker = if scheme.id == config.active_solution_id {
            style("*").green().bold()
        } else {
            style(" ")
        };
        println!(
            " {} {} {} [{}]",
            marker,
            style(&scheme.id).cyan(),
            scheme.name,
            scheme.mode.as_str()
        );
    }
}

pub async fn run(config_path: PathBuf) -> Result<()> {
    let mut config = AppConfig::load(&config_path).await?;
    let orchestrator = Orchestrator::from_config(&config);
    let session = SessionStore::with_welcome();

    terminal::print_banner();
    if let Some(welcome) = session.messages().first() {
        println!("{}\n", welcome.content);
    }
    print_commands();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest.trim())) {
            ("/exit" | "/quit", _) => break,
            ("/help", _) => print_commands(),
            ("/solutions", _) => print_solutions(&config),
            ("/use", id) => match config.set_active_solution(id) {
                Ok(()) => terminal::print_success(&format!("Active solution: {}", id)),
                Err(e) => terminal::print_error(&e.to_string()),
            },
            _ => match submit_interruptible(&orchestrator, &session, &config, line).await {
                Ok(outcome) => print_outcome(&outcome),
                Err(e) => terminal::print_error(&e.to_string()),
            },
        }
    }

    terminal::print_goodbye();
    Ok(())
}
