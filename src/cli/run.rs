use std::path::Path;

use anyhow::Result;

use super::RunCommandArgs;
use crate::core::config::AppConfig;
use crate::core::orchestrator::{Orchestrator, RunStatus};
use crate::core::session::SessionStore;
use crate::core::terminal;
use crate::interfaces::repl::{print_outcome, submit_interruptible};

pub async fn run_prompt(config_path: &Path, args: RunCommandArgs) -> Result<()> {
    let mut config = AppConfig::load(config_path).await?;
    // --solution overrides the active solution for this run only
    if let Some(id) = &args.solution {
        config.set_active_solution(id)?;
    }
    if let Some(scheme) = config.active_solution() {
        terminal::print_status(
            "Solution",
            &format!("{} ({} mode)", scheme.name, scheme.mode.as_str()),
        );
        println!();
    }

    let orchestrator = Orchestrator::from_config(&config);
    let session = SessionStore::new();
    let outcome = submit_interruptible(&orchestrator, &session, &config, &args.prompt).await?;
    print_outcome(&outcome);

    if outcome.status == RunStatus::Fallback {
        anyhow::bail!("run ended in fallback");
    }
    Ok(())
}
