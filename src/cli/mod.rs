mod config_cmd;
mod run;
mod serve;

use std::path::PathBuf;

use anyhow::{Result, bail};
use console::style;

use crate::core::config::resolve_config_path;
use crate::core::terminal::{self, GuideSection, print_error};
use crate::logging;

pub(crate) const DEFAULT_API_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_API_PORT: u16 = 17890;

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Core")
        .command("run --prompt <text>", "Run a single prompt on the active solution")
        .command("chat", "Start an interactive chat session")
        .command("serve", "Start the HTTP API (--host, --port)")
        .print();

    GuideSection::new("Configuration")
        .command("solutions", "List, add, delete, switch and re-mode solutions")
        .command("agents <solution>", "Manage the agents of a solution")
        .command("tools", "Manage the tool registry")
        .command("config", "Show model settings or switch provider")
        .print();

    GuideSection::new("Global flags")
        .command("--config <path>", "Use this config file instead of ~/.hugai/config.toml")
        .hint("HUGAI_CONFIG and HUGAI_LOG (trace..error) are read from the environment.")
        .print();

    println!(
        "\n {} {} <command> [subcommand]\n",
        style("Usage:").bold(),
        style("hugai").green()
    );
}

/// Removes `--config <path>` from anywhere in `args`.
pub(crate) fn take_config_flag(args: &mut Vec<String>) -> Option<PathBuf> {
    let pos = args.iter().position(|a| a == "--config")?;
    args.remove(pos);
    if pos < args.len() {
        Some(PathBuf::from(args.remove(pos)))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunCommandArgs {
    pub prompt: String,
    pub solution: Option<String>,
}

pub(crate) fn parse_run_command_args(args: &[String], start: usize) -> RunCommandArgs {
    let mut prompt = String::new();
    let mut solution = None;
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--prompt" | "-p" => {
                if i + 1 < args.len() {
                    prompt = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--solution" | "-s" => {
                if i + 1 < args.len() {
                    solution = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    RunCommandArgs { prompt, solution }
}

pub(crate) fn parse_serve_flags(
    args: &[String],
    start: usize,
    mut host: String,
    mut port: u16,
) -> (String, u16) {
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(DEFAULT_API_PORT);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--host" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    (host, port)
}

pub async fn run_main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let explicit = take_config_flag(&mut args);
    let config_path = resolve_config_path(explicit.as_deref());

    let Some(cmd) = args.get(1).map(String::as_str) else {
        print_help();
        return Ok(());
    };

    match cmd {
        "run" => {
            logging::init(false);
            let parsed = parse_run_command_args(&args, 2);
            if parsed.prompt.trim().is_empty() {
                bail!("--prompt is required for run mode.");
            }
            run::run_prompt(&config_path, parsed).await
        }
        "chat" => {
            logging::init(true);
            crate::interfaces::repl::run(config_path).await
        }
        "serve" => {
            let log_tx = logging::init(false);
            let (host, port) =
                parse_serve_flags(&args, 2, DEFAULT_API_HOST.to_string(), DEFAULT_API_PORT);
            serve::run_server(config_path, host, port, log_tx).await
        }
        "solutions" => {
            logging::init(false);
            config_cmd::run_solutions_command(&config_path, &args).await
        }
        "agents" => {
            logging::init(false);
            config_cmd::run_agents_command(&config_path, &args).await
        }
        "tools" => {
            logging::init(false);
            config_cmd::run_tools_command(&config_path, &args).await
        }
        "config" => {
            logging::init(false);
            config_cmd::run_config_command(&config_path, &args).await
        }
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => {
            print_error(&format!("Unknown command: {}", other));
            print_help();
            bail!("unknown command '{}'", other)
        }
    }
}
