//! `solutions`, `agents`, `tools` and `config` subcommands. Each edit loads
//! the config file, applies one operation and writes it back.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use console::style;

use crate::core::config::{
    AgentPatch, AppConfig, ConfigError, MoveDirection, Provider, SolutionMode, ToolDefinition,
};
use crate::core::terminal::{self, GuideSection};

fn arg<'a>(args: &'a [String], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument. Usage: hugai {}", usage))
}

fn rest(args: &[String], from: usize) -> String {
    args.iter()
        .skip(from)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

async fn edit<T>(
    config_path: &Path,
    op: impl FnOnce(&mut AppConfig) -> Result<T, ConfigError>,
) -> Result<T> {
    let mut config = AppConfig::load(config_path).await?;
    let value = op(&mut config)?;
    config.save(config_path).await?;
    Ok(value)
}

// --- solutions ---

fn print_solutions(config: &AppConfig) {
    for scheme in &config.solutions {
        let active = scheme.id == config.active_solution_id;
        println!(
            " {} {:<20} {:<28} {:<9} {} agents",
            if active {
                style("*").green().bold()
            } else {
                style(" ")
            },
            style(&scheme.id).cyan(),
            scheme.name,
            format!("[{}]", scheme.mode.as_str()),
            scheme.agents.len()
        );
    }
}

fn print_solutions_help() {
    GuideSection::new("hugai solutions")
        .command("list", "List solutions (* marks the active one)")
        .command("use <id>", "Make a solution active")
        .command("add <name>", "Create a team-mode solution")
        .command("delete <id>", "Delete a solution")
        .command("mode <id> <team|workflow|loop>", "Switch mode (resets its agents)")
        .command("tools <id> [tool,...]", "Set the tools a solution may use")
        .print();
}

pub async fn run_solutions_command(config_path: &Path, args: &[String]) -> Result<()> {
    match args.get(2).map(String::as_str).unwrap_or("list") {
        "list" => {
            let config = AppConfig::load(config_path).await?;
            print_solutions(&config);
        }
        "use" => {
            let id = arg(args, 3, "solutions use <id>")?;
            edit(config_path, |c| c.set_active_solution(id)).await?;
            terminal::print_success(&format!("Active solution is now '{}'", id));
        }
        "add" => {
            let name = rest(args, 3);
            if name.trim().is_empty() {
                return Err(anyhow!("missing argument. Usage: hugai solutions add <name>"));
            }
            let id = edit(config_path, |c| Ok(c.add_solution(name.trim()))).await?;
            terminal::print_success(&format!("Created solution '{}'", id));
        }
        "delete" => {
            let id = arg(args, 3, "solutions delete <id>")?;
            edit(config_path, |c| c.delete_solution(id)).await?;
            terminal::print_success(&format!("Deleted solution '{}'", id));
        }
        "mode" => {
            let usage = "solutions mode <id> <team|workflow|loop>";
            let id = arg(args, 3, usage)?;
            let raw = arg(args, 4, usage)?;
            let mode = SolutionMode::parse(raw).with_context(|| format!("unknown mode '{}'", raw))?;
            edit(config_path, |c| c.set_solution_mode(id, mode)).await?;
            terminal::print_success(&format!("'{}' now runs in {} mode", id, mode.as_str()));
        }
        "tools" => {
            let id = arg(args, 3, "solutions tools <id> [tool,...]")?;
            let tool_ids: Vec<String> = args
                .get(4)
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            let count = tool_ids.len();
            edit(config_path, |c| c.set_solution_tools(id, tool_ids)).await?;
            terminal::print_success(&format!("'{}' now uses {} tool(s)", id, count));
        }
        _ => print_solutions_help(),
    }
    Ok(())
}

// --- agents ---

fn print_agents_help() {
    GuideSection::new("hugai agents <solution>")
        .command("list", "List agents in execution order")
        .command("add", "Append an agent suited to the solution's mode")
        .command("delete <agent>", "Remove an agent")
        .command("enable|disable <agent>", "Toggle an agent")
        .command("up|down <agent>", "Move an agent one position")
        .command("rename <agent> <name>", "Rename an agent")
        .command("prompt <agent> <text>", "Replace an agent's system prompt")
        .print();
}

pub async fn run_agents_command(config_path: &Path, args: &[String]) -> Result<()> {
    let Some(solution_id) = args.get(2).map(String::as_str) else {
        print_agents_help();
        return Ok(());
    };
    let agent_usage = "agents <solution> <command> <agent>";

    match args.get(3).map(String::as_str).unwrap_or("list") {
        "list" => {
            let config = AppConfig::load(config_path).await?;
            let scheme = config
                .solution(solution_id)
                .ok_or_else(|| ConfigError::UnknownSolution(solution_id.to_string()))?;
            for (i, agent) in scheme.agents.iter().enumerate() {
                let mut flags = Vec::new();
                if agent.is_system {
                    flags.push("system");
                }
                if !agent.enabled {
                    flags.push("disabled");
                }
                println!(
                    " {:>2}. {:<22} {:<26} {:<14} {}",
                    i + 1,
                    style(&agent.id).cyan(),
                    agent.name,
                    agent.kind.as_str(),
                    style(flags.join(", ")).dim()
                );
            }
        }
        "add" => {
            let id = edit(config_path, |c| c.add_agent(solution_id)).await?;
            terminal::print_success(&format!("Added agent '{}'", id));
        }
        "delete" => {
            let agent_id = arg(args, 4, agent_usage)?;
            edit(config_path, |c| c.delete_agent(solution_id, agent_id)).await?;
            terminal::print_success(&format!("Deleted agent '{}'", agent_id));
        }
        cmd @ ("enable" | "disable") => {
            let agent_id = arg(args, 4, agent_usage)?;
            let enabled = cmd == "enable";
            edit(config_path, |c| c.set_agent_enabled(solution_id, agent_id, enabled)).await?;
            terminal::print_success(&format!("Agent '{}' {}d", agent_id, cmd));
        }
        cmd @ ("up" | "down") => {
            let agent_id = arg(args, 4, agent_usage)?;
            let direction = if cmd == "up" {
                MoveDirection::Up
            } else {
                MoveDirection::Down
            };
            edit(config_path, |c| c.move_agent(solution_id, agent_id, direction)).await?;
            terminal::print_success(&format!("Moved agent '{}' {}", agent_id, cmd));
        }
        "rename" => {
            let agent_id = arg(args, 4, "agents <solution> rename <agent> <name>")?;
            let patch = AgentPatch {
                name: Some(rest(args, 5)),
                ..AgentPatch::default()
            };
            edit(config_path, |c| c.update_agent(solution_id, agent_id, patch)).await?;
            terminal::print_success(&format!("Renamed agent '{}'", agent_id));
        }
        "prompt" => {
            let agent_id = arg(args, 4, "agents <solution> prompt <agent> <text>")?;
            let patch = AgentPatch {
                system_prompt: Some(rest(args, 5)),
                ..AgentPatch::default()
            };
            edit(config_path, |c| c.update_agent(solution_id, agent_id, patch)).await?;
            terminal::print_success(&format!("Updated prompt of '{}'", agent_id));
        }
        _ => print_agents_help(),
    }
    Ok(())
}

// --- tools ---

fn print_tools_help() {
    GuideSection::new("hugai tools")
        .command("list", "List registered tools")
        .command("add <id> <name> [description]", "Register a custom tool")
        .command("delete <id>", "Remove a tool from the registry and all solutions")
        .command("enable|disable <id>", "Toggle a tool")
        .command("key <id> [value]", "Set or clear a tool's API key")
        .print();
}

pub async fn run_tools_command(config_path: &Path, args: &[String]) -> Result<()> {
    let tool_usage = "tools <command> <id>";

    match args.get(2).map(String::as_str).unwrap_or("list") {
        "list" => {
            let config = AppConfig::load(config_path).await?;
            for tool in &config.tools {
                let state = if tool.enabled {
                    style("on ").green()
                } else {
                    style("off").red()
                };
                let key = match (tool.requires_key, tool.api_key.is_some()) {
                    (true, true) => "key set",
                    (true, false) => "key missing",
                    _ => "",
                };
                println!(
                    " {} {:<16} {:<24} {}",
                    state,
                    style(&tool.id).cyan(),
                    tool.name,
                    style(key).dim()
                );
            }
        }
        "add" => {
            let usage = "tools add <id> <name> [description]";
            let id = arg(args, 3, usage)?;
            let name = arg(args, 4, usage)?;
            let tool = ToolDefinition::custom(id, name, rest(args, 5));
            edit(config_path, |c| c.add_tool(tool)).await?;
            terminal::print_success(&format!("Registered tool '{}'", id));
        }
        "delete" => {
            let id = arg(args, 3, tool_usage)?;
            edit(config_path, |c| c.delete_tool(id)).await?;
            terminal::print_success(&format!("Deleted tool '{}'", id));
        }
        cmd @ ("enable" | "disable") => {
            let id = arg(args, 3, tool_usage)?;
            let enabled = cmd == "enable";
            edit(config_path, |c| c.set_tool_enabled(id, enabled)).await?;
            terminal::print_success(&format!("Tool '{}' {}d", id, cmd));
        }
        "key" => {
            let id = arg(args, 3, "tools key <id> [value]")?;
            let value = args.get(4).cloned();
            let cleared = value.is_none();
            edit(config_path, |c| c.set_tool_api_key(id, value)).await?;
            if cleared {
                terminal::print_success(&format!("Cleared API key of '{}'", id));
            } else {
                terminal::print_success(&format!("Stored API key of '{}'", id));
            }
        }
        _ => print_tools_help(),
    }
    Ok(())
}

// --- config ---

pub async fn run_config_command(config_path: &Path, args: &[String]) -> Result<()> {
    match args.get(2).map(String::as_str).unwrap_or("show") {
        "show" => {
            let config = AppConfig::load(config_path).await?;
            let key = if config.api_key.is_empty() {
                if config.provider.requires_api_key() {
                    "not set"
                } else {
                    "not required"
                }
            } else {
                "set"
            };
            GuideSection::new("Model")
                .status("Provider", config.provider.as_str())
                .status("Model", &config.model_name)
                .status("Base URL", &config.base_url)
                .status("Temperature", config.temperature.to_string())
                .status("API key", key)
                .print();
            GuideSection::new("Runtime")
                .status("Active solution", &config.active_solution_id)
                .status("Latency scale", config.runtime.latency_scale.to_string())
                .status("Config file", config_path.display().to_string())
                .print();
        }
        "path" => println!("{}", config_path.display()),
        "provider" => {
            let raw = arg(args, 3, "config provider <openai|ollama|anthropic|deepseek>")?;
            let provider =
                Provider::parse(raw).with_context(|| format!("unknown provider '{}'", raw))?;
            let model = edit(config_path, |c| {
                c.set_provider(provider);
                Ok(c.model_name.clone())
            })
            .await?;
            terminal::print_success(&format!(
                "Provider set to {} (model {})",
                provider.as_str(),
                model
            ));
        }
        "models" => {
            let config = AppConfig::load(config_path).await?;
            for model in config.provider.models() {
                let marker = if model.id == config.model_name { "*" } else { " " };
                println!(" {} {:<22} {}", marker, style(model.id).cyan(), model.label);
            }
        }
        _ => GuideSection::new("hugai config")
            .command("show", "Show model and runtime settings")
            .command("path", "Print the config file location")
            .command("provider <name>", "Switch provider and pick its first model")
            .command("models", "List models of the current provider")
            .print(),
    }
    Ok(())
}
