use console::{Emoji, style};

use crate::core::session::{AgentStep, StepStatus};

pub static SUCCESS_ICON: Emoji<'_, '_> = Emoji("✅ ", "");
pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static WARN_ICON: Emoji<'_, '_> = Emoji("⚠️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
pub static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "");
pub static PENDING: Emoji<'_, '_> = Emoji("• ", "");

pub fn print_success(msg: &str) {
    println!("{} {}", SUCCESS_ICON, style(msg).green());
}

pub fn print_info(msg: &str) {
    println!("{} {}", INFO_ICON, style(msg).blue());
}

pub fn print_warn(msg: &str) {
    println!("{} {}", WARN_ICON, style(msg).yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_link(label: &str, url: &str) {
    println!(
        "  {} {}: {}",
        GLOBE,
        style(label).bold(),
        style(url).underlined().cyan()
    );
}

fn status_icon(status: StepStatus) -> &'static Emoji<'static, 'static> {
    match status {
        StepStatus::Pending => &PENDING,
        StepStatus::Running => &HOURGLASS,
        StepStatus::Completed => &SUCCESS_ICON,
        StepStatus::Failed => &ERROR_ICON,
    }
}

/// One line per step emission; completed steps also print their output indented.
pub fn print_agent_step(step: &AgentStep) {
    let agent = style(format!("[{}]", step.agent_kind.display_name()))
        .bold()
        .magenta();
    let description = match step.status {
        StepStatus::Failed => style(step.description.as_str()).red(),
        StepStatus::Completed => style(step.description.as_str()).green(),
        _ => style(step.description.as_str()).dim(),
    };
    println!("{}{} {}", status_icon(step.status), agent, description);
    if step.status.is_terminal()
        && let Some(output) = step.output.as_deref()
    {
        for line in output.lines() {
            println!("      {}", style(line).dim());
        }
    }
}

pub fn print_banner() {
    let lines: &[&str] = &[
        " _                       _ ",
        "| |__  _   _  __ _  __ _(_)",
        "| '_ \\| | | |/ _` |/ _` | |",
        "| | | | |_| | (_| | (_| | |",
        "|_| |_|\\__,_|\\__, |\\__,_|_|",
        "             |___/         ",
    ];

    // Diagonal gradient #34d399 → #22d3ee → #818cf8
    let stops: [(u8, u8, u8); 3] = [(52, 211, 153), (34, 211, 238), (129, 140, 248)];
    let max_w = 27u32;
    let max_d = max_w + 5 * 10;

    println!();
    for (y, line) in lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            if ch == ' ' {
                print!(" ");
                continue;
            }
            let d = ((x as u32 + y as u32 * 10) * 1000 / max_d).min(1000);
            let (r, g, b) = if d <= 500 {
                lerp_color(stops[0], stops[1], d * 2)
            } else {
                lerp_color(stops[1], stops[2], (d - 500) * 2)
            };
            print!("\x1b[38;2;{};{};{}m{}", r, g, b, ch);
        }
        println!();
    }
    print!("\x1b[0m");

    println!("\x1b[38;2;34;211;238mTeams, pipelines and loops of agents.\x1b[0m\n");
}

fn lerp_color(a: (u8, u8, u8), b: (u8, u8, u8), t: u32) -> (u8, u8, u8) {
    let r = (a.0 as u32 * (1000 - t) + b.0 as u32 * t) / 1000;
    let g = (a.1 as u32 * (1000 - t) + b.1 as u32 * t) / 1000;
    let b_val = (a.2 as u32 * (1000 - t) + b.2 as u32 * t) / 1000;
    (r as u8, g as u8, b_val as u8)
}

pub fn print_goodbye() {
    println!(
        "\n{} {}",
        SPARKLE,
        style("Session closed. See you next time!").bold().cyan()
    );
}

enum GuideLine {
    Command(String, String),
    Status(String, String),
    Text(String),
    Hint(String),
    Blank,
}

/// A titled block of help text, built up and printed in one go.
pub struct GuideSection {
    title: String,
    lines: Vec<GuideLine>,
}

impl GuideSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn command(mut self, usage: impl Into<String>, summary: impl Into<String>) -> Self {
        self.lines
            .push(GuideLine::Command(usage.into(), summary.into()));
        self
    }

    pub fn status(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.lines.push(GuideLine::Status(label.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.lines.push(GuideLine::Text(text.into()));
        self
    }

    pub fn hint(mut self, text: impl Into<String>) -> Self {
        self.lines.push(GuideLine::Hint(text.into()));
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(GuideLine::Blank);
        self
    }

    pub fn print(self) {
        println!("{}", style(&self.title).bold().underlined());
        let width = self
            .lines
            .iter()
            .filter_map(|l| match l {
                GuideLine::Command(usage, _) => Some(usage.chars().count()),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        for line in self.lines {
            match line {
                GuideLine::Command(usage, summary) => {
                    let pad = width.saturating_sub(usage.chars().count());
                    println!(
                        "  {}{}  {}",
                        style(usage).cyan(),
                        " ".repeat(pad),
                        summary
                    );
                }
                GuideLine::Status(label, value) => print_status(&label, &value),
                GuideLine::Text(text) => println!("  {}", text),
                GuideLine::Hint(text) => println!("  {}", style(text).dim().italic()),
                GuideLine::Blank => println!(),
            }
        }
        println!();
    }
}
