//! Step-by-step command output
//!
//! Every line a command prints goes through one of these helpers, so the
//! interactive and plain renderings stay in sync. The plain rendering is
//! what integration tests and CI logs see.

use super::context::UiContext;
use console::{style, StyledObject};

/// How a step or closing line should read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Info,
    Warn,
}

impl Tone {
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Tone::Ok => style("[OK]").green(),
            Tone::Info => style("[INFO]").blue(),
            Tone::Warn => style("[WARN]").yellow(),
        }
    }

    fn paint(self, text: &str) -> StyledObject<&str> {
        match self {
            Tone::Ok => style(text).green().bold(),
            Tone::Info => style(text).blue().bold(),
            Tone::Warn => style(text).yellow().bold(),
        }
    }

    fn log(self, line: String) {
        match self {
            Tone::Ok => cliclack::log::success(line).ok(),
            Tone::Info => cliclack::log::info(line).ok(),
            Tone::Warn => cliclack::log::warning(line).ok(),
        };
    }
}

/// Join a message and its detail; warnings read as "message - hint"
fn compose(tone: Tone, message: &str, detail: &str) -> String {
    match tone {
        Tone::Warn => format!("{} - {}", message, detail),
        Tone::Ok | Tone::Info => format!("{} ({})", message, detail),
    }
}

/// Banner naming what the command is about to do
pub fn intro(ctx: &UiContext, title: &str) {
    let title = style(title).blue().bold();
    if ctx.use_fancy_output() {
        cliclack::intro(title).ok();
    } else {
        println!("{}\n", title);
    }
}

/// Closing line summarizing the command
pub fn outro(ctx: &UiContext, tone: Tone, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(tone.paint(message)).ok();
    } else {
        println!("\n{} {}", tone.tag(), message);
    }
}

pub fn step(ctx: &UiContext, tone: Tone, message: &str) {
    if ctx.use_fancy_output() {
        tone.log(message.to_string());
    } else {
        println!("  {} {}", tone.tag(), message);
    }
}

/// A step with a secondary detail, such as a URL or a hint
pub fn step_with(ctx: &UiContext, tone: Tone, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        tone.log(compose(tone, message, &style(detail).dim().to_string()));
    } else {
        println!("  {} {}", tone.tag(), compose(tone, message, detail));
    }
}

pub fn section(ctx: &UiContext, title: &str) {
    println!();
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

/// Aligned `label: value` row, as in `memaster status`
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    let line = format!("{:<18} {}", format!("{}:", key), value);
    if ctx.use_fancy_output() {
        cliclack::log::remark(line).ok();
    } else {
        println!("  {}", line);
    }
}

/// Dimmed aside
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}
