//! Line-oriented terminal front end.
//!
//! Each input line is either a meta command (`history`, `copy`, ...) or a
//! sequence of key tokens such as `12 + 5 × 3 =`. After every line the
//! pending expression and display are printed.

use std::io::Write;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, sleep_until};

use crate::app::App;
use crate::calculator::{Action, parse_tokens};
use crate::preferences::Theme;

const HELP: &str = "\
keys:     0-9 . + - * / % × ÷ = enter c esc backspace ⌫
          sin cos tan ln log √ x² π e  M+ M- MR MC  undo redo ctrl+z ctrl+y
commands: history | select N | clear-history | copy | memory
          theme [dark|light] | sound on|off | help | quit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Keys(Vec<Action>),
    History,
    Select(usize),
    ClearHistory,
    Copy,
    Memory,
    Theme(Theme),
    ToggleTheme,
    Sound(bool),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let first = words.next().unwrap_or_default();
        let arg = words.next();

        let command = match (first, arg) {
            ("history", None) => Self::History,
            ("select", Some(n)) => Self::Select(
                n.parse()
                    .map_err(|_| format!("not a history index: {}", n))?,
            ),
            ("clear-history", None) => Self::ClearHistory,
            ("copy", None) => Self::Copy,
            ("memory", None) => Self::Memory,
            ("theme", Some(name)) => Self::Theme(name.parse()?),
            ("theme", None) => Self::ToggleTheme,
            ("sound", Some("on")) => Self::Sound(true),
            ("sound", Some("off")) => Self::Sound(false),
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            _ => Self::Keys(parse_tokens(line).map_err(|e| e.to_string())?),
        };

        Ok(command)
    }
}

/// The calculator as shown after each line.
pub fn render(app: &App) -> String {
    let calculator = app.calculator();
    let indicator = if calculator.memory().is_set() { "M" } else { " " };
    let pending = calculator.pending_expression();

    if pending.is_empty() {
        format!("{} {}", indicator, calculator.display())
    } else {
        format!("  {}\n{} {}", pending, indicator, calculator.display())
    }
}

/// Execute one line. Returns `false` when the session should end.
pub fn handle_line<W: Write>(app: &mut App, line: &str, out: &mut W) -> anyhow::Result<bool> {
    if line.trim().is_empty() {
        return Ok(true);
    }

    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(message) => {
            writeln!(out, "? {}", message)?;
            return Ok(true);
        }
    };

    match command {
        Command::Keys(actions) => {
            for action in actions {
                app.dispatch(action);
            }
        }
        Command::History => {
            if app.history().is_empty() {
                writeln!(out, "(no history)")?;
            }
            for (i, entry) in app.history().entries().iter().enumerate() {
                writeln!(
                    out,
                    "{:>2}. {} = {}  ({})",
                    i,
                    entry.expression,
                    entry.result,
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S")
                )?;
            }
            return Ok(true);
        }
        Command::Select(index) => {
            if !app.select_history(index) {
                writeln!(out, "? no history entry {}", index)?;
                return Ok(true);
            }
        }
        Command::ClearHistory => app.clear_history(),
        Command::Copy => match app.copy_display() {
            Ok(Some(text)) => writeln!(out, "copied {}", text)?,
            Ok(None) => writeln!(out, "? nothing to copy")?,
            Err(e) => writeln!(out, "? {}", e)?,
        },
        Command::Memory => {
            writeln!(out, "memory: {}", app.calculator().memory().recall())?;
            return Ok(true);
        }
        Command::Theme(theme) => app.set_theme(theme),
        Command::ToggleTheme => app.set_theme(app.preferences().theme.toggled()),
        Command::Sound(enabled) => app.set_sound(enabled),
        Command::Help => {
            writeln!(out, "{}", HELP)?;
            return Ok(true);
        }
        Command::Quit => return Ok(false),
    }

    writeln!(out, "{}", render(app))?;
    Ok(true)
}

/// Read lines until EOF or `quit`, resetting the error display when its
/// deadline passes.
pub async fn run<R, W>(app: &mut App, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", render(app))?;

    loop {
        let deadline = app.error_deadline();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(app, &line, out)? {
                    break;
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                app.recover();
                writeln!(out, "{}", render(app))?;
            }
        }
        out.flush()?;
    }

    app.flush().await;
    Ok(())
}
