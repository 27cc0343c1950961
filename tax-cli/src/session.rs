//! Interactive session: one command per line, full recalculation after each.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tax_core::calculations::TaxComparison;
use thiserror::Error;
use tracing::debug;

use crate::format::format_currency;
use crate::input::parse_toggle;
use crate::logging;
use crate::report::Report;
use crate::state::AppState;

pub const HELP: &str = "\
Commands:
  <amount>               set gross income, e.g. 250,000
  income <amount>        set gross income
  expenses [<amount>]    set the personal-expense draw (blank for $100,000)
  ei on|off              include employment-insurance premiums
  self-employed on|off   switch between employee and self-employed rules
  show                   print the current comparison
  log <filter>           change the log filter, e.g. debug
  help                   show this list
  quit                   leave the session";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("'{0}' needs a value. Type 'help' for a list of commands.")]
    MissingArgument(&'static str),

    #[error("'{command}' expects on or off, got '{value}'")]
    InvalidToggle { command: &'static str, value: String },
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Income(String),
    Expenses(String),
    Insurance(bool),
    SelfEmployed(bool),
    Show,
    LogLevel(String),
    Help,
    Quit,
}

impl Command {
    /// Parses a line. A line starting with a digit or `$` is an income amount.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.starts_with(|c: char| c.is_ascii_digit() || c == '$') {
            return Ok(Self::Income(line.to_string()));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" | "show" => Ok(Self::Show),
            "income" if rest.is_empty() => Err(CommandError::MissingArgument("income")),
            "income" => Ok(Self::Income(rest.to_string())),
            "expenses" => Ok(Self::Expenses(rest.to_string())),
            "ei" => toggle("ei", rest).map(Self::Insurance),
            "self-employed" | "self_employed" | "se" => {
                toggle("self-employed", rest).map(Self::SelfEmployed)
            }
            "log" if rest.is_empty() => Err(CommandError::MissingArgument("log")),
            "log" => Ok(Self::LogLevel(rest.to_string())),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

fn toggle(
    command: &'static str,
    value: &str,
) -> Result<bool, CommandError> {
    if value.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    parse_toggle(value).ok_or_else(|| CommandError::InvalidToggle {
        command,
        value: value.to_string(),
    })
}

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a> {
    engine: &'a TaxComparison,
    state: AppState,
    json: bool,
}

impl<'a> Session<'a> {
    pub fn new(
        engine: &'a TaxComparison,
        state: AppState,
        json: bool,
    ) -> Self {
        Self {
            engine,
            state,
            json,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Recomputes both scenarios from the current state and prints them.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<()> {
        render(self.engine, &self.state, self.json, out)
    }

    /// Applies one command, re-rendering after every input change.
    pub fn execute<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> Result<Flow> {
        debug!(?command, "executing command");

        match command {
            Command::Income(text) => {
                self.state.set_income(&text);
                writeln!(out, "Gross income: {}", format_currency(self.state.gross_income))?;
            }
            Command::Expenses(text) => {
                self.state.set_expenses(&text);
                writeln!(out, "Personal expenses: {}", format_currency(self.state.expenses))?;
            }
            Command::Insurance(include) => {
                self.state.include_insurance = include;
            }
            Command::SelfEmployed(self_employed) => {
                self.state.set_self_employed(self_employed);
            }
            Command::Show => {}
            Command::LogLevel(filter) => {
                match logging::set_log_level(&filter) {
                    Ok(()) => writeln!(out, "Log filter set to '{filter}'")?,
                    Err(e) => writeln!(out, "{e}")?,
                }
                return Ok(Flow::Continue);
            }
            Command::Help => {
                writeln!(out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        self.render(out)?;
        Ok(Flow::Continue)
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
    ) -> Result<()> {
        writeln!(out, "{HELP}")?;
        writeln!(out)?;
        self.render(out)?;

        for line in input.lines() {
            let line = line.context("Failed to read input")?;

            let flow = match Command::parse(&line) {
                Ok(command) => self.execute(command, out)?,
                Err(e) => {
                    writeln!(out, "{e}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            out.flush()?;
        }

        Ok(())
    }
}

/// Writes the comparison for `state` as text or JSON.
pub fn render<W: Write>(
    engine: &TaxComparison,
    state: &AppState,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let result = engine.compare(state.gross_income, state.expenses, &state.options());
    let report = Report::new(engine.config(), &result);

    if json {
        writeln!(out, "{}", report.to_json().context("Failed to serialize report")?)?;
    } else {
        writeln!(out, "{report}")?;
    }
    Ok(())
}
