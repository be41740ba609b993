//! Interactive session: evaluate lines against a persistent x, y and constants

use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sapling::{Axis, Definitions, EvalContext, Expression, ParseOptions, TreeElement};
use tracing::debug;

use crate::output::format_value;
use crate::{interrupt_on_ctrl_c, parse_expression};

const PROMPT: &str = "sapling> ";

/// A colon command understood by the REPL.
pub struct ReplCommand {
    /// Command name (without leading colon)
    pub name: &'static str,
    /// Argument synopsis
    pub usage: &'static str,
    /// Short description of what the command does
    pub description: &'static str,
}

pub const COMMANDS: &[ReplCommand] = &[
    ReplCommand {
        name: "x",
        usage: "[EXPR]",
        description: "Show or set x",
    },
    ReplCommand {
        name: "y",
        usage: "[EXPR]",
        description: "Show or set y",
    },
    ReplCommand {
        name: "vars",
        usage: "",
        description: "Show x and y",
    },
    ReplCommand {
        name: "let",
        usage: "NAME = EXPR",
        description: "Define a named constant",
    },
    ReplCommand {
        name: "defs",
        usage: "",
        description: "List named constants",
    },
    ReplCommand {
        name: "d",
        usage: "EXPR",
        description: "Derivative with respect to x",
    },
    ReplCommand {
        name: "dy",
        usage: "EXPR",
        description: "Derivative with respect to y",
    },
    ReplCommand {
        name: "simplify",
        usage: "EXPR",
        description: "Fold constants and drop identities",
    },
    ReplCommand {
        name: "axis",
        usage: "EXPR",
        description: "Which variables a plot of EXPR sweeps",
    },
    ReplCommand {
        name: "help",
        usage: "",
        description: "Show this help",
    },
    ReplCommand {
        name: "quit",
        usage: "",
        description: "Leave the REPL (also :q)",
    },
];

/// What a line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Result of evaluating an expression
    Value(f64),
    /// Text to print as-is
    Text(String),
    /// Nothing to print
    Nothing,
    /// Leave the loop
    Quit,
}

/// State that persists between lines.
#[derive(Debug, Default)]
pub struct Session {
    pub ctx: EvalContext,
    pub definitions: Definitions,
    pub options: ParseOptions,
}

impl Session {
    pub fn new(trace: bool) -> Self {
        let mut session = Self::default();
        session.ctx.trace = trace;
        session
    }

    /// A context sharing this session's interrupt flag.
    pub fn interrupt_handle(&self) -> EvalContext {
        self.ctx.clone()
    }

    /// Run one line of input.
    pub fn execute(&mut self, line: &str) -> Result<Reply> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Reply::Nothing);
        }
        self.ctx.reset_interrupt();

        let Some(command) = line.strip_prefix(':') else {
            let expr = self.parse(line)?;
            return Ok(Reply::Value(expr.evaluate(&self.ctx)?));
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };
        debug!(command = name, "repl command");

        match name {
            "x" => self.variable(Axis::X, rest),
            "y" => self.variable(Axis::Y, rest),
            "vars" => Ok(Reply::Text(format!(
                "x = {}\ny = {}",
                format_value(self.ctx.x),
                format_value(self.ctx.y)
            ))),
            "let" => self.define(rest),
            "defs" => Ok(Reply::Text(self.list_definitions())),
            "d" => self.derive(Axis::X, rest),
            "dy" => self.derive(Axis::Y, rest),
            "simplify" => {
                let expr = self.parse(required(name, rest)?)?;
                Ok(Reply::Text(expr.simplify().to_string()))
            }
            "axis" => {
                let expr = self.parse(required(name, rest)?)?;
                Ok(Reply::Text(expr.plot_axis().to_string()))
            }
            "help" => Ok(Reply::Text(help_text())),
            "quit" | "q" => Ok(Reply::Quit),
            other => bail!("unknown command `:{}`, try :help", other),
        }
    }

    fn parse(&self, source: &str) -> Result<Expression> {
        parse_expression(source, &self.options, &self.definitions)
    }

    fn variable(&mut self, axis: Axis, rest: &str) -> Result<Reply> {
        if !rest.is_empty() {
            let value = self.parse(rest)?.evaluate(&self.ctx)?;
            self.ctx.set(axis, value);
        }
        Ok(Reply::Text(format!(
            "{} = {}",
            axis,
            format_value(self.ctx.get(axis))
        )))
    }

    fn define(&mut self, rest: &str) -> Result<Reply> {
        let Some((name, source)) = rest.split_once('=') else {
            bail!("usage: :let NAME = EXPR");
        };
        let (name, source) = (name.trim(), source.trim());
        // Parse first so syntax errors get a caret line
        self.parse(source)?;
        let value = self.definitions.define(name, source)?;
        Ok(Reply::Text(format!("{} = {}", name, format_value(value))))
    }

    fn derive(&self, axis: Axis, rest: &str) -> Result<Reply> {
        let expr = self.parse(required(if axis == Axis::X { "d" } else { "dy" }, rest)?)?;
        Ok(Reply::Text(expr.derive(axis)?.to_string()))
    }

    fn list_definitions(&self) -> String {
        if self.definitions.is_empty() {
            return "no definitions".to_string();
        }
        self.definitions
            .iter()
            .map(|(name, value)| format!("{} = {}", name, format_value(value)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn required<'a>(command: &str, rest: &'a str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!(":{} needs an expression", command);
    }
    Ok(rest)
}

pub fn help_text() -> String {
    let mut lines = vec!["Enter an expression in x and y to evaluate it.".to_string()];
    for cmd in COMMANDS {
        let head = format!(":{} {}", cmd.name, cmd.usage);
        lines.push(format!("  {:<20} {}", head.trim_end(), cmd.description));
    }
    lines.join("\n")
}

/// Read-eval-print loop on the terminal.
pub fn run(trace: bool) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut session = Session::new(trace);
    // The editor reads Ctrl-C as a key at the prompt; while a line is being
    // evaluated it arrives as a signal and cancels the evaluation
    interrupt_on_ctrl_c(&session.interrupt_handle());

    println!("sapling {} (:help for commands)", sapling::VERSION);

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // A line missing from history is not worth aborting over
                    editor.add_history_entry(line.as_str()).ok();
                }
                match session.execute(&line) {
                    Ok(Reply::Value(value)) => println!("{}", format_value(value)),
                    Ok(Reply::Text(text)) => println!("{}", text),
                    Ok(Reply::Nothing) => {}
                    Ok(Reply::Quit) => break,
                    Err(err) => eprintln!("{}", err),
                }
            }
            // Ctrl-C drops the current line
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
