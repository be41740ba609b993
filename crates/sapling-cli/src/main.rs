use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use commands::{Commands, DefArgs, VarArgs};
use sapling::{
    Axis, Definitions, EvalContext, Expression, Node, ParseOptions, SampleRange, TreeElement,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod output;
pub mod repl;

#[derive(Parser, Debug)]
#[command(name = "sapling", version, about = "Evaluate and plot math expressions in x and y")]
struct Cli {
    /// Log parser and sampler activity
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every node as it is evaluated
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.trace);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Eval { expr, vars, defs } => {
            let definitions = definitions(&defs)?;
            let expr = parse_expression(&expr, &ParseOptions::default(), &definitions)?;
            let value = expr.evaluate(&context(vars, cli.trace))?;
            println!("{}", output::format_value(value));
        }
        Commands::Plot {
            expr,
            from,
            to,
            steps,
            axis,
            json,
            vars,
            defs,
        } => {
            let definitions = definitions(&defs)?;
            let expr = parse_expression(&expr, &ParseOptions::default(), &definitions)?;
            let axis = Axis::from(axis);
            let range = SampleRange::new(from, to, steps)?;
            let mut ctx = context(vars, cli.trace);
            interrupt_on_ctrl_c(&ctx);
            let points = expr.sampler(axis).sample(&mut ctx, &range)?;

            if json {
                let report = output::PlotReport {
                    expression: expr.to_string(),
                    axis,
                    plot_axis: expr.plot_axis(),
                    points: &points,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", output::points_table(axis, &points));
            }
        }
        Commands::Derive { expr, wrt, defs } => {
            let definitions = definitions(&defs)?;
            let expr = parse_expression(&expr, &ParseOptions::default(), &definitions)?;
            println!("{}", expr.derive(Axis::from(wrt))?);
        }
        Commands::Tree { expr, defs } => {
            let definitions = definitions(&defs)?;
            let expr = parse_expression(&expr, &ParseOptions::default(), &definitions)?;
            println!("{}", serde_json::to_string_pretty(expr.root())?);
        }
        Commands::Check { file, vars } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let root: Node = serde_json::from_str(&text)
                .with_context(|| format!("{} is not an expression tree", file.display()))?;
            debug!(nodes = root.size(), "loaded tree");
            let value = root.evaluate(&context(vars, cli.trace))?;
            println!("{} = {}", root, output::format_value(value));
        }
        Commands::Repl => repl::run(cli.trace)?,
    }

    Ok(())
}

fn init_logging(verbose: bool, trace: bool) {
    let default = if trace {
        "trace"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn context(vars: VarArgs, trace: bool) -> EvalContext {
    let mut ctx = EvalContext::with_vars(vars.x, vars.y);
    ctx.trace = trace;
    ctx
}

/// Route Ctrl-C to the context's interrupt flag instead of killing the process.
pub fn interrupt_on_ctrl_c(ctx: &EvalContext) {
    let handle = ctx.clone();
    if let Err(err) = ctrlc::set_handler(move || handle.interrupt()) {
        warn!("cannot bind Ctrl-C handler: {}", err);
    }
}

/// Apply `--def NAME=EXPR` arguments in order.
fn definitions(args: &DefArgs) -> Result<Definitions> {
    let mut definitions = Definitions::new();
    for def in &args.defs {
        let (name, source) = def
            .split_once('=')
            .ok_or_else(|| anyhow!("definition `{}` is not NAME=EXPR", def))?;
        definitions
            .define(name.trim(), source.trim())
            .with_context(|| format!("in definition `{}`", def))?;
    }
    Ok(definitions)
}

/// Parse `source`, reporting syntax errors with a caret under the input.
pub fn parse_expression(
    source: &str,
    options: &ParseOptions,
    definitions: &Definitions,
) -> Result<Expression> {
    Expression::parse_with(source, options, definitions).map_err(|err| anyhow!(err.render(source)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::AxisArg;

    #[test]
    fn test_default_command_is_repl() {
        let cli = Cli::try_parse_from(["sapling"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_eval_with_vars() {
        let cli = Cli::try_parse_from(["sapling", "eval", "x + y", "--x", "2", "--y", "-3"]).unwrap();
        match cli.command {
            Some(Commands::Eval { expr, vars, .. }) => {
                assert_eq!(expr, "x + y");
                assert_eq!((vars.x, vars.y), (2.0, -3.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_plot_options() {
        let cli = Cli::try_parse_from([
            "sapling", "plot", "sin(y)", "--from", "-1", "--to", "1", "--axis", "y", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Plot {
                from,
                to,
                steps,
                axis,
                json,
                ..
            }) => {
                assert_eq!((from, to, steps), (-1.0, 1.0, 21));
                assert_eq!(axis, AxisArg::Y);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_leading_minus_expression() {
        let cli = Cli::try_parse_from(["sapling", "derive", "-x^2"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Derive { ref expr, .. }) if expr == "-x^2"));
    }

    #[test]
    fn test_definitions_in_order() {
        let args = DefArgs {
            defs: vec!["a=3".to_string(), "b = a * 2".to_string()],
        };
        let defs = definitions(&args).unwrap();
        assert_eq!(defs.get("b"), Some(6.0));

        let bad = DefArgs {
            defs: vec!["a".to_string()],
        };
        assert!(definitions(&bad).is_err());
    }

    #[test]
    fn test_parse_expression_renders_caret() {
        let err = parse_expression("2 +", &ParseOptions::default(), &Definitions::new())
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("error: unexpected end of input"));
        assert!(err.contains("\n  2 +\n"));
    }
}
