use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use sapling::Axis;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate an expression at a point
    Eval {
        /// Expression source, e.g. "2x + y^2"
        #[arg(allow_hyphen_values = true)]
        expr: String,

        #[command(flatten)]
        vars: VarArgs,

        #[command(flatten)]
        defs: DefArgs,
    },

    /// Sample an expression over a range of x or y
    Plot {
        /// Expression source
        #[arg(allow_hyphen_values = true)]
        expr: String,

        /// First input value
        #[arg(long, allow_negative_numbers = true)]
        from: f64,

        /// Last input value
        #[arg(long, allow_negative_numbers = true)]
        to: f64,

        /// Number of samples, both ends included
        #[arg(long, default_value_t = 21)]
        steps: usize,

        /// Variable to sweep
        #[arg(long, value_enum, default_value_t = AxisArg::X)]
        axis: AxisArg,

        /// Print points as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        vars: VarArgs,

        #[command(flatten)]
        defs: DefArgs,
    },

    /// Print the simplified partial derivative
    Derive {
        /// Expression source
        #[arg(allow_hyphen_values = true)]
        expr: String,

        /// Variable to differentiate with respect to
        #[arg(long, value_enum, default_value_t = AxisArg::X)]
        wrt: AxisArg,

        #[command(flatten)]
        defs: DefArgs,
    },

    /// Print the parsed tree as JSON
    Tree {
        /// Expression source
        #[arg(allow_hyphen_values = true)]
        expr: String,

        #[command(flatten)]
        defs: DefArgs,
    },

    /// Load a JSON tree from a file and evaluate it
    Check {
        /// Path to a tree written by `sapling tree`
        file: PathBuf,

        #[command(flatten)]
        vars: VarArgs,
    },

    /// Start the interactive REPL (the default)
    Repl,
}

/// Values for `x` and `y`.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct VarArgs {
    /// Value of x
    #[arg(long = "x", default_value_t = 0.0, allow_negative_numbers = true)]
    pub x: f64,

    /// Value of y
    #[arg(long = "y", default_value_t = 0.0, allow_negative_numbers = true)]
    pub y: f64,
}

/// User constants, `NAME=EXPR`, applied in order.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DefArgs {
    /// Define a named constant, e.g. --def k=2pi
    #[arg(long = "def", value_name = "NAME=EXPR")]
    pub defs: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisArg {
    X,
    Y,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
        }
    }
}
