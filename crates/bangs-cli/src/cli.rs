//! # CLI Structure and Argument Parsing
//!
//! Every global option can also be set through a `BANGS_*` environment
//! variable, which is how the service is usually configured in containers.
//!
//! ```bash
//! # Serve (default command)
//! bangs --bangs bangs.yaml --watch
//! BANGS_BANGFILE=bangs.yaml BANGS_PORT=9000 bangs
//!
//! # Try a query without a browser
//! bangs -b bangs.yaml resolve '!gh arc swap'
//!
//! # Inspect and validate the bang file
//! bangs -b bangs.yaml list --category Search
//! bangs -b bangs.yaml check
//! ```

use std::path::PathBuf;

use bangs_core::ResolvePolicy;
use clap::{Parser, Subcommand, ValueEnum};

/// Main CLI structure for the `bangs` command
#[derive(Parser, Clone, Debug)]
#[command(name = "bangs")]
#[command(version)]
#[command(about = "bangs - bang keyword redirector", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Command to run; `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the yaml file containing bang definitions
    #[arg(short = 'b', long = "bangs", env = "BANGS_BANGFILE", global = true)]
    pub bangs: Option<PathBuf>,

    /// Show debug logs
    #[arg(short = 'v', long, env = "BANGS_VERBOSE", global = true)]
    pub verbose: bool,

    /// Port to listen on
    #[arg(short = 'p', long, env = "BANGS_PORT", default_value_t = 8080, global = true)]
    pub port: u16,

    /// Reload the bangs file when it changes
    #[arg(short = 'w', long, env = "BANGS_WATCH", global = true)]
    pub watch: bool,

    /// Treat queries without a leading '!' as "bang query", falling back to the default
    #[arg(short = 'a', long, env = "BANGS_ALLOW_NO_BANG", global = true)]
    pub allow_no_bang: bool,

    /// Advertise multi-bang support ('+'-joined bangs always resolve)
    #[arg(short = 'm', long, env = "BANGS_ALLOW_MULTI_BANG", global = true)]
    pub allow_multi_bang: bool,

    /// Start a query with this character to skip bangs (only the first character is used)
    #[arg(
        short = 'i',
        long,
        env = "BANGS_IGNORE_CHAR",
        default_value = ".",
        global = true
    )]
    pub ignore_char: String,
}

impl Cli {
    /// Resolution policy from the global flags.
    pub fn policy(&self) -> ResolvePolicy {
        ResolvePolicy::new(self.allow_no_bang, self.allow_multi_bang, &self.ignore_char)
    }
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Run the redirect server (default)
    Serve,

    /// Print the destination(s) a query would redirect to
    Resolve {
        /// Query, e.g. '!gh arc swap'
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the loaded bangs
    List {
        /// Only show bangs in this category (case-insensitive)
        #[arg(short = 'c', long)]
        category: Option<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate the bangs file
    Check,
}

/// Output format for commands that print data
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}
