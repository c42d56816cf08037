//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::ObjectKind;

/// jagged - read git commits and trees through the object bridge
#[derive(Parser, Debug)]
#[command(name = "jagged")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if jagged was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a commit's tree, parents and signatures
    #[command(
        name = "show",
        after_help = "\
EXAMPLES:
    # The commit HEAD points at
    jagged show HEAD

    # Machine-readable
    jagged show main~2 --json"
    )]
    Show {
        /// Revision naming a commit
        rev: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the entries of a tree
    #[command(
        name = "ls-tree",
        long_about = "List the entries of a tree.\n\n\
            If the revision names a commit, its root tree is listed. Entries \
            appear in git's stored order, one per line as `mode kind id<TAB>name`.",
        after_help = "\
EXAMPLES:
    jagged ls-tree HEAD
    jagged ls-tree HEAD^{tree} --json"
    )]
    LsTree {
        /// Revision naming a commit or tree
        rev: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Walk commit history by following parents
    #[command(
        name = "log",
        long_about = "Walk commit history by following parents.\n\n\
            By default only first parents are followed; with --all-parents the \
            walk is breadth-first over every parent, visiting each commit once.",
        after_help = "\
EXAMPLES:
    jagged log
    jagged log main -n 5
    jagged log --all-parents"
    )]
    Log {
        /// Starting revision
        #[arg(default_value = "HEAD")]
        rev: String,

        /// Number of commits to show (default from config)
        #[arg(short = 'n', long = "max-count")]
        max_count: Option<usize>,

        /// Follow every parent, not just the first
        #[arg(long)]
        all_parents: bool,
    },

    /// Look up an object and report the wrapper kind
    #[command(name = "lookup")]
    Lookup {
        /// Revision or full object id
        rev: String,

        /// Required object kind
        #[arg(long, value_enum, default_value_t = KindArg::Any)]
        kind: KindArg,
    },

    /// Print the effective configuration
    #[command(name = "config")]
    Config,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    jagged completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    jagged completion zsh >> ~/.zshrc

    # Fish
    jagged completion fish > ~/.config/fish/completions/jagged.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Whether the command reads configuration. Only these fail on a
    /// malformed config file.
    pub fn reads_config(&self) -> bool {
        !matches!(self, Command::Completion { .. })
    }
}

/// Object kinds accepted by `lookup --kind`.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Any,
    Commit,
    Tree,
}

impl From<KindArg> for ObjectKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Any => ObjectKind::Any,
            KindArg::Commit => ObjectKind::Commit,
            KindArg::Tree => ObjectKind::Tree,
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
