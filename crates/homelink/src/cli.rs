//! Clap derive structures for the `homelink` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use homelink_core::Role;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// homelink -- reconcile a device directory into a bridge accessory registry
#[derive(Debug, Parser)]
#[command(
    name = "homelink",
    version,
    about = "Reconcile smart-home directory devices into bridge accessories",
    long_about = "Classifies every device a directory reports, filters it against the\n\
        platform configuration, and diffs the result against the bridge's\n\
        accessory registry: creating, reusing, publishing, and removing\n\
        accessories with stable identities.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Host configuration file holding the Homelink platform section
    #[arg(long, env = "HOMELINK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HOMELINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one reconciliation pass against a registry file
    #[command(alias = "sync")]
    Reconcile(ReconcileArgs),

    /// List directory devices with their variant, visibility, and identity
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Compute the accessory identity for a device id
    #[command(alias = "id")]
    Identity(IdentityArgs),

    /// Persist a refresh token rotation into the configuration file
    RotateToken(RotateTokenArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Directory snapshot (JSON) to reconcile against
    #[arg(long, short = 'd', env = "HOMELINK_DIRECTORY")]
    pub directory: PathBuf,

    /// Accessory registry file (JSON array); created if missing
    #[arg(long, short = 'r', env = "HOMELINK_REGISTRY")]
    pub registry: PathBuf,

    /// Bridge storage directory holding legacy accessory files
    #[arg(long, env = "HOMELINK_STORAGE")]
    pub storage: Option<PathBuf>,

    /// Compute the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Directory snapshot (JSON) to list
    #[arg(long, short = 'd', env = "HOMELINK_DIRECTORY")]
    pub directory: PathBuf,

    /// Accessory registry to compare against (read only)
    #[arg(long, short = 'r', env = "HOMELINK_REGISTRY")]
    pub registry: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct IdentityArgs {
    /// Directory device id (or location id for the mode role)
    pub device_id: String,

    /// Accessory role the identity is derived for
    #[arg(long, default_value = "primary", value_parser = parse_role)]
    pub role: Role,

    /// Derive the test-mode identity (implied by `HOMELINK_DEBUG` or `debug` in the config)
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Args)]
pub struct RotateTokenArgs {
    /// Token currently stored in the configuration file
    #[arg(long)]
    pub old: String,

    /// Token to store in its place
    #[arg(long)]
    pub new: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse::<Role>()
        .map_err(|_| format!("expected one of: primary, camera, panic, mode (got '{raw}')"))
}
