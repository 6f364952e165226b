// crates/waqf_cli/src/args.rs
//
// Offline CLI argument surface (types + parsing helpers).
//
// Rules:
// - Local paths only (reject any scheme:// like http/https/file)
// - Input files must exist as regular files; --out / --store may not exist yet
// - allocate: exactly one of --simple <type> | --balanced <p,c,r> | --advanced

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use waqf_core::{CauseId, SessionId, WaqfType, WaqfTypeSplit};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "waqf",
    disable_help_subcommand = true,
    about = "Offline allocation engine for waqf endowment portfolios"
)]
pub struct Cli {
    /// More logging on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Errors only on stderr.
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build a portfolio from a cause selection and compute its initial mode.
    New(NewArgs),
    /// Switch allocation mode and recompute.
    Allocate(AllocateArgs),
    /// Advanced mode: set one cause's share of the total.
    Share(ShareArgs),
    /// Advanced mode: set one waqf-type percentage of one cause.
    CauseSplit(CauseSplitArgs),
    /// Balanced mode: move one global slider.
    Slider(SliderArgs),
    /// Validate a portfolio without changing it.
    Validate(ValidateArgs),
    /// Store a portfolio snapshot under a session key.
    Save(SaveArgs),
    /// Read a portfolio snapshot back from a session key.
    Load(LoadArgs),
}

#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Portfolio JSON path; a previous command's `{portfolio, validation}` output is accepted too.
    #[arg(long)]
    pub portfolio: PathBuf,
    /// Catalog JSON path; refreshes each cause's supported waqf types.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Write the result here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct NewArgs {
    /// Cause selection JSON path: [{id, name, supportedWaqfTypes}, ..].
    #[arg(long)]
    pub causes: PathBuf,
    /// Total donation amount.
    #[arg(long, value_parser = parse_amount)]
    pub amount: f64,
    /// Params JSON path (lockPeriodMonths, defaultExpirationPreference, initialMode).
    #[arg(long)]
    pub params: Option<PathBuf>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("mode").required(true).args(["simple", "balanced", "advanced"])))]
pub struct AllocateArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Everything into one waqf type.
    #[arg(long, value_parser = parse_waqf_type)]
    pub simple: Option<WaqfType>,
    /// Global mix as "permanent,consumable,revolving" percentages.
    #[arg(long, value_parser = parse_split)]
    pub balanced: Option<WaqfTypeSplit>,
    /// Manual per-cause control.
    #[arg(long)]
    pub advanced: bool,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ShareArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long, value_parser = parse_cause_id)]
    pub cause: CauseId,
    /// Percentage of the total for this cause.
    #[arg(long, allow_negative_numbers = true)]
    pub value: f64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct CauseSplitArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long, value_parser = parse_cause_id)]
    pub cause: CauseId,
    #[arg(long, value_parser = parse_waqf_type)]
    pub waqf_type: WaqfType,
    /// Percentage of this cause's money in that waqf type.
    #[arg(long, allow_negative_numbers = true)]
    pub value: f64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SliderArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[arg(long, value_parser = parse_waqf_type)]
    pub waqf_type: WaqfType,
    /// New slider value (clamped to 0..=100).
    #[arg(long, allow_negative_numbers = true)]
    pub value: f64,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SaveArgs {
    #[arg(long)]
    pub portfolio: PathBuf,
    /// Snapshot directory (created if missing).
    #[arg(long)]
    pub store: PathBuf,
    #[arg(long, value_parser = parse_session_id)]
    pub session: SessionId,
}

#[derive(Debug, Args, Clone)]
pub struct LoadArgs {
    #[arg(long)]
    pub store: PathBuf,
    #[arg(long, value_parser = parse_session_id)]
    pub session: SessionId,
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

// ---------------------------------- value parsers ----------------------------------

pub fn parse_waqf_type(s: &str) -> Result<WaqfType, String> {
    s.trim().parse().map_err(|_| {
        format!("unknown waqf type {s:?} (expected permanent, temporary_consumable or temporary_revolving)")
    })
}

/// "p,c,r" → split, in `WaqfType::ALL` order.
pub fn parse_split(s: &str) -> Result<WaqfTypeSplit, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected three comma-separated percentages, got {s:?}"));
    }
    let mut vals = [0.0f64; 3];
    for (slot, part) in vals.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| format!("not a number: {part:?}"))?;
    }
    Ok(WaqfTypeSplit::new(vals[0], vals[1], vals[2]))
}

pub fn parse_amount(s: &str) -> Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|_| format!("not a number: {s:?}"))?;
    if !v.is_finite() || v < 0.0 {
        return Err("amount must be a finite, non-negative number".into());
    }
    Ok(v)
}

pub fn parse_cause_id(s: &str) -> Result<CauseId, String> {
    s.parse().map_err(|_| format!("invalid cause id {s:?}"))
}

pub fn parse_session_id(s: &str) -> Result<SessionId, String> {
    s.parse().map_err(|_| format!("invalid session id {s:?}"))
}

// ---------------------------------- path checks ----------------------------------

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Ensure a path is local (no scheme) and exists as a regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    let meta = fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

fn check_input(i: &InputArgs) -> Result<(), CliError> {
    ensure_local_exists(&i.portfolio, "--portfolio")?;
    if let Some(c) = &i.catalog {
        ensure_local_exists(c, "--catalog")?;
    }
    Ok(())
}

fn check_output(o: &OutputArgs) -> Result<(), CliError> {
    match &o.out {
        Some(p) => ensure_local_path(p),
        None => Ok(()),
    }
}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Cli, CliError> {
    let cli = Cli::parse();
    validate_paths(&cli.command)?;
    Ok(cli)
}

fn validate_paths(cmd: &Command) -> Result<(), CliError> {
    match cmd {
        Command::New(a) => {
            ensure_local_exists(&a.causes, "--causes")?;
            if let Some(p) = &a.params {
                ensure_local_exists(p, "--params")?;
            }
            check_output(&a.output)
        }
        Command::Allocate(a) => check_input(&a.input).and_then(|_| check_output(&a.output)),
        Command::Share(a) => check_input(&a.input).and_then(|_| check_output(&a.output)),
        Command::CauseSplit(a) => check_input(&a.input).and_then(|_| check_output(&a.output)),
        Command::Slider(a) => check_input(&a.input).and_then(|_| check_output(&a.output)),
        Command::Validate(a) => check_input(&a.input),
        Command::Save(a) => {
            ensure_local_exists(&a.portfolio, "--portfolio")?;
            ensure_local_path(&a.store)
        }
        Command::Load(a) => {
            ensure_local_path(&a.store)?;
            check_output(&a.output)
        }
    }
}
