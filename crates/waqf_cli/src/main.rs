// crates/waqf_cli/src/main.rs
//
// Wires up: exit codes, typed error mapping, CLI parsing, logging, and one
// handler per subcommand. Every engine command prints canonical JSON
// `{"portfolio": .., "validation": ..}` on stdout (or to --out).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Usage errors, bad input shape, or a failing `validate`.
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    /// Engine refused the request (e.g. unknown cause).
    pub const ENGINE: i32 = 5;
}

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{parse_and_validate as parse_cli, Cli, Command, InputArgs, OutputArgs};
use waqf_core::Portfolio;
use waqf_io::{canonical_json, loader, snapshot, store::FileStore};
use waqf_pipeline::{load, run, validate, PipelineError, Request, ValidationReport};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Schema / JSON shape / domain failures, or a portfolio that did not validate
    Validation(String),
    /// Read / write / path errors
    Io(String),
    /// Engine refused the request
    Engine(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) | MainError::Engine(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let cli = match parse_cli() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("waqf: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    init_tracing(&cli);

    let rc = match dispatch(&cli.command) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("waqf: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr only; `RUST_LOG` wins over the flags.
fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn dispatch(cmd: &Command) -> Result<(), MainError> {
    match cmd {
        Command::New(a) => {
            let p = load::new_portfolio(&a.causes, a.amount, a.params.as_deref()).map_err(map_pipeline_err)?;
            let report = validate(&p);
            emit(&p, &report, &a.output)
        }
        Command::Allocate(a) => {
            let request = if let Some(t) = a.simple {
                Request::Simple { waqf_type: t }
            } else if let Some(g) = a.balanced {
                Request::Balanced { global: g }
            } else {
                Request::Advanced
            };
            run_request(&a.input, request, &a.output)
        }
        Command::Share(a) => run_request(
            &a.input,
            Request::SetShare { cause: a.cause.clone(), percent: a.value },
            &a.output,
        ),
        Command::CauseSplit(a) => run_request(
            &a.input,
            Request::SetCauseAllocation { cause: a.cause.clone(), waqf_type: a.waqf_type, percent: a.value },
            &a.output,
        ),
        Command::Slider(a) => run_request(
            &a.input,
            Request::AdjustSlider { waqf_type: a.waqf_type, value: a.value },
            &a.output,
        ),
        Command::Validate(a) => {
            let inputs = load::load_inputs(&a.input.portfolio, a.input.catalog.as_deref()).map_err(map_pipeline_err)?;
            let p = match &inputs.directory {
                Some(dir) => waqf_pipeline::refresh_causes(&inputs.portfolio, dir),
                None => inputs.portfolio,
            };
            let report = validate(&p);
            emit(&p, &report, &OutputArgs { out: None })?;
            if report.pass {
                Ok(())
            } else {
                Err(MainError::Validation(format!("{} validation error(s)", report.errors().count())))
            }
        }
        Command::Save(a) => {
            let p = loader::load_portfolio_file(&a.portfolio).map_err(map_vmio_err)?;
            let mut store = FileStore::new(&a.store);
            snapshot::save_portfolio(&mut store, &a.session, &p).map_err(map_vmio_err)?;
            emit(&p, &validate(&p), &OutputArgs { out: None })
        }
        Command::Load(a) => {
            let store = FileStore::new(&a.store);
            let p = snapshot::load_portfolio(&store, &a.session)
                .map_err(map_vmio_err)?
                .ok_or_else(|| MainError::Io(format!("no snapshot for session {}", a.session)))?;
            emit(&p, &validate(&p), &a.output)
        }
    }
}

fn run_request(input: &InputArgs, request: Request, output: &OutputArgs) -> Result<(), MainError> {
    let inputs = load::load_inputs(&input.portfolio, input.catalog.as_deref()).map_err(map_pipeline_err)?;
    let outs = run(&inputs.portfolio, inputs.directory.as_ref(), request).map_err(map_pipeline_err)?;
    emit(&outs.portfolio, &outs.report, output)
}

fn emit(p: &Portfolio, report: &ValidationReport, output: &OutputArgs) -> Result<(), MainError> {
    let doc: Value = json!({
        "portfolio": serde_json::to_value(p).map_err(|e| MainError::Io(format!("serialize portfolio: {e}")))?,
        "validation": serde_json::to_value(report).map_err(|e| MainError::Io(format!("serialize report: {e}")))?,
    });
    match &output.out {
        Some(path) => write_out(path, &doc),
        None => {
            let mut bytes = canonical_json::to_canonical_json_bytes(&doc);
            bytes.push(b'\n');
            std::io::stdout()
                .lock()
                .write_all(&bytes)
                .map_err(|e| MainError::Io(format!("write stdout: {e}")))
        }
    }
}

fn write_out(path: &Path, doc: &Value) -> Result<(), MainError> {
    canonical_json::write_canonical_file(path, doc)
        .map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "output written");
    Ok(())
}

/// Map our typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Engine(_) => ENGINE,
    }
}

/// Translate waqf_io::IoError into MainError buckets.
fn map_vmio_err(e: waqf_io::IoError) -> MainError {
    use waqf_io::IoError::*;
    match e {
        Schema { pointer, msg } => MainError::Validation(format!("schema {pointer}: {msg}")),
        Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        Hash(m) => MainError::Validation(format!("hash: {m}")),
        Invalid(m) => MainError::Validation(format!("invalid: {m}")),
        Path(m) => MainError::Io(format!("path: {m}")),
    }
}

/// Translate waqf_pipeline::PipelineError into MainError buckets.
fn map_pipeline_err(e: PipelineError) -> MainError {
    use PipelineError::*;
    match e {
        Io(m) => MainError::Io(m),
        Schema(m) | Validate(m) => MainError::Validation(m),
        Engine(m) => MainError::Engine(m),
    }
}
