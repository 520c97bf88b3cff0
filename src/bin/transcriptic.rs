//! Transcriptic command-line client
//!
//! Sends one API request and copies the raw response body to stdout. The HTTP
//! status goes to stderr; a non-2xx status exits with code 1.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transcriptic_client::config::{ENV_BASE_URL, ENV_EMAIL, ENV_TIMEOUT_SECS, ENV_TOKEN};
use transcriptic_client::{ClientConfig, CreateRunParams, TranscripticClient, DEFAULT_BASE_URL};

#[derive(Debug, Parser)]
#[command(version, about = "Talk to the Transcriptic API", disable_help_subcommand = true)]
struct Args {
    /// Account email, sent as X-User-Email
    #[arg(long, env = ENV_EMAIL)]
    email: String,

    /// API token, sent as X-User-Token
    #[arg(long, env = ENV_TOKEN, hide_env_values = true)]
    token: String,

    #[arg(long, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = ENV_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a project
    CreateProject { organization: String, name: String },
    /// List the runs of a project
    Runs { organization: String, project: String },
    /// Submit a run
    CreateRun {
        organization: String,
        project: String,
        /// Run title
        #[arg(long)]
        title: String,
        /// Path to the protocol JSON, or `-` for stdin
        #[arg(long)]
        protocol: PathBuf,
        #[arg(long)]
        test_mode: bool,
    },
    /// Show one run
    Run {
        organization: String,
        project: String,
        run: String,
    },
    /// Show a container
    Container { organization: String, container: String },
    /// Show the aliquot in one well
    Aliquot {
        organization: String,
        container: String,
        well_index: String,
    },
    /// List the packaged protocols of an organization
    Protocols { organization: String },
    /// Show one protocol
    Protocol { organization: String, protocol: String },
    /// Show a dataset
    Dataset { dataset: String },
}

fn main() -> ExitCode {
    setup_tracing();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Load the protocol JSON from `path`, or from `stdin` when the path is `-`.
fn read_protocol<R: Read>(path: &Path, mut stdin: R) -> Result<serde_json::Value> {
    let mut text = String::new();
    if path.as_os_str() == "-" {
        stdin
            .read_to_string(&mut text)
            .context("reading protocol from stdin")?;
    } else {
        text = std::fs::read_to_string(path)
            .with_context(|| format!("reading protocol from {}", path.display()))?;
    }
    serde_json::from_str(&text).context("protocol is not valid JSON")
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = ClientConfig::new(args.email, args.token).with_base_url(args.base_url);
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = TranscripticClient::from_config(&config)?;

    let mut response = match &args.command {
        Command::CreateProject { organization, name } => client.create_project(organization, name),
        Command::Runs {
            organization,
            project,
        } => client.get_runs(organization, project),
        Command::CreateRun {
            organization,
            project,
            title,
            protocol,
            test_mode,
        } => {
            let protocol = read_protocol(protocol, io::stdin())?;
            let params = CreateRunParams::new(protocol, title.as_str()).test_mode(*test_mode);
            client.create_run(organization, project, &params)
        }
        Command::Run {
            organization,
            project,
            run,
        } => client.get_run(organization, project, run),
        Command::Container {
            organization,
            container,
        } => client.get_container(organization, container),
        Command::Aliquot {
            organization,
            container,
            well_index,
        } => client.get_aliquot(organization, container, well_index),
        Command::Protocols { organization } => client.get_protocols(organization),
        Command::Protocol {
            organization,
            protocol,
        } => client.get_protocol(organization, protocol),
        Command::Dataset { dataset } => client.get_dataset(dataset),
    }?;

    let status = response.status();
    let code = write_response(
        status,
        &mut response,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;
    Ok(ExitCode::from(code))
}

/// Process exit code for a response status: 0 for 2xx, 1 otherwise.
fn exit_status(status: StatusCode) -> u8 {
    if status.is_success() {
        0
    } else {
        1
    }
}

/// Report the status on `err`, copy the body to `out` and pick the exit code.
fn write_response<B, O, E>(
    status: StatusCode,
    body: &mut B,
    out: &mut O,
    err: &mut E,
) -> Result<u8>
where
    B: Read,
    O: Write,
    E: Write,
{
    writeln!(err, "HTTP {status}").context("writing status")?;
    io::copy(body, out).context("writing response body")?;
    out.flush().context("writing response body")?;
    Ok(exit_status(status))
}
