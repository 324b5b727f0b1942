use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use lm_websites_input::logging::init_logging;
use lm_websites_input::{
    CheckpointError, CheckpointKey, CheckpointStore, EventSink, FileCheckpointStore,
    FileCredentialStore, IncrementalFetcher, InputUpdater, JsonLinesWriter, NoopInputUpdater,
    OutputFormat, RunContext, Scheme, Settings, TomlInputUpdater, XmlStreamWriter,
};

#[derive(Parser, Debug)]
#[command(name = "lm-websites", version)]
#[command(about = "Pull LogicMonitor website status and response time metrics as events")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, env = "LMW_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run configured inputs once and stream events to stdout
    Run {
        /// Only run this input
        #[arg(short, long)]
        input: Option<String>,

        /// Event output format (overrides the configured one)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the introspection scheme
    Scheme,

    /// Inspect or reset stored checkpoints
    Checkpoint {
        #[command(subcommand)]
        action: CheckpointCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CheckpointCommand {
    /// Print the checkpoint of a website
    Show {
        #[arg(long)]
        input: String,
        #[arg(long)]
        site: u64,
    },
    /// Delete the checkpoint of a website so the next run fetches full history
    Clear {
        #[arg(long)]
        input: String,
        #[arg(long)]
        site: u64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scheme => {
            println!("{}", Scheme::websites().to_xml());
            Ok(ExitCode::SUCCESS)
        }
        Command::Checkpoint { action } => {
            let settings = load_settings(cli.config.as_deref(), cli.verbose)?;
            run_checkpoint_command(&settings, action)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { input, format } => {
            let settings = load_settings(cli.config.as_deref(), cli.verbose)?;
            run_inputs(&settings, cli.config.as_deref(), input.as_deref(), format).await
        }
    }
}

fn load_settings(path: Option<&Path>, verbose: bool) -> Result<Settings> {
    let settings = Settings::load(path).context("Failed to load configuration")?;
    init_logging(&settings.log, verbose).context("Failed to initialize logging")?;
    Ok(settings)
}

/// Run the selected inputs one after another
async fn run_inputs(
    settings: &Settings,
    config_path: Option<&Path>,
    only: Option<&str>,
    format: Option<OutputFormat>,
) -> Result<ExitCode> {
    if let Some(name) = only {
        if !settings.inputs.contains_key(name) {
            bail!("Input '{}' is not configured", name);
        }
    }

    let mut credentials = FileCredentialStore::open(&settings.credential_file)
        .context("Failed to open credential store")?;
    let mut checkpoints = FileCheckpointStore::new(&settings.checkpoint_dir);
    let mut inputs: Box<dyn InputUpdater> = match config_path {
        Some(path) => Box::new(TomlInputUpdater::new(path)),
        None => Box::new(NoopInputUpdater),
    };

    let stdout = io::stdout();
    let mut sink: Box<dyn EventSink> = match format.unwrap_or(settings.output) {
        OutputFormat::Xml => Box::new(XmlStreamWriter::new(stdout.lock())),
        OutputFormat::Json => Box::new(JsonLinesWriter::new(stdout.lock())),
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let mut failed = 0usize;
    for (name, input) in &settings.inputs {
        if only.is_some_and(|only| only != name.as_str()) {
            continue;
        }
        if input.disabled {
            info!(input = %name, "Input disabled, skipping");
            continue;
        }

        let fetcher = IncrementalFetcher::new(name, input.clone())
            .with_timeout(Duration::from_secs(settings.request_timeout_secs));
        let mut ctx = RunContext {
            credentials: &mut credentials,
            inputs: inputs.as_mut(),
            checkpoints: &mut checkpoints,
            sink: sink.as_mut(),
        };

        if let Err(e) = fetcher.run(&mut ctx, now).await {
            error!(input = %name, error = %e, "Input run aborted");
            failed += 1;
        }
    }

    sink.finish().context("Failed to finish event stream")?;

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_checkpoint_command(settings: &Settings, action: CheckpointCommand) -> Result<()> {
    let mut store = FileCheckpointStore::new(&settings.checkpoint_dir);
    let mut stdout = io::stdout();

    match action {
        CheckpointCommand::Show { input, site } => {
            let key = CheckpointKey::new(input, site);
            match store.load(&key) {
                Ok(timestamp) => writeln!(stdout, "{}", timestamp)?,
                Err(CheckpointError::NotFound(_)) => writeln!(stdout, "no checkpoint for {}", key)?,
                Err(e) => return Err(e).context("Failed to read checkpoint"),
            }
        }
        CheckpointCommand::Clear { input, site } => {
            let key = CheckpointKey::new(input, site);
            if store.clear(&key).context("Failed to clear checkpoint")? {
                writeln!(stdout, "cleared checkpoint {}", store.path_for(&key).display())?;
            } else {
                writeln!(stdout, "no checkpoint for {}", key)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "lm-websites",
            "--config",
            "lm.toml",
            "run",
            "--input",
            "prod",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("lm.toml")));
        match cli.command {
            Command::Run { input, format } => {
                assert_eq!(input.as_deref(), Some("prod"));
                assert_eq!(format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_checkpoint_clear() {
        let cli =
            Cli::try_parse_from(["lm-websites", "checkpoint", "clear", "--input", "prod", "--site", "42"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Checkpoint {
                action: CheckpointCommand::Clear { site: 42, .. }
            }
        ));
    }
}
