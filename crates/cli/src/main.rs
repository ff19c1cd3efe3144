use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use edubase::{ChromeLauncher, Credentials, Orchestrator};
use edubase_cli::cli::Cli;
use edubase_cli::{logging, output, prompt};
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	match run(cli).await {
		Ok(code) => code,
		Err(err) => {
			error!(target = "edubase_cli", error = %format!("{err:#}"), "run failed");
			eprintln!("[!] {err:#}");
			ExitCode::FAILURE
		}
	}
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
	let password = match &cli.password {
		Some(password) => password.clone(),
		None => prompt::read_password().await.context("reading password")?,
	};
	let credentials = Credentials::new(cli.username.as_str(), password);

	let config = cli.download_config();
	debug!(target = "edubase_cli", config = %serde_json::to_string(&config)?, "configuration");
	std::fs::create_dir_all(&config.output_dir)
		.with_context(|| format!("creating output directory {}", config.output_dir.display()))?;

	let orchestrator = Orchestrator::new(ChromeLauncher, config);
	let mut selection = prompt::StdinPrompt::default();
	match orchestrator.run(&credentials, &mut selection).await {
		Ok(report) => {
			output::print_report(&report, cli.format, &mut io::stdout().lock())?;
			Ok(ExitCode::SUCCESS)
		}
		Err(err) => {
			eprintln!("[!] {}: {err}", err.marker());
			Ok(ExitCode::FAILURE)
		}
	}
}
