//! Project management CLI for the classifieds backend (the equivalent of
//! Django's `manage.py`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use classifieds::Site;
use classifieds_core::{Settings, logging};
use classifieds_server::{HttpServer, ShutdownCoordinator};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Classifieds project management interface", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the development server
	Runserver {
		/// Host to bind to (overrides settings)
		#[arg(long)]
		host: Option<String>,

		/// Port to bind to (overrides settings)
		#[arg(short, long)]
		port: Option<u16>,

		/// Settings file
		#[arg(long, value_name = "FILE", env = "CLASSIFIEDS_SETTINGS")]
		settings: Option<PathBuf>,

		/// Extra fixture to install after the ones in settings (repeatable)
		#[arg(long = "fixture", value_name = "FILE")]
		fixtures: Vec<PathBuf>,
	},

	/// Check fixtures by installing them into a fresh in-memory site
	Loaddata {
		/// Fixture files
		#[arg(required = true, value_name = "FIXTURE")]
		fixtures: Vec<PathBuf>,

		/// Settings file
		#[arg(long, value_name = "FILE", env = "CLASSIFIEDS_SETTINGS")]
		settings: Option<PathBuf>,
	},

	/// Validate settings and print the URL table
	Check {
		/// Settings file
		#[arg(long, value_name = "FILE", env = "CLASSIFIEDS_SETTINGS")]
		settings: Option<PathBuf>,
	},
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
	Settings::load(path.map(PathBuf::as_path)).with_context(|| match path {
		Some(path) => format!("failed to load settings from {}", path.display()),
		None => "failed to load settings".to_string(),
	})
}

async fn runserver(
	host: Option<String>,
	port: Option<u16>,
	settings: Option<PathBuf>,
	fixtures: Vec<PathBuf>,
) -> anyhow::Result<()> {
	let mut settings = load_settings(settings.as_ref())?;
	if let Some(host) = host {
		settings.server.host = host;
	}
	if let Some(port) = port {
		settings.server.port = port;
	}
	settings.fixtures.extend(fixtures);
	settings.validate()?;
	logging::init(&settings.logging);

	let addr = settings.server.bind_address()?;
	let site = Site::new(&settings).context("failed to build site")?;

	tracing::info!(
		debug = settings.debug,
		prefix = %settings.api.prefix,
		"starting development server at http://{}/",
		addr
	);

	let coordinator =
		ShutdownCoordinator::new(Duration::from_secs(settings.server.shutdown_timeout_secs));
	coordinator.shutdown_on_ctrl_c();
	HttpServer::new(site.handler())
		.listen_with_shutdown(addr, coordinator)
		.await?;
	Ok(())
}

fn loaddata(fixtures: Vec<PathBuf>, settings: Option<PathBuf>) -> anyhow::Result<()> {
	let mut settings = load_settings(settings.as_ref())?;
	settings.fixtures.clear();
	let site = Site::new(&settings)?;

	let result = site.load_fixtures(&fixtures)?;
	for (model, count) in &result.per_model {
		println!("  {:<24} {}", model, count);
	}
	println!(
		"Installed {} object(s) from {} fixture(s)",
		result.records_loaded,
		fixtures.len()
	);
	Ok(())
}

fn check(settings: Option<PathBuf>) -> anyhow::Result<()> {
	let settings = load_settings(settings.as_ref())?;
	let site = Site::new(&settings)?;

	println!("{:<28} {}", "NAME", "PATH");
	for route in site.router.routes() {
		println!("{:<28} {}", route.name, route.path);
	}
	println!(
		"System check identified no issues ({} users configured).",
		settings.users.len()
	);
	Ok(())
}

async fn run() -> anyhow::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Runserver {
			host,
			port,
			settings,
			fixtures,
		} => runserver(host, port, settings, fixtures).await,
		Commands::Loaddata { fixtures, settings } => loaddata(fixtures, settings),
		Commands::Check { settings } => check(settings),
	}
}

#[tokio::main]
async fn main() {
	if let Err(e) = run().await {
		eprintln!("Error: {:#}", e);
		process::exit(1);
	}
}
