use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use git_bump::cli::{run_release, Cli};
use git_bump::config;
use git_bump::git::Git2Repository;
use git_bump::ui;
use git_bump::updaters::UpdaterRegistry;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let root = match cli.path {
        Some(ref path) => path.clone(),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    let mut config = config::load_config(cli.config.as_deref(), &root)
        .context("Error loading config")?;
    cli.apply(&mut config);

    let repo = Git2Repository::open(&root).context("Git repository error")?;
    let registry = UpdaterRegistry::new(&root);

    run_release(&config, &root, &repo, &registry)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
