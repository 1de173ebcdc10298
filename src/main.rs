use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use splunk_spelunker::cli::Args;
use splunk_spelunker::config::{Credentials, Overrides};
use splunk_spelunker::pipeline::Pipeline;
use splunk_spelunker::resolve::{host_tag, resolve_datasource};
use splunk_spelunker::sumo::SumoClient;

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    let credentials = Credentials::resolve(&args)?;
    let overrides = Overrides::from_args(&args)?;
    let client = SumoClient::new(&credentials, overrides)?;

    let host = host_tag(&args.datasource);
    let root = resolve_datasource(&args.datasource)?;
    info!("spelunking {} as host {host}", root.display());

    let mut pipeline = Pipeline::new(&client, root, host);
    pipeline.run();

    info!("collection complete");
    Ok(())
}

/// Initialize logging from the repeatable `-v` flag.
fn initialize_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}
