mod cli;
mod logging;
mod progress;
mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use harvester_engine::{
    probe_output_dir, BrowserError, BrowserSession, HarvestReport, Harvester, HarvesterConfig,
    ReqwestFetcher,
};

use crate::cli::Cli;
use crate::logging::LogDestination;
use crate::progress::TerminalProgress;
use crate::settings::AppSettings;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let progress = TerminalProgress::new();
    if let Some(destination) = LogDestination::from_flags(cli.log_file.as_deref(), cli.quiet) {
        logging::initialize(destination, logging::level_for(cli.verbose), progress.bar())?;
    }

    // Item log context is thread-local, so the whole run stays on one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    let report = runtime.block_on(run(&cli, &progress))?;

    println!(
        "{} of {} discovered item(s) stored, {} skipped",
        report.stored_count(),
        report.discovered(),
        report.skipped_count()
    );
    Ok(())
}

async fn run(cli: &Cli, progress: &TerminalProgress) -> Result<HarvestReport> {
    let request = harvester_core::validate(cli.invocation()).context("invalid arguments")?;
    probe_output_dir(&request.output_dir).context("output directory is not usable")?;
    let settings = AppSettings::load(cli.config.as_deref())?;

    let mut config = HarvesterConfig::from_request(&request);
    config.wait = settings.wait_policy(request.wait_unit);
    let harvester = Harvester::new(
        config,
        Arc::new(ReqwestFetcher::new(settings.fetch_settings())),
    );

    let session = match cli.browser_url.as_deref().or(settings.browser_url.as_deref()) {
        Some(url) => BrowserSession::attach(url).await,
        None => BrowserSession::launch(&settings.browser_options(cli.headed)).await,
    }
    .context("could not start a browser session")?;

    let prepared = async {
        let surface = session.open_surface(settings.selectors.clone()).await?;
        surface.submit_query(&request.query).await?;
        tokio::time::sleep(request.wait_unit).await;
        if let Some(size) = request.size_filter {
            surface.apply_size_filter(size).await?;
            tokio::time::sleep(request.wait_unit).await;
        }
        Ok::<_, BrowserError>(surface)
    }
    .await;

    let outcome = match prepared {
        Ok(surface) => {
            progress.start();
            let outcome = harvester.run(&surface, progress).await;
            if let Ok(report) = &outcome {
                progress.finish(report.stored_count(), report.items.len());
            }
            outcome.context("discovery failed")
        }
        Err(err) => Err(err).context("could not submit the search"),
    };

    if let Err(err) = session.close().await {
        engine_warn!("closing the browser session failed: {err}");
    }
    let report = outcome?;
    engine_info!("run for {:?} complete", request.query);
    Ok(report)
}
