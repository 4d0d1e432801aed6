mod cli;
mod error;
mod logging;
mod plot;
mod report;

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tickwindow_core::{
    choose_interval, AlphaVantageClient, FetchConfig, IntradayRequest, LookbackPeriod,
    LookbackWindow, MarketDateTime, OutputSize, Symbol, API_KEY_ENV_VAR,
};
use time::UtcOffset;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Must be read while the process is still single-threaded.
    let offset = MarketDateTime::local_offset();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => return exit_with(CliError::from(error)),
    };

    match runtime.block_on(run(&cli, offset)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => exit_with(error),
    }
}

fn exit_with(error: CliError) -> ExitCode {
    debug!(code = error.code(), "command failed");
    eprintln!("error: {error}");
    ExitCode::from(error.exit_code())
}

async fn run(cli: &Cli, offset: UtcOffset) -> Result<(), CliError> {
    let config = FetchConfig::resolve(cli.api_key.clone(), std::env::var(API_KEY_ENV_VAR).ok())?
        .with_timeout(Duration::from_secs(cli.timeout_secs))?;
    let client = AlphaVantageClient::new(config);

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    summarize(
        cli,
        &client,
        || MarketDateTime::now_at(offset),
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
    .await
}

/// Everything after configuration: validate input, fetch once, filter,
/// report to `out`, then plot. Nothing is written to `out` on failure.
async fn summarize(
    cli: &Cli,
    client: &AlphaVantageClient,
    now: impl FnOnce() -> MarketDateTime,
    out: &mut impl Write,
    diagnostics: &mut impl Write,
) -> Result<(), CliError> {
    let symbol = Symbol::parse(&cli.symbol)?;
    let period = LookbackPeriod::parse(&cli.period)?;

    let interval = choose_interval(&period);
    let requested = if cli.full {
        OutputSize::Full
    } else {
        OutputSize::Compact
    };
    let output_size = OutputSize::for_lookback(requested, &period);
    if output_size != requested {
        info!(%period, "period exceeds compact history, requesting full output");
    }
    info!(%symbol, %period, %interval, %output_size, "fetching intraday bars");

    let request = IntradayRequest::new(symbol, interval).with_output_size(output_size);
    let series = client.fetch_intraday(&request).await?;

    let window = LookbackWindow::ending_at(now(), &period);
    let summary = window.filter(&series, &period);
    info!(
        rows = summary.rows(),
        fetched = summary.fetched,
        start = %window.start,
        "window applied"
    );

    report::render(out, &summary, &series, cli.format)?;
    out.flush()?;

    if cli.plot {
        plot::plot_if_requested(&summary, cli.plot_out.as_deref(), diagnostics);
    }

    Ok(())
}
