//! # MSW Forecast Application Entry Point
//!
//! Command line front end: loads `msw-config.toml`, fetches the forecast for
//! the configured spot and prints the requested view.
//!
//! ```text
//! msw-forecast [current|next|next-day|six-hour|daily|all|sunrise|sunset|url]
//!              [--config <path>] [--chart]
//! ```
//!
//! Logging goes to stderr (`RUST_LOG` overrides the default `info` level);
//! forecast output goes to stdout.

// Test modules
#[cfg(test)]
mod tests;

use std::env;
use std::sync::{mpsc, Arc};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use msw_forecast::config::Config;
use msw_forecast::renderer::{format_block, format_point, render_chart};
use msw_forecast::{
    load_async, Forecast, ForecastDataBlock, ForecastDataPoint, HttpTransport, SolarEphemeris,
    ATTRIBUTION,
};

/// View of the forecast to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Command {
    #[default]
    Current,
    Next,
    NextDay,
    SixHour,
    Daily,
    All,
    Sunrise,
    Sunset,
    Url,
}

impl Command {
    fn parse(name: &str) -> Option<Command> {
        Some(match name {
            "current" => Command::Current,
            "next" => Command::Next,
            "next-day" => Command::NextDay,
            "six-hour" => Command::SixHour,
            "daily" => Command::Daily,
            "all" => Command::All,
            "sunrise" => Command::Sunrise,
            "sunset" => Command::Sunset,
            "url" => Command::Url,
            _ => return None,
        })
    }
}

#[derive(Debug, Default, PartialEq)]
struct Args {
    command: Command,
    config_path: Option<String>,
    /// Draw the breaking-height chart for multi-point views
    chart: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut command_seen = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config_path = Some(path);
            }
            "--chart" => parsed.chart = true,
            flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
            name => {
                if command_seen {
                    bail!("unexpected argument: {name}");
                }
                parsed.command = Command::parse(name)
                    .with_context(|| format!("unknown command: {name}"))?;
                command_seen = true;
            }
        }
    }
    Ok(parsed)
}

/// Text output of `command` for an already fetched forecast.
fn render(
    command: Command,
    forecast: &Forecast,
    config: &Config,
    chart: bool,
    now: DateTime<Utc>,
) -> String {
    let (lat, lon) = (config.spot.latitude, config.spot.longitude);
    match command {
        Command::Current => render_point(forecast.current()),
        Command::Next => render_point(forecast.next()),
        Command::NextDay => render_point(forecast.next_day()),
        Command::SixHour => render_block(&forecast.six_hour(), chart),
        Command::Daily => render_block(&forecast.daily(), chart),
        Command::All => render_block(forecast.all(), chart),
        Command::Sunrise => render_point(forecast.sunrise(&SolarEphemeris, lat, lon, now)),
        Command::Sunset => render_point(forecast.sunset(&SolarEphemeris, lat, lon, now)),
        Command::Url => format!("{}\n", forecast.url()),
    }
}

fn render_point(point: Option<&ForecastDataPoint>) -> String {
    match point {
        Some(point) => format_point(point),
        None => "No matching forecast.\n".to_string(),
    }
}

fn render_block(block: &ForecastDataBlock, chart: bool) -> String {
    let mut out = format_block(block);
    if chart {
        out.push('\n');
        out.push_str(&render_chart(block));
    }
    out
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let config = match &args.config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let query = config.query().context("invalid forecast request")?;

    if args.command == Command::Url {
        println!("{}", query.url());
        return Ok(());
    }

    // The blocking client must be built outside the async runtime
    let transport = Arc::new(
        HttpTransport::new(&config.api.user_agent, config.timeout())
            .context("failed to create HTTP client")?,
    );

    let rt = tokio::runtime::Runtime::new()?;
    let (tx, rx) = mpsc::channel();
    info!(spot = %config.spot.name, "fetching forecast");
    rt.block_on(load_async(transport.clone(), query.url(), move |result| {
        // receiver outlives the task
        let _ = tx.send(result);
    }))
    .context("forecast task failed")?;

    let forecast = rx
        .recv()
        .context("forecast task ended without a result")?
        .context("failed to fetch forecast")?;

    print!(
        "{}",
        render(args.command, &forecast, &config, args.chart, Utc::now())
    );
    println!("\n{ATTRIBUTION}");
    Ok(())
}
