use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use flightideas::config::{FlightIdeasConfig, LoggingConfig};
use flightideas::{
    Climate, DestinationPicker, Mode, ModeResolver, TravelPreferences, TripDuration, TripPlanner,
    planner, web,
};

#[derive(Parser)]
#[command(name = "flightideas", version)]
#[command(about = "FlightIdeas - random travel ideas with indicative flight prices")]
struct Cli {
    /// Configuration file (defaults to <config dir>/flightideas/config.toml)
    #[arg(short, long, global = true, env = "FLIGHTIDEAS_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging and configuration details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Pick destinations and price them
    Search {
        /// Origin IATA code
        #[arg(long)]
        origin: Option<String>,
        /// europe, warm, tropical, cold or any
        #[arg(long, default_value = "any")]
        climate: Climate,
        /// any, 7, 14 or 21 days
        #[arg(long, default_value = "any")]
        duration: TripDuration,
        /// Departure date (YYYY-MM-DD), 30 days from today when omitted
        #[arg(long)]
        departure: Option<NaiveDate>,
        /// Number of destinations
        #[arg(long)]
        count: Option<usize>,
        /// Override the configured price source mode
        #[arg(long)]
        mode: Option<Mode>,
        /// Print the JSON response instead of the summary
        #[arg(long)]
        json: bool,
    },
    /// List random destinations without pricing them
    Destinations {
        #[arg(long, default_value = "any")]
        climate: Climate,
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Show the active price source mode
    Mode,
    /// Serve the JSON API
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flightideas={level},warn")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_overview(config: &FlightIdeasConfig, config_path: Option<PathBuf>, verbose: bool) {
    let mode = config.mode();
    println!("✈ FlightIdeas v{}", flightideas::VERSION);
    println!("Random travel ideas with indicative flight prices.");
    println!();
    println!("Mode: {} - {}", mode, mode.description());
    println!();
    println!("Try:");
    println!("  flightideas search --origin MAD --climate warm --duration 14");
    println!("  flightideas destinations --climate europe --count 5");
    println!("  flightideas serve --port {}", config.server.port);

    if verbose {
        println!();
        match config_path.or_else(FlightIdeasConfig::get_config_path) {
            Some(path) if path.exists() => println!("Using config from: {}", path.display()),
            Some(path) => println!("Using config from: defaults ({} not found)", path.display()),
            None => println!("Using config from: defaults"),
        }
        println!("Log level: {} ({})", config.logging.level, config.logging.format);
        println!("Default origin: {}", config.search.default_origin);
        println!("Live scraper: {}", config.scraping.live);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        config: config_path,
        verbose,
        command,
    } = Cli::parse();

    let config = FlightIdeasConfig::load_from_path(config_path.clone())
        .context("Failed to load configuration")?;
    init_tracing(&config.logging, verbose);
    debug!("Loaded configuration: {:?}", config);

    match command {
        None => print_overview(&config, config_path, verbose),
        Some(Command::Mode) => {
            let resolver = ModeResolver::new(config)?;
            println!("{}", resolver.mode_info());
        }
        Some(Command::Destinations { climate, count }) => {
            for destination in DestinationPicker::pick(climate, count) {
                println!("{destination}");
            }
        }
        Some(Command::Search {
            origin,
            climate,
            duration,
            departure,
            count,
            mode,
            json,
        }) => {
            let origin = origin.unwrap_or_else(|| config.search.default_origin.clone());
            let count = count.unwrap_or(config.search.destination_count as usize);
            let departure = departure.unwrap_or_else(planner::default_departure);

            let preferences = TravelPreferences { climate, duration };
            let request = TripPlanner::plan(&origin, preferences, departure, count);
            println!(
                "{} → {} destinations, {} to {}",
                request.origin,
                request.destinations.len(),
                request.start_date,
                request.end_date
            );

            let resolver = ModeResolver::new(config)?;
            let mode = mode.unwrap_or_else(|| resolver.mode());
            let response = resolver.get_flight_prices_with_mode(&request, mode).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{response}");
            }
        }
        Some(Command::Serve { port }) => {
            let port = port.unwrap_or(config.server.port);
            let resolver = ModeResolver::new(config)?;
            web::run(resolver, port).await?;
        }
    }

    Ok(())
}
