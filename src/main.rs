use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

mod controller;
mod data;
mod domain;
mod engine;
mod inputter;
mod model;
mod pages;
mod record;
mod ui;

use clap::Parser;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use controller::Controller;
use data::SampleDataProvider;
use domain::{AppConfig, AppError, Page};
use engine::{LoggingMutator, PAGE_SIZES};
use model::{Model, Status};
use ui::DashboardUI;

#[derive(Parser, Debug)]
#[command(
    name = "staffdeck",
    version,
    about = "A tui based recruitment agency admin dashboard."
)]
struct Args {
    /// Log filter, e.g. "staffdeck=debug"
    #[arg(long, default_value = "staffdeck=info")]
    log: String,

    /// Write logs to this file; without it logging is disabled so the
    /// terminal stays clean
    #[arg(long)]
    log_file: Option<String>,

    /// Page to open at startup
    #[arg(long, value_enum, default_value_t = Page::Dashboard)]
    page: Page,

    /// Rows per table page (5, 10, 20 or 50)
    #[arg(long, default_value_t = 10)]
    page_size: usize,

    /// Artificial latency of the sample data service in milliseconds
    #[arg(long, default_value_t = 500)]
    fetch_delay_ms: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_tracing(&args) {
        eprintln!("Error: {e:?}");
        return ExitCode::FAILURE;
    }
    match run(args) {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn init_tracing(args: &Args) -> Result<(), AppError> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let path = shellexpand::full(path)
        .map_err(|e| AppError::IoError(std::io::Error::other(e.to_string())))?;
    let file = File::create(path.as_ref())?;
    let filter =
        EnvFilter::try_new(&args.log).unwrap_or_else(|_| EnvFilter::new("staffdeck=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    if !PAGE_SIZES.contains(&args.page_size) {
        return Err(AppError::InvalidPageSize(args.page_size));
    }
    info!("Starting staffdeck!");

    let config = AppConfig::default()
        .page_size(args.page_size)
        .fetch_delay_ms(args.fetch_delay_ms)
        .start_page(args.page);

    let provider = SampleDataProvider::new(Duration::from_millis(config.fetch_delay_ms));
    let mut model = Model::new(config.clone(), Box::new(provider), Box::new(LoggingMutator));
    let ui = DashboardUI::new();
    let controller = Controller::new(&config);

    let mut terminal = ratatui::init();

    while model.status != Status::Quitting {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        }
    }

    Ok(())
}
