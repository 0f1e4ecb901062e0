use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use price_core::{FormField, FormState, PredictionController};
use price_ui::{
    Overrides, Session, Settings, app, logging, prompt::Prompter, view::Renderer,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Lagos house price predictor.
///
/// Collects property details, sends them to the prediction service and
/// prints the estimated price. Fields not given as options are asked for
/// interactively.
#[derive(Debug, Parser)]
#[command(name = "price-predictor", version, about)]
struct Cli {
    /// TOML settings file ([api] and [display] sections).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the prediction service.
    #[arg(long, env = "PRICE_PREDICTOR_API_URL")]
    api_url: Option<String>,

    /// Client backend to use.
    #[arg(long)]
    backend: Option<String>,

    #[arg(long)]
    bedrooms: Option<String>,

    #[arg(long)]
    bathrooms: Option<String>,

    #[arg(long)]
    toilets: Option<String>,

    #[arg(long)]
    parking_space: Option<String>,

    /// One of the listed towns, e.g. "Victoria Island".
    #[arg(long)]
    town: Option<String>,

    /// Property type, e.g. "Detached Duplex".
    #[arg(long)]
    title: Option<String>,

    /// Sets any field by key or label, e.g. `--set "Parking Space=2"`.
    /// Applied after the per-field options.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = app::parse_assignment)]
    assignments: Vec<(FormField, String)>,

    /// Submit once with the given options and never prompt.
    #[arg(long, default_value_t = false)]
    no_prompt: bool,

    /// Log filter, e.g. `debug` or `price_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Silence log output on stderr.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    fn form_state(&self) -> FormState {
        let mut form = FormState::new();
        let given = [
            (FormField::Bedrooms, &self.bedrooms),
            (FormField::Bathrooms, &self.bathrooms),
            (FormField::Toilets, &self.toilets),
            (FormField::ParkingSpace, &self.parking_space),
            (FormField::Town, &self.town),
            (FormField::Title, &self.title),
        ];
        for (field, value) in given {
            if let Some(value) = value {
                form.set(field, value.clone());
            }
        }
        for (field, value) in &self.assignments {
            form.set(*field, value.clone());
        }
        form
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init_default_logging();

    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if cli.quiet {
        logging::set_stderr_enabled(false)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    settings.apply_overrides(&Overrides {
        base_url: cli.api_url.clone(),
        backend: cli.backend.clone(),
    });

    let config = settings.client_config();
    debug!(?config, "client configuration");
    let client = app::build_registry()
        .create(&config)
        .await
        .with_context(|| format!("cannot reach prediction service via '{}'", config.backend))?;

    let stdout = io::stdout();
    let renderer = Renderer::new(settings.display.clone(), stdout.is_terminal());
    let prompter = Prompter::new(io::stdin().lock(), stdout);
    let controller = PredictionController::with_form(cli.form_state());

    let mut session = Session::new(controller, client, renderer, prompter, !cli.no_prompt);
    let price = session.run().await?;

    info!(has_price = price.is_some(), "session finished");
    Ok(if price.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
