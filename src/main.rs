mod app;
mod error;
mod form;
mod logo;
mod model;
mod money;
mod preview;
mod settings;

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::form::FormState;
use crate::logo::LogoFile;
use crate::model::{Currency, InvoiceForm};
use crate::preview::Preview;
use crate::settings::AppSettings;

// ==========================================
// Structs & Enums
// ==========================================

#[derive(Parser)]
#[command(name = "instant-invoice", version, about = "Fill in an invoice and watch the preview update live")]
struct Cli {
    /// Settings file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Starting currency (USD, EUR or GBP)
    #[arg(long, global = true)]
    currency: Option<Currency>,

    /// Starting sender name
    #[arg(long, global = true)]
    sender: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the invoice preview as text
    Preview {
        /// Logo to validate and show in the preview
        #[arg(long)]
        logo: Option<PathBuf>,
    },
    /// Print the invoice preview as JSON
    Json {
        /// Logo to validate and show in the preview
        #[arg(long)]
        logo: Option<PathBuf>,
    },
}

// ==========================================
// Main Function
// ==========================================

fn main() -> Result<(), AppError> {
    init_tracing();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => settings::load_from(path)?,
        None => settings::load_default(),
    };
    let form = starting_form(&settings, &cli);

    match cli.command {
        None => {
            info!(currency = %form.currency, "opening invoice window");
            app::run(form, &settings.window)
        }
        Some(Commands::Preview { logo }) => {
            let preview = headless_preview(form, logo.as_deref());
            println!("{}", preview::render_text(&preview)?);
            Ok(())
        }
        Some(Commands::Json { logo }) => {
            let preview = headless_preview(form, logo.as_deref());
            println!("{}", serde_json::to_string_pretty(&preview)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Sample invoice, then settings file overrides, then command-line flags.
fn starting_form(settings: &AppSettings, cli: &Cli) -> InvoiceForm {
    let mut form = settings.defaults.apply(InvoiceForm::sample(Utc::now().date_naive()));
    if let Some(currency) = cli.currency {
        form.currency = currency;
    }
    if let Some(sender) = &cli.sender {
        form.sender.clone_from(sender);
    }
    form
}

/// Runs the logo through the same validation as the window, without a GPU.
fn headless_preview(form: InvoiceForm, logo_path: Option<&Path>) -> Preview {
    let mut state: FormState<()> = FormState::new(form);
    if let Some(path) = logo_path {
        // a rejection is logged by upload_logo and shows up as the monogram
        state.upload_logo(&LogoFile::from_path(path), |file| logo::decode(file).map(drop));
    }
    Preview::render(&state)
}
