//! Officiant - Command line entry point
//!
//! Loads configuration, installs logging and dispatches to a subcommand.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use officiant_domain::email::EmailTrigger;
use officiant_infrastructure::load_config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Template rendering and form tooling for marriage officer bookings
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Overrides the configured data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a template file for a stored submission
    Render {
        /// Submission id
        #[arg(long)]
        submission: String,
        /// Template file
        #[arg(long)]
        template: PathBuf,
        /// Link used for {{bookingLink}}
        #[arg(long)]
        booking_link: Option<String>,
    },
    /// Render the emails a trigger sends for a stored submission
    Emails {
        /// Submission id
        #[arg(long)]
        submission: String,
        /// Trigger to fire
        #[arg(long, value_enum, default_value_t = TriggerArg::OnSubmission)]
        trigger: TriggerArg,
        /// Link used for {{bookingLink}}
        #[arg(long)]
        booking_link: Option<String>,
    },
    /// Normalize a raw options value (JSON or plain text)
    Options {
        /// Raw value; omit for the placeholder options
        raw: Option<String>,
    },
    /// Find the field a requested id refers to
    MatchField {
        /// Requested field id
        id: String,
        /// Label hint
        #[arg(long)]
        label: Option<String>,
        /// Form id; defaults to the booking form
        #[arg(long)]
        form: Option<String>,
    },
    /// List the fields shown for a stored submission
    VisibleFields {
        /// Submission id
        #[arg(long)]
        submission: String,
    },
    /// Show the booking form with canonical options
    BookingForm {
        /// Form id; defaults to the booking form
        #[arg(long)]
        form: Option<String>,
    },
    /// List the reserved template variables
    Variables,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TriggerArg {
    OnSubmission,
    OnBookingConfirmed,
    OnInvoiceIssued,
    Manual,
}

impl From<TriggerArg> for EmailTrigger {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::OnSubmission => Self::OnSubmission,
            TriggerArg::OnBookingConfirmed => Self::OnBookingConfirmed,
            TriggerArg::OnInvoiceIssued => Self::OnInvoiceIssued,
            TriggerArg::Manual => Self::Manual,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered output can be piped
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    tracing::debug!("Starting Officiant v{}", env!("CARGO_PKG_VERSION"));

    let app = commands::App::new(config);
    let output = match cli.command {
        Command::Render {
            submission,
            template,
            booking_link,
        } => {
            let template = tokio::fs::read_to_string(&template)
                .await
                .with_context(|| format!("reading template {}", template.display()))?;
            app.render(&submission, &template, booking_link.as_deref()).await?
        }
        Command::Emails {
            submission,
            trigger,
            booking_link,
        } => app.emails(&submission, trigger.into(), booking_link.as_deref()).await?,
        Command::Options { raw } => commands::options(raw.as_deref())?,
        Command::MatchField { id, label, form } => {
            app.match_field(form.as_deref(), &id, label.as_deref()).await?
        }
        Command::VisibleFields { submission } => app.visible_fields(&submission).await?,
        Command::BookingForm { form } => app.booking_form(form.as_deref()).await?,
        Command::Variables => commands::variables(),
    };

    println!("{output}");
    Ok(())
}
