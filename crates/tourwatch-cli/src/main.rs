use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use tourwatch::mail::{DEFAULT_SENDMAIL, Sendmail};
use tourwatch::monitor::{DEFAULT_RECORD_FILE, Monitor, MonitorConfig, RunOutcome};
use tourwatch::types::DEFAULT_FORM_ID;

#[derive(Parser)]
#[command(name = "tourwatch")]
#[command(
    about = "Checks the Memmingen Airport tour booking form and mails new free slots",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long = "formid",
        default_value_t = DEFAULT_FORM_ID,
        help = "Booking form to query (8 = standard tour, anything else = kids tour)"
    )]
    form_id: u32,

    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_RECORD_FILE,
        help = "File recording every slot seen as available"
    )]
    collected: PathBuf,

    #[arg(
        long,
        value_name = "ADDRESS",
        num_args = 1..,
        help = "Recipients to notify about new slots; nothing is sent without it"
    )]
    mail: Option<Vec<String>>,

    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_SENDMAIL,
        help = "sendmail-compatible program used for delivery"
    )]
    sendmail: PathBuf,

    #[arg(
        long,
        value_name = "URL",
        default_value = tourwatch::BASE_URL,
        help = "Booking form endpoint"
    )]
    base_url: String,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let config = MonitorConfig {
        form_id: cli.form_id,
        base_url: cli.base_url,
        record_path: cli.collected,
        recipients: cli.mail,
    };

    log::debug!("Checking {} (form {})", config.variant(), config.form_id);

    let monitor = Monitor::new(config, Sendmail::new(cli.sendmail)).unwrap_or_else(|e| {
        log::error!("Error creating booking client: {}", e);
        process::exit(1);
    });

    let outcome = monitor.run().await.unwrap_or_else(|e| {
        log::error!("Availability check failed: {}", e);
        process::exit(1);
    });

    if let RunOutcome::Notified { recipients, .. } = outcome {
        log::debug!("Notified {} recipient(s)", recipients.len());
    }
}
