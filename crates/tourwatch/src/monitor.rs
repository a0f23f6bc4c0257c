use crate::known::load_and_merge_known;
use crate::mail::{MailError, Mailer, Notification};
use crate::parser::{ParseError, slot_key};
use crate::scraper::{BookingClient, ScraperError};
use crate::types::{DEFAULT_FORM_ID, Slot, TourVariant};

use std::path::PathBuf;

pub const DEFAULT_RECORD_FILE: &str = "memmingen-airport-tour.collected";

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error("Record file error: {0}")]
    Record(#[from] std::io::Error),
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}

impl From<ParseError> for MonitorError {
    fn from(e: ParseError) -> Self {
        MonitorError::Scraper(ScraperError::ParseError(e))
    }
}

/// Everything one check needs, built once by the caller.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub form_id: u32,
    pub base_url: String,
    pub record_path: PathBuf,
    /// `None` disables sending; detection and the record file still run.
    pub recipients: Option<Vec<String>>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            form_id: DEFAULT_FORM_ID,
            base_url: crate::BASE_URL.to_string(),
            record_path: PathBuf::from(DEFAULT_RECORD_FILE),
            recipients: None,
        }
    }
}

impl MonitorConfig {
    pub fn variant(&self) -> TourVariant {
        TourVariant::from_form_id(self.form_id)
    }

    fn recipients(&self) -> Option<&[String]> {
        self.recipients
            .as_deref()
            .filter(|recipients| !recipients.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    NothingAvailable,
    NoNewSlots { available: Vec<Slot> },
    MissingRecipients { available: Vec<Slot> },
    Notified { available: Vec<Slot>, recipients: Vec<String> },
}

pub struct Monitor<M> {
    config: MonitorConfig,
    client: BookingClient,
    mailer: M,
}

impl<M: Mailer> Monitor<M> {
    pub fn new(config: MonitorConfig, mailer: M) -> Result<Self, MonitorError> {
        let client = BookingClient::with_base_url(config.base_url.clone(), config.form_id)?;
        Ok(Self {
            config,
            client,
            mailer,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Slots with free tickets, in the order the site lists them.
    /// Ticket counts are requested one at a time.
    pub async fn filter_available(&self) -> Result<Vec<Slot>, MonitorError> {
        let mut slots = Vec::new();

        for entry in self.client.fetch_times().await? {
            for time in &entry.time {
                let tickets = self.client.ticket_count(&entry.date, time).await?;
                if tickets > 0 {
                    slots.push(Slot {
                        datetime: slot_key(&entry.date, time)?,
                        date: entry.date.clone(),
                        time: time.clone(),
                        tickets,
                    });
                }
            }
        }

        Ok(slots)
    }

    /// One full check: fetch, record, and mail if anything is new.
    pub async fn run(&self) -> Result<RunOutcome, MonitorError> {
        let available = self.filter_available().await?;

        if available.is_empty() {
            log::info!(
                "No entries currently available, but would have sent to {:?}",
                self.config.recipients.as_deref().unwrap_or_default()
            );
            return Ok(RunOutcome::NothingAvailable);
        }

        log::info!("Found some entries: {}", describe(&available));

        let old_known = load_and_merge_known(&self.config.record_path, &available)?;
        if available.iter().all(|slot| old_known.contains(&slot.datetime)) {
            log::info!("All available entries were already known, no mail sent");
            return Ok(RunOutcome::NoNewSlots { available });
        }

        let Some(recipients) = self.config.recipients() else {
            log::warn!(
                "Found current tickets, but no mail given: {}",
                describe(&available)
            );
            return Ok(RunOutcome::MissingRecipients { available });
        };

        let notification = Notification::compose(self.config.variant(), &available, recipients);
        self.mailer.send(&notification).await?;

        Ok(RunOutcome::Notified {
            available,
            recipients: recipients.to_vec(),
        })
    }
}

fn describe(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
