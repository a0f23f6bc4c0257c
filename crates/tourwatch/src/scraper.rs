use crate::parser::{ParseError, parse_ticket_response, parse_times, remaining_tickets};
use crate::types::TimesEntry;

use reqwest::Client;
use std::time::Duration;

const TASK_TIMES: &str = "getTimes";
const TASK_TICKETS: &str = "checktickets";
const FORM_OPTION: &str = "com_rsform";

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

/// Client for the two form tasks of the booking endpoint.
#[derive(Debug, Clone)]
pub struct BookingClient {
    client: Client,
    base_url: String,
    form_id: u32,
}

impl BookingClient {
    pub fn new(form_id: u32) -> Result<Self, ScraperError> {
        Self::with_base_url(crate::BASE_URL, form_id)
    }

    pub fn with_base_url(base_url: impl Into<String>, form_id: u32) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            form_id,
        })
    }

    pub fn form_id(&self) -> u32 {
        self.form_id
    }

    /// Dates with their tour times, in the order the site lists them.
    pub async fn fetch_times(&self) -> Result<Vec<TimesEntry>, ScraperError> {
        log::debug!("Fetching tour times for form {}...", self.form_id);

        let form_id = self.form_id.to_string();
        let body = self
            .post_task(TASK_TIMES, &[("formId", form_id.as_str())])
            .await?;

        Ok(parse_times(&body)?)
    }

    /// Free tickets for one date/time, already translated from the raw reservation count.
    pub async fn ticket_count(&self, date: &str, time: &str) -> Result<i64, ScraperError> {
        let form_id = self.form_id.to_string();
        let body = self
            .post_task(
                TASK_TICKETS,
                &[
                    ("formId", form_id.as_str()),
                    ("ArrivalDate", date),
                    ("ArrivalTime", time),
                ],
            )
            .await?;

        let raw = parse_ticket_response(&body)?;
        let tickets = remaining_tickets(raw);
        log::debug!("{date} {time}: raw {raw}, {tickets} free");
        Ok(tickets)
    }

    async fn post_task(&self, task: &str, form: &[(&str, &str)]) -> Result<String, ScraperError> {
        let body = self
            .client
            .post(&self.base_url)
            .query(&[("task", task), ("option", FORM_OPTION)])
            .form(form)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        Ok(body)
    }
}
