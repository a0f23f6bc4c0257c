use crate::types::{Slot, TourVariant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::future::Future;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub const DEFAULT_SENDMAIL: &str = "/usr/sbin/sendmail";

const BODY_LINE_WIDTH: usize = 76;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Status { program: String, status: ExitStatus },
}

/// A composed availability mail, ready to hand to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl Notification {
    /// Lists every slot in `slots`, not only the ones that are new.
    pub fn compose(variant: TourVariant, slots: &[Slot], recipients: &[String]) -> Self {
        let mut html = format!("<p>{variant} hat heute die folgenden freien Termine:</p>\n<ul>\n");
        for slot in slots {
            html.push_str(&format!("<li>{slot}</li>\n"));
        }
        html.push_str("</ul>\n");

        Self {
            to: recipients.to_vec(),
            subject: format!("{variant} - freie Plätze"),
            html,
        }
    }

    pub fn to_header(&self) -> String {
        self.to.join(",")
    }

    /// Full MIME message as sendmail expects it on stdin with `-t`.
    pub fn to_message(&self) -> String {
        let mut message = String::new();
        message.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
        message.push_str("MIME-Version: 1.0\r\n");
        message.push_str("Content-Transfer-Encoding: base64\r\n");
        message.push_str(&format!("To: {}\r\n", self.to_header()));
        message.push_str(&format!("Subject: {}\r\n", encode_header(&self.subject)));
        message.push_str("\r\n");

        let encoded = STANDARD.encode(self.html.as_bytes());
        for line in encoded.as_bytes().chunks(BODY_LINE_WIDTH) {
            // base64 output is ASCII
            message.push_str(std::str::from_utf8(line).unwrap_or_default());
            message.push_str("\r\n");
        }
        message
    }
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?b?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

pub trait Mailer {
    fn send(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Delivers through a local `sendmail`-compatible program.
#[derive(Debug, Clone)]
pub struct Sendmail {
    program: PathBuf,
    args: Vec<String>,
}

impl Default for Sendmail {
    fn default() -> Self {
        Self::new(DEFAULT_SENDMAIL)
    }
}

impl Sendmail {
    /// Runs `program -t -oi`, so recipients come from the `To` header.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::with_args(program, ["-t", "-oi"])
    }

    pub fn with_args<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> MailError {
        MailError::Io {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl Mailer for Sendmail {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.io_error(e))?;

        // stdin is dropped at the end of the arm so the program sees EOF
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(notification.to_message().as_bytes()).await,
            None => Ok(()),
        };

        // Reap the child before reporting a write error; a failed exit status wins.
        let status = child.wait().await.map_err(|e| self.io_error(e))?;
        if !status.success() {
            return Err(MailError::Status {
                program: self.program.display().to_string(),
                status,
            });
        }
        written.map_err(|e| self.io_error(e))?;

        log::info!("Sent mail out to {}", notification.to_header());
        Ok(())
    }
}
