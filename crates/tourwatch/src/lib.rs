pub mod known;
pub mod mail;
pub mod monitor;
pub mod parser;
pub mod scraper;
pub mod types;

pub use mail::{Mailer, Sendmail};
pub use monitor::{Monitor, MonitorConfig, RunOutcome};
pub use scraper::BookingClient;

pub const BASE_URL: &str = "https://tour.memmingen-airport.de/index.php";
