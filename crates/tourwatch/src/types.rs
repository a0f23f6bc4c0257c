use std::fmt::Display;

use serde::Deserialize;

/// Form id of the regular (adult) tour. Every other id is treated as the kids tour.
pub const STANDARD_TOUR_FORM_ID: u32 = 8;

/// Form id queried when none is given.
pub const DEFAULT_FORM_ID: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourVariant {
    Standard,
    Kids,
}

impl TourVariant {
    pub fn from_form_id(form_id: u32) -> Self {
        if form_id == STANDARD_TOUR_FORM_ID {
            TourVariant::Standard
        } else {
            TourVariant::Kids
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            TourVariant::Standard => "",
            TourVariant::Kids => "-Kids",
        }
    }
}

impl Display for TourVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Memmingen Airport{} Tour", self.suffix())
    }
}

/// One element of the `getTimes` listing: a date and the tour start times on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimesEntry {
    /// `MM/DD/YYYY`, exactly as the site sends it.
    pub date: String,
    #[serde(default)]
    pub time: Vec<String>,
}

/// A bookable date/time with free tickets left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub datetime: String,
    pub date: String,
    pub time: String,
    pub tickets: i64,
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {} Plätze frei", self.datetime, self.tickets)
    }
}
