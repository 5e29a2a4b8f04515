use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const DISPLAY_FORMAT: &str = "%d/%m/%Y";
const ACCEPTED_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Day an activity was carried out. Stored and displayed as `dd/mm/yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PerformedDate(NaiveDate);

impl PerformedDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Performed date cannot be empty".to_string());
        }
        ACCEPTED_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .map(Self)
            .ok_or_else(|| format!("Invalid performed date: {trimmed}"))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for PerformedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl From<PerformedDate> for String {
    fn from(date: PerformedDate) -> Self {
        date.to_string()
    }
}

impl TryFrom<String> for PerformedDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl FromStr for PerformedDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
