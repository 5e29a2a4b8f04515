use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Prefix reserved for ids minted on this device while offline.
pub const LOCAL_ID_PREFIX: &str = "local_";

/// Identifier of a timeline entry. Server ids are opaque; client ids start with
/// [`LOCAL_ID_PREFIX`] and must be swapped for the server id after sync.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        Self::validate(value)?;
        Ok(Self(value.to_string()))
    }

    /// `local_<unix millis>`; callers that may mint several ids in the same
    /// millisecond disambiguate with [`EntryId::local_with_suffix`].
    pub fn local(now: DateTime<Utc>) -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{}", now.timestamp_millis()))
    }

    pub fn local_with_suffix(now: DateTime<Utc>, suffix: u32) -> Self {
        Self(format!(
            "{LOCAL_ID_PREFIX}{}_{suffix}",
            now.timestamp_millis()
        ))
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Entry ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl TryFrom<String> for EntryId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for EntryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn local_ids_carry_reserved_prefix() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = EntryId::local(now);
        assert_eq!(id.as_str(), "local_1700000000123");
        assert!(id.is_local());
        assert_eq!(
            EntryId::local_with_suffix(now, 2).as_str(),
            "local_1700000000123_2"
        );
    }

    #[test]
    fn server_ids_are_not_local() {
        let id = EntryId::parse("65f1c0ffee").unwrap();
        assert!(!id.is_local());
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(EntryId::parse("   ").is_err());
        assert!(serde_json::from_str::<EntryId>("\"\"").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = EntryId::parse("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
