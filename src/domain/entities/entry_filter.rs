use crate::domain::entities::TimelineEntry;
use crate::domain::value_objects::PerformedDate;

/// Search box, season picker and date range of the timeline page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub search_term: Option<String>,
    pub season_id: Option<String>,
    pub date_from: Option<PerformedDate>,
    pub date_to: Option<PerformedDate>,
}

impl EntryFilter {
    pub fn is_empty(&self) -> bool {
        self.normalized_term().is_none()
            && self.season_id.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Full rescan of `entries`; order is preserved.
    pub fn apply(&self, entries: &[TimelineEntry]) -> Vec<TimelineEntry> {
        let term = self.normalized_term();
        entries
            .iter()
            .filter(|entry| self.matches(entry, term.as_deref()))
            .cloned()
            .collect()
    }

    fn matches(&self, entry: &TimelineEntry, term: Option<&str>) -> bool {
        let details = &entry.details;

        if let Some(season_id) = &self.season_id {
            if &details.season_id != season_id {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if details.performed_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if details.performed_date > to {
                return false;
            }
        }

        match term {
            None => true,
            Some(term) => [
                details.activity_name.as_str(),
                details.stage_name.as_str(),
                details.season_name.as_deref().unwrap_or_default(),
                details.notes.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(term)),
        }
    }

    fn normalized_term(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}
