use crate::domain::value_objects::{EntryId, PerformedDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgrochemicalCategory {
    Pesticide,
    Fertilizer,
    #[default]
    #[serde(other)]
    Other,
}

/// One supply usage line attached to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agrochemical {
    pub name: String,
    #[serde(default)]
    pub category: AgrochemicalCategory,
    #[serde(default)]
    pub organic: bool,
    pub dosage: f64,
    #[serde(default)]
    pub unit: String,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<String>,
}

impl Agrochemical {
    pub fn line_cost(&self) -> f64 {
        self.dosage * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub pending_upload: bool,
}

/// Everything the activity form submits. This is also the payload an offline
/// `add` carries, before any id exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetails {
    pub activity_name: String,
    pub stage_id: String,
    #[serde(default)]
    pub stage_name: String,
    pub season_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_name: Option<String>,
    pub performed_date: PerformedDate,
    #[serde(default)]
    pub labor_cost: f64,
    #[serde(default)]
    pub material_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_unit: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub images: Vec<EntryImage>,
    #[serde(default)]
    pub agrochemicals: Vec<Agrochemical>,
}

impl EntryDetails {
    /// Sum of the agrochemical lines when any exist, otherwise the manually
    /// entered material cost.
    pub fn effective_material_cost(&self) -> f64 {
        if self.agrochemicals.is_empty() {
            self.material_cost
        } else {
            self.agrochemicals.iter().map(Agrochemical::line_cost).sum()
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.labor_cost + self.effective_material_cost()
    }

    pub fn season_label(&self) -> &str {
        self.season_name.as_deref().unwrap_or(&self.season_id)
    }

    pub fn has_pending_uploads(&self) -> bool {
        self.images.iter().any(|image| image.pending_upload)
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.activity_name.trim().is_empty() {
            return Err(EntryValidationError::required(EntryField::ActivityName));
        }
        if self.season_id.trim().is_empty() {
            return Err(EntryValidationError::required(EntryField::SeasonId));
        }
        if self.stage_id.trim().is_empty() {
            return Err(EntryValidationError::required(EntryField::StageId));
        }
        check_amount(EntryField::LaborCost, self.labor_cost)?;
        check_amount(EntryField::MaterialCost, self.material_cost)?;
        if let Some(quantity) = self.quantity {
            check_amount(EntryField::Quantity, quantity)?;
        }
        for line in &self.agrochemicals {
            if line.name.trim().is_empty() {
                return Err(EntryValidationError::required(EntryField::AgrochemicalName));
            }
            check_amount(EntryField::AgrochemicalDosage, line.dosage)?;
            check_amount(EntryField::AgrochemicalUnitPrice, line.unit_price)?;
        }
        if self.images.iter().any(|image| image.src.trim().is_empty()) {
            return Err(EntryValidationError::required(EntryField::ImageSource));
        }
        Ok(())
    }
}

fn check_amount(field: EntryField, value: f64) -> Result<(), EntryValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(EntryValidationError {
            field,
            message: "phải là số không âm".to_string(),
        });
    }
    Ok(())
}

/// A recorded farming activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: EntryId,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl TimelineEntry {
    pub fn new(id: EntryId, details: EntryDetails) -> Self {
        Self { id, details }
    }

    pub fn total_cost(&self) -> f64 {
        self.details.total_cost()
    }
}

/// Form field names, as the UI addresses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    ActivityName,
    SeasonId,
    StageId,
    LaborCost,
    MaterialCost,
    Quantity,
    AgrochemicalName,
    AgrochemicalDosage,
    AgrochemicalUnitPrice,
    ImageSource,
}

impl EntryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryField::ActivityName => "activityName",
            EntryField::SeasonId => "seasonId",
            EntryField::StageId => "stageId",
            EntryField::LaborCost => "laborCost",
            EntryField::MaterialCost => "materialCost",
            EntryField::Quantity => "quantity",
            EntryField::AgrochemicalName => "agrochemicals.name",
            EntryField::AgrochemicalDosage => "agrochemicals.dosage",
            EntryField::AgrochemicalUnitPrice => "agrochemicals.unitPrice",
            EntryField::ImageSource => "images.src",
        }
    }
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct EntryValidationError {
    pub field: EntryField,
    pub message: String,
}

impl EntryValidationError {
    fn required(field: EntryField) -> Self {
        Self {
            field,
            message: "không được để trống".to_string(),
        }
    }
}

/// Cost totals over a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub entry_count: usize,
    pub labor_total: f64,
    pub material_total: f64,
    pub grand_total: f64,
}

impl CostSummary {
    pub fn from_entries(entries: &[TimelineEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            let material = entry.details.effective_material_cost();
            acc.entry_count += 1;
            acc.labor_total += entry.details.labor_cost;
            acc.material_total += material;
            acc.grand_total += entry.details.labor_cost + material;
            acc
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn details(activity: &str, season: &str, date: &str) -> EntryDetails {
        EntryDetails {
            activity_name: activity.to_string(),
            stage_id: "stage-1".to_string(),
            stage_name: "Làm đất".to_string(),
            season_id: season.to_string(),
            season_name: None,
            performed_date: PerformedDate::parse(date).unwrap(),
            labor_cost: 200_000.0,
            material_cost: 50_000.0,
            quantity: None,
            quantity_unit: None,
            notes: String::new(),
            images: Vec::new(),
            agrochemicals: Vec::new(),
        }
    }

    pub fn entry(id: &str, activity: &str, season: &str, date: &str) -> TimelineEntry {
        TimelineEntry::new(EntryId::parse(id).unwrap(), details(activity, season, date))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::details;
    use super::*;

    fn urea(dosage: f64, unit_price: f64) -> Agrochemical {
        Agrochemical {
            name: "Urê".to_string(),
            category: AgrochemicalCategory::Fertilizer,
            organic: false,
            dosage,
            unit: "kg".to_string(),
            unit_price,
            inventory_item_id: Some("inv-7".to_string()),
        }
    }

    #[test]
    fn material_cost_falls_back_to_manual_value() {
        let d = details("Bón phân", "s1", "01/02/2024");
        assert_eq!(d.effective_material_cost(), 50_000.0);
        assert_eq!(d.total_cost(), 250_000.0);
    }

    #[test]
    fn agrochemical_lines_supersede_manual_material_cost() {
        let mut d = details("Bón phân", "s1", "01/02/2024");
        d.agrochemicals = vec![urea(2.5, 12_000.0), urea(1.0, 30_000.0)];
        assert_eq!(d.effective_material_cost(), 60_000.0);
        assert_eq!(d.total_cost(), 260_000.0);
    }

    #[test]
    fn validation_requires_activity_season_and_stage() {
        let mut d = details("  ", "s1", "01/02/2024");
        assert_eq!(d.validate().unwrap_err().field, EntryField::ActivityName);

        d.activity_name = "Phun thuốc".to_string();
        d.season_id.clear();
        assert_eq!(d.validate().unwrap_err().field, EntryField::SeasonId);

        d.season_id = "s1".to_string();
        d.stage_id.clear();
        assert_eq!(d.validate().unwrap_err().field, EntryField::StageId);
    }

    #[test]
    fn validation_rejects_negative_amounts() {
        let mut d = details("Phun thuốc", "s1", "01/02/2024");
        d.labor_cost = -1.0;
        assert_eq!(d.validate().unwrap_err().field, EntryField::LaborCost);

        let mut d = details("Phun thuốc", "s1", "01/02/2024");
        d.agrochemicals = vec![urea(-0.5, 1.0)];
        assert_eq!(
            d.validate().unwrap_err().field,
            EntryField::AgrochemicalDosage
        );
    }

    #[test]
    fn entry_serializes_flat_in_camel_case() {
        let entry = TimelineEntry::new(
            EntryId::parse("srv-1").unwrap(),
            details("Cày ải", "s1", "2024-01-15"),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "srv-1");
        assert_eq!(json["activityName"], "Cày ải");
        assert_eq!(json["performedDate"], "15/01/2024");
        assert_eq!(json["laborCost"], 200_000.0);
    }

    #[test]
    fn unknown_agrochemical_category_reads_as_other() {
        let line: Agrochemical = serde_json::from_value(serde_json::json!({
            "name": "Vôi",
            "category": "soil_amendment",
            "dosage": 10.0,
            "unitPrice": 3000.0
        }))
        .unwrap();
        assert_eq!(line.category, AgrochemicalCategory::Other);
        assert!(line.inventory_item_id.is_none());
    }

    #[test]
    fn summary_totals_effective_costs() {
        let mut with_lines = details("Bón thúc", "s1", "03/02/2024");
        with_lines.agrochemicals = vec![urea(1.0, 10_000.0)];
        let entries = vec![
            TimelineEntry::new(EntryId::parse("a").unwrap(), details("Cày", "s1", "01/02/2024")),
            TimelineEntry::new(EntryId::parse("b").unwrap(), with_lines),
        ];
        let summary = CostSummary::from_entries(&entries);
        assert_eq!(summary.entry_count, 2);
        assert_eq!(summary.labor_total, 400_000.0);
        assert_eq!(summary.material_total, 60_000.0);
        assert_eq!(summary.grand_total, 460_000.0);
    }
}
