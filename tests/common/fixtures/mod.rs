use nhatky_lib::domain::entities::{Agrochemical, AgrochemicalCategory, EntryDetails, TimelineEntry};
use nhatky_lib::domain::value_objects::{EntryId, PerformedDate};

pub fn details(activity: &str, date: &str) -> EntryDetails {
    EntryDetails {
        activity_name: activity.to_string(),
        stage_id: "stage-1".to_string(),
        stage_name: "Làm đất".to_string(),
        season_id: "dx-2024".to_string(),
        season_name: Some("Đông Xuân 2024".to_string()),
        performed_date: PerformedDate::parse(date).expect("date"),
        labor_cost: 100_000.0,
        material_cost: 20_000.0,
        quantity: None,
        quantity_unit: None,
        notes: String::new(),
        images: Vec::new(),
        agrochemicals: Vec::new(),
    }
}

pub fn with_fertilizer(mut details: EntryDetails, dosage: f64, unit_price: f64) -> EntryDetails {
    details.agrochemicals.push(Agrochemical {
        name: "NPK 16-16-8".to_string(),
        category: AgrochemicalCategory::Fertilizer,
        organic: false,
        dosage,
        unit: "kg".to_string(),
        unit_price,
        inventory_item_id: None,
    });
    details
}

pub fn entry(id: &str, activity: &str, date: &str) -> TimelineEntry {
    TimelineEntry::new(EntryId::parse(id).expect("id"), details(activity, date))
}
