use crate::domain::entities::TimelineEntry;
use crate::shared::error::AppError;
use std::path::Path;

pub const CSV_HEADER: [&str; 8] = [
    "Ngày thực hiện",
    "Mùa vụ",
    "Giai đoạn",
    "Công việc",
    "Chi phí nhân công",
    "Chi phí vật tư",
    "Tổng chi phí",
    "Ghi chú",
];

const UTF8_BOM: &str = "\u{feff}";

/// One header line plus one line per entry, `\n`-separated.
pub fn render_csv(entries: &[TimelineEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.iter().map(|h| escape_field(h)).collect::<Vec<_>>().join(","));

    for entry in entries {
        let details = &entry.details;
        let material = details.effective_material_cost();
        let row = [
            details.performed_date.to_string(),
            details.season_label().to_string(),
            details.stage_name.clone(),
            details.activity_name.clone(),
            format_amount(details.labor_cost),
            format_amount(material),
            format_amount(details.labor_cost + material),
            details.notes.clone(),
        ];
        lines.push(
            row.iter()
                .map(|field| escape_field(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

/// Writes `csv` with a UTF-8 byte order mark so spreadsheet tools pick the
/// right encoding for Vietnamese text.
pub async fn write_csv_file(path: &Path, csv: &str) -> Result<(), AppError> {
    let mut contents = String::with_capacity(UTF8_BOM.len() + csv.len() + 1);
    contents.push_str(UTF8_BOM);
    contents.push_str(csv);
    contents.push('\n');
    tokio::fs::write(path, contents).await?;
    tracing::info!(path = %path.display(), "CSV export written");
    Ok(())
}

/// Default download name, e.g. `nhat-ky-2024-03-05.csv`.
pub fn default_file_name(today: chrono::NaiveDate) -> String {
    format!("nhat-ky-{}.csv", today.format("%Y-%m-%d"))
}

fn escape_field(value: &str) -> String {
    let single_line: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if single_line.contains(',') || single_line.contains('"') {
        format!("\"{}\"", single_line.replace('"', "\"\""))
    } else {
        single_line
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::timeline_entry::fixtures::entry;
    use crate::domain::entities::{Agrochemical, AgrochemicalCategory};

    fn sample() -> Vec<TimelineEntry> {
        let mut spraying = entry("2", "Phun thuốc", "s1", "12/03/2024");
        spraying.details.season_name = Some("Đông Xuân 2024".to_string());
        spraying.details.notes = "Pha loãng, \"2 bình\"\nchiều mát".to_string();
        spraying.details.agrochemicals = vec![Agrochemical {
            name: "Regent".to_string(),
            category: AgrochemicalCategory::Pesticide,
            organic: false,
            dosage: 2.0,
            unit: "gói".to_string(),
            unit_price: 15_000.0,
            inventory_item_id: None,
        }];
        vec![entry("1", "Cày ải", "s1", "01/03/2024"), spraying]
    }

    #[test]
    fn has_header_plus_one_line_per_entry() {
        let entries = sample();
        let csv = render_csv(&entries);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), entries.len() + 1);
        assert_eq!(lines[0], CSV_HEADER.join(","));
    }

    #[test]
    fn total_column_is_labor_plus_material() {
        let csv = render_csv(&sample());
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[1], "01/03/2024,s1,Làm đất,Cày ải,200000,50000,250000,");
        assert!(lines[2].starts_with("12/03/2024,Đông Xuân 2024,Làm đất,Phun thuốc,200000,30000,230000,"));
    }

    #[test]
    fn quotes_and_flattens_notes() {
        let csv = render_csv(&sample());
        let last = csv.lines().last().unwrap();
        assert!(last.ends_with("\"Pha loãng, \"\"2 bình\"\" chiều mát\""));
    }

    #[test]
    fn empty_list_is_header_only() {
        assert_eq!(render_csv(&[]).lines().count(), 1);
    }

    #[test]
    fn fractional_amounts_keep_two_decimals() {
        assert_eq!(format_amount(1500.5), "1500.50");
        assert_eq!(format_amount(0.0), "0");
    }

    #[tokio::test]
    async fn file_starts_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_file_name(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        ));
        write_csv_file(&path, &render_csv(&sample())).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with('\u{feff}'));
        assert!(path.ends_with("nhat-ky-2024-03-05.csv"));
    }
}
