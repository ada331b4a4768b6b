#![allow(dead_code)]

use std::sync::Arc;

use qsort_survey::models::Card;
use qsort_survey::source::{CellValue, DataSource, MemorySource, Table, Workbook};

pub const CARD_HEADERS: [&str; 6] = ["Team Name", "Version", "Project Name", "MW", "Technology", "RTO"];

pub fn card_row(team: impl Into<CellValue>, version: &str, project: &str, mw: f64, tech: &str) -> Vec<CellValue> {
    vec![
        team.into(),
        version.into(),
        project.into(),
        mw.into(),
        tech.into(),
        "NYISO".into(),
    ]
}

/// Team 5 has five V1 cards and four V2 cards; team 7 (stored as text
/// with padding) has six V1 cards.
pub fn survey_workbook() -> Workbook {
    let mut cards = Table::new("Cards", CARD_HEADERS);
    for (i, name) in ["Sunfield", "Ridge", "Harbor", "Meadow", "Canyon"].iter().enumerate() {
        cards.push_row(card_row(5i64, "V1", name, 10.0 * (i + 1) as f64, "Solar"));
    }
    for name in ["Alpha", "Beta", "Gamma", "Delta"] {
        cards.push_row(card_row(5i64, "V2", name, 20.0, "Wind"));
    }
    for name in ["North", "South", "East", "West", "Center", "Edge"] {
        cards.push_row(card_row(" 7 ", "V1", name, 12.5, "Storage"));
    }

    Workbook::new()
        .with_table(
            Table::new("Teams", ["Team Name"])
                .with_row([CellValue::from(5i64)])
                .with_row([CellValue::from("7")])
                .with_row([CellValue::from(" 5 ")]),
        )
        .with_table(
            Table::new("Versions", ["Version Name"])
                .with_row(["V1"])
                .with_row(["V2"]),
        )
        .with_table(cards)
}

pub fn memory_source() -> Arc<dyn DataSource> {
    Arc::new(MemorySource::new(survey_workbook()))
}

pub fn card(id: &str) -> Card {
    Card {
        id: id.to_string(),
        text: format!("{} - 10MW (Solar)", id),
        details: Default::default(),
    }
}

pub fn cards(ids: &[&str]) -> Vec<Card> {
    ids.iter().map(|id| card(id)).collect()
}
