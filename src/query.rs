//! Query Service: teams, eligible versions and card sets.
//!
//! Every call reloads the workbook from the [`DataSource`]. Team and version
//! comparisons use [`CellValue::normalized`], so a numeric team `5` matches a
//! query for `" 5 "`.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Card, CardSummary, QsortOverview, VersionInfo};
use crate::source::*;

/// Versions with fewer cards than this are never offered to a team.
pub const MIN_CARDS_PER_VERSION: usize = 5;

#[derive(Clone)]
pub struct QueryService {
    source: Arc<dyn DataSource>,
}

impl QueryService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// Distinct team names from the Teams sheet, in sheet order. Teams with no
    /// cards are still listed; they just have no eligible versions.
    pub fn list_teams(&self) -> Result<Vec<String>> {
        let workbook = self.source.load()?;
        let teams = workbook.table(TEAMS_SHEET)?;
        let name_col = teams.column(TEAM_NAME)?;

        let mut seen = HashSet::new();
        let names = teams
            .rows()
            .map(|row| row.text(name_col))
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect();
        Ok(names)
    }

    /// Versions of `team` with at least [`MIN_CARDS_PER_VERSION`] cards, in
    /// order of first appearance on the Cards sheet.
    pub fn list_eligible_versions(&self, team: &str) -> Result<Vec<VersionInfo>> {
        let workbook = self.source.load()?;
        // The Versions sheet must exist even though counts come from Cards.
        workbook.table(VERSIONS_SHEET)?;
        let cards = workbook.table(CARDS_SHEET)?;
        let team_col = cards.column(TEAM_NAME)?;
        let version_col = cards.column(VERSION)?;

        let team = team.trim();
        let mut order: Vec<String> = Vec::new();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for row in cards.rows().filter(|row| row.text(team_col) == team) {
            let version = row.text(version_col);
            if version.is_empty() {
                continue;
            }
            let count = counts.entry(version.clone()).or_insert(0);
            if *count == 0 {
                order.push(version);
            }
            *count += 1;
        }

        tracing::debug!("Version counts for team {}: {:?}", team, counts);

        let versions = order
            .into_iter()
            .filter(|v| counts.get(v).copied().unwrap_or(0) >= MIN_CARDS_PER_VERSION)
            .map(|name| VersionInfo { name })
            .collect();
        Ok(versions)
    }

    /// All cards for a team and version. No match is an empty list, not an error.
    pub fn list_cards(&self, team: &str, version: &str) -> Result<Vec<Card>> {
        let workbook = self.source.load()?;
        let cards = workbook.table(CARDS_SHEET)?;
        let team_col = cards.column(TEAM_NAME)?;
        let version_col = cards.column(VERSION)?;
        let project_col = cards.column(PROJECT_NAME)?;
        let mw_col = cards.find_column(MW);
        let tech_col = cards.find_column(TECHNOLOGY);

        let (team, version) = (team.trim(), version.trim());
        let matched: Vec<Card> = cards
            .rows()
            .filter(|row| row.text(team_col) == team && row.text(version_col) == version)
            .map(|row| {
                let id = row.text(project_col);
                let text = format!(
                    "{} - {}MW ({})",
                    id,
                    row.text_opt(mw_col).unwrap_or_default(),
                    row.text_opt(tech_col).unwrap_or_default()
                );
                let details = row
                    .entries()
                    .map(|(header, cell)| {
                        (header.to_string(), serde_json::Value::String(cell.normalized()))
                    })
                    .collect();
                Card { id, text, details }
            })
            .collect();

        if matched.is_empty() {
            tracing::warn!("No cards found for team {} and version {}", team, version);
        } else {
            let mut ids = HashSet::new();
            for card in &matched {
                if !ids.insert(card.id.as_str()) {
                    tracing::warn!(
                        "Duplicate card {} for team {} and version {}",
                        card.id,
                        team,
                        version
                    );
                }
            }
        }

        Ok(matched)
    }

    /// Every version from the Versions sheet plus all cards grouped by version.
    pub fn overview(&self) -> Result<QsortOverview> {
        let workbook = self.source.load()?;
        let versions_table = workbook.table(VERSIONS_SHEET)?;
        let cards_table = workbook.table(CARDS_SHEET)?;

        let version_name_col = versions_table.column(VERSION_NAME)?;
        let versions = versions_table
            .rows()
            .map(|row| row.text(version_name_col))
            .filter(|v| !v.is_empty())
            .collect();

        let version_col = cards_table.column(VERSION)?;
        let project_col = cards_table.column(PROJECT_NAME)?;
        let mw_col = cards_table.find_column(MW);
        let rto_col = cards_table.find_column(RTO);
        let ntp_col = cards_table.find_column(NTP);

        let mut cards: BTreeMap<String, Vec<CardSummary>> = BTreeMap::new();
        for row in cards_table.rows() {
            cards
                .entry(row.text(version_col))
                .or_default()
                .push(CardSummary {
                    project_name: row.text(project_col),
                    mw: row.text_opt(mw_col),
                    sub_rto: row.text_opt(rto_col),
                    ntp: row.text_opt(ntp_col),
                });
        }

        Ok(QsortOverview { versions, cards })
    }
}
