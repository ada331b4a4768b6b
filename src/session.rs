//! Sort Session: the client-side state of one Q-sort.
//!
//! A session owns the selected team and version, the cards loaded for them,
//! the pyramid generated for that card count, and the current placement.
//! Every card is at all times either in exactly one slot or in the parking
//! lot. Transitions are plain methods; a failed transition leaves the session
//! exactly as it was.
//!
//! ```text
//! Empty --load--> Loaded --place--> Partial --place--> Complete
//!                   ^                  |                  |
//!                   +------reset-------+------reset-------+
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::layout::{layout, PyramidLayout, SlotPosition};
use crate::models::{Card, SortedEntry, Submission};

/// Where a session is in its lifecycle. Derived from the placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No cards loaded.
    Empty,
    /// Cards loaded, every card in the parking lot.
    Loaded,
    /// Some cards placed.
    Partial,
    /// Every card placed; the only state that can be submitted.
    Complete,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loaded => "loaded",
            Self::Partial => "partial",
            Self::Complete => "complete",
        }
    }
}

/// One card-to-slot move, as read from an arrangement file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub card: String,
    #[serde(flatten)]
    pub slot: SlotPosition,
}

#[derive(Debug, Clone, Default)]
pub struct SortSession {
    team: Option<String>,
    version: Option<String>,
    cards: Vec<Card>,
    layout: Option<PyramidLayout>,
    /// Slot -> index into `cards`.
    placements: BTreeMap<SlotPosition, usize>,
    /// Indexes into `cards`, in the order they returned to the lot.
    parking_lot: Vec<usize>,
}

impl SortSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cards for a team and version, replacing anything loaded before.
    ///
    /// Fails without changing the session when there are no cards or two
    /// cards share an identifier.
    pub fn load(
        &mut self,
        team: impl Into<String>,
        version: impl Into<String>,
        cards: Vec<Card>,
    ) -> Result<(), SessionError> {
        if cards.is_empty() {
            return Err(SessionError::NoCardsLoaded);
        }
        let mut ids = HashSet::new();
        if let Some(dup) = cards.iter().find(|c| !ids.insert(c.id.as_str())) {
            return Err(SessionError::DuplicateCard(dup.id.clone()));
        }

        self.layout = Some(layout(cards.len()));
        self.parking_lot = (0..cards.len()).collect();
        self.placements.clear();
        self.cards = cards;
        self.team = Some(team.into());
        self.version = Some(version.into());
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        if self.cards.is_empty() {
            SessionState::Empty
        } else if self.parking_lot.is_empty() {
            SessionState::Complete
        } else if self.placements.is_empty() {
            SessionState::Loaded
        } else {
            SessionState::Partial
        }
    }

    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn layout(&self) -> Option<&PyramidLayout> {
        self.layout.as_ref()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards not yet placed.
    pub fn parking_lot(&self) -> impl Iterator<Item = &Card> {
        self.parking_lot.iter().map(move |&i| &self.cards[i])
    }

    pub fn unplaced_count(&self) -> usize {
        self.parking_lot.len()
    }

    /// Occupied slots in traversal order.
    pub fn placements(&self) -> impl Iterator<Item = (SlotPosition, &Card)> {
        self.placements
            .iter()
            .map(move |(&slot, &i)| (slot, &self.cards[i]))
    }

    pub fn card_at(&self, slot: SlotPosition) -> Option<&Card> {
        self.placements.get(&slot).map(|&i| &self.cards[i])
    }

    pub fn slot_of(&self, card_id: &str) -> Option<SlotPosition> {
        let index = self.index_of(card_id)?;
        self.slot_of_index(index)
    }

    /// Put a card into a slot.
    ///
    /// A card already in the target slot goes back to the parking lot and its
    /// id is returned. The moved card leaves the parking lot or its old slot.
    pub fn place_card(
        &mut self,
        card_id: &str,
        slot: SlotPosition,
    ) -> Result<Option<String>, SessionError> {
        let index = self.require_card(card_id)?;
        if !self.layout.as_ref().is_some_and(|l| l.contains(slot)) {
            return Err(SessionError::UnknownSlot {
                row: slot.row,
                column: slot.column,
            });
        }

        if self.placements.get(&slot) == Some(&index) {
            return Ok(None);
        }

        let evicted = self.placements.remove(&slot);
        if let Some(evicted) = evicted {
            self.parking_lot.push(evicted);
        }

        self.detach(index);
        self.placements.insert(slot, index);

        Ok(evicted.map(|i| self.cards[i].id.clone()))
    }

    /// Return a card to the parking lot. A card already there is left alone.
    pub fn remove_card(&mut self, card_id: &str) -> Result<(), SessionError> {
        let index = self.require_card(card_id)?;
        if let Some(slot) = self.slot_of_index(index) {
            self.placements.remove(&slot);
            self.parking_lot.push(index);
        }
        Ok(())
    }

    /// Apply moves in order, stopping at the first one that fails.
    pub fn apply(&mut self, placements: &[Placement]) -> Result<(), SessionError> {
        for placement in placements {
            self.place_card(&placement.card, placement.slot)?;
        }
        Ok(())
    }

    /// Move every placed card back to the parking lot.
    pub fn reset(&mut self) {
        let placed: Vec<usize> = std::mem::take(&mut self.placements).into_values().collect();
        self.parking_lot.extend(placed);
    }

    /// Snapshot the arrangement for submission.
    ///
    /// Requires a non-blank name and every card placed. The name check comes
    /// first; either failure leaves the placement untouched.
    pub fn try_submit(&self, user_name: &str) -> Result<Submission, SessionError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(SessionError::NameRequired);
        }
        let version = match (&self.version, self.cards.is_empty()) {
            (Some(version), false) => version.clone(),
            _ => return Err(SessionError::NoCardsLoaded),
        };
        if !self.parking_lot.is_empty() {
            return Err(SessionError::Incomplete {
                unplaced: self.parking_lot.len(),
            });
        }

        let sorted_data = self
            .placements()
            .map(|(slot, card)| SortedEntry {
                column: slot.column,
                card: card.text.clone(),
            })
            .collect();

        Ok(Submission {
            name: user_name.to_string(),
            version,
            sorted_data,
        })
    }

    fn index_of(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }

    fn require_card(&self, card_id: &str) -> Result<usize, SessionError> {
        self.index_of(card_id)
            .ok_or_else(|| SessionError::UnknownCard(card_id.to_string()))
    }

    fn slot_of_index(&self, index: usize) -> Option<SlotPosition> {
        self.placements
            .iter()
            .find(|(_, &i)| i == index)
            .map(|(&slot, _)| slot)
    }

    /// Take a card out of wherever it currently is.
    fn detach(&mut self, index: usize) {
        if let Some(pos) = self.parking_lot.iter().position(|&i| i == index) {
            self.parking_lot.remove(pos);
        } else if let Some(slot) = self.slot_of_index(index) {
            self.placements.remove(&slot);
        }
    }
}
