mod common;

use std::collections::HashSet;

use common::cards;
use qsort_survey::error::SessionError;
use qsort_survey::layout::SlotPosition;
use qsort_survey::session::{Placement, SessionState, SortSession};
use speculate2::speculate;

/// Every card is in exactly one place: a slot or the parking lot.
fn assert_card_invariant(session: &SortSession) {
    let mut seen = HashSet::new();
    for card in session.parking_lot() {
        assert!(seen.insert(card.id.clone()), "{} appears twice", card.id);
    }
    for (_, card) in session.placements() {
        assert!(seen.insert(card.id.clone()), "{} appears twice", card.id);
    }
    let all: HashSet<String> = session.cards().iter().map(|c| c.id.clone()).collect();
    assert_eq!(seen, all);
}

fn place_all(session: &mut SortSession) {
    let slots: Vec<SlotPosition> = session.layout().unwrap().slots().collect();
    let ids: Vec<String> = session.cards().iter().map(|c| c.id.clone()).collect();
    for (id, slot) in ids.iter().zip(slots) {
        session.place_card(id, slot).unwrap();
    }
}

speculate! {
    before {
        let mut session = SortSession::new();
        session
            .load("5", "V1", cards(&["Sunfield", "Ridge", "Harbor", "Meadow"]))
            .expect("Failed to load cards");
        let top = SlotPosition::new(1, 2);
        let left = SlotPosition::new(2, 1);
    }

    describe "load" {
        it "starts with every card in the parking lot" {
            assert_eq!(session.state(), SessionState::Loaded);
            assert_eq!(session.unplaced_count(), 4);
            assert_eq!(session.layout().unwrap().row_sizes(), vec![1, 3]);
            assert_eq!(session.team(), Some("5"));
            assert_eq!(session.version(), Some("V1"));
        }

        it "rejects an empty card set" {
            let mut empty = SortSession::new();
            assert_eq!(empty.load("5", "V1", Vec::new()), Err(SessionError::NoCardsLoaded));
            assert_eq!(empty.state(), SessionState::Empty);
        }

        it "rejects duplicate card ids without changing the session" {
            let result = session.load("5", "V2", cards(&["Alpha", "Beta", "Alpha"]));
            assert_eq!(result, Err(SessionError::DuplicateCard("Alpha".to_string())));
            assert_eq!(session.version(), Some("V1"));
            assert_eq!(session.cards().len(), 4);
        }

        it "replaces a previous load and its placements" {
            session.place_card("Ridge", top).unwrap();
            session.load("7", "V1", cards(&["North", "South"])).unwrap();

            assert_eq!(session.state(), SessionState::Loaded);
            assert_eq!(session.unplaced_count(), 2);
            assert_eq!(session.placements().count(), 0);
        }
    }

    describe "place_card" {
        it "moves a card from the parking lot into a slot" {
            session.place_card("Ridge", top).unwrap();

            assert_eq!(session.state(), SessionState::Partial);
            assert_eq!(session.card_at(top).map(|c| c.id.as_str()), Some("Ridge"));
            assert_eq!(session.slot_of("Ridge"), Some(top));
            assert_eq!(session.unplaced_count(), 3);
            assert_card_invariant(&session);
        }

        it "evicts the occupant back to the parking lot" {
            session.place_card("Ridge", top).unwrap();
            let evicted = session.place_card("Harbor", top).unwrap();

            assert_eq!(evicted, Some("Ridge".to_string()));
            assert_eq!(session.slot_of("Ridge"), None);
            assert!(session.parking_lot().any(|c| c.id == "Ridge"));
            assert_card_invariant(&session);
        }

        it "moves a placed card between slots" {
            session.place_card("Ridge", top).unwrap();
            session.place_card("Ridge", left).unwrap();

            assert_eq!(session.card_at(top), None);
            assert_eq!(session.slot_of("Ridge"), Some(left));
            assert_card_invariant(&session);
        }

        it "is a no-op when the card is already there" {
            session.place_card("Ridge", top).unwrap();
            assert_eq!(session.place_card("Ridge", top), Ok(None));
            assert_eq!(session.unplaced_count(), 3);
        }

        it "rejects unknown cards and slots" {
            assert_eq!(
                session.place_card("Nowhere", top),
                Err(SessionError::UnknownCard("Nowhere".to_string()))
            );
            assert_eq!(
                session.place_card("Ridge", SlotPosition::new(1, 1)),
                Err(SessionError::UnknownSlot { row: 1, column: 1 })
            );
            assert_eq!(session.state(), SessionState::Loaded);
        }

        it "keeps the invariant through a long sequence of moves" {
            let slots: Vec<SlotPosition> = session.layout().unwrap().slots().collect();
            let ids = ["Sunfield", "Ridge", "Harbor", "Meadow"];
            for step in 0..40 {
                let id = ids[step % ids.len()];
                let slot = slots[(step * 7) % slots.len()];
                session.place_card(id, slot).unwrap();
                if step % 5 == 0 {
                    session.remove_card(ids[(step + 1) % ids.len()]).unwrap();
                }
                assert_card_invariant(&session);
            }
        }
    }

    describe "remove_card" {
        it "returns a placed card to the parking lot" {
            session.place_card("Ridge", top).unwrap();
            session.remove_card("Ridge").unwrap();

            assert_eq!(session.state(), SessionState::Loaded);
            assert_eq!(session.card_at(top), None);
            assert_card_invariant(&session);
        }

        it "leaves an unplaced card alone" {
            session.remove_card("Ridge").unwrap();
            assert_eq!(session.unplaced_count(), 4);
            assert_card_invariant(&session);
        }
    }

    describe "reset" {
        it "returns every card to the parking lot" {
            place_all(&mut session);
            assert_eq!(session.state(), SessionState::Complete);

            session.reset();

            assert_eq!(session.state(), SessionState::Loaded);
            assert_eq!(session.unplaced_count(), 4);
            assert_card_invariant(&session);
        }
    }

    describe "apply" {
        it "stops at the first bad placement" {
            let moves = vec![
                Placement { card: "Ridge".to_string(), slot: top },
                Placement { card: "Ghost".to_string(), slot: left },
                Placement { card: "Harbor".to_string(), slot: left },
            ];

            assert_eq!(
                session.apply(&moves),
                Err(SessionError::UnknownCard("Ghost".to_string()))
            );
            assert_eq!(session.slot_of("Ridge"), Some(top));
            assert_eq!(session.slot_of("Harbor"), None);
        }
    }

    describe "try_submit" {
        it "requires a name even when complete" {
            place_all(&mut session);
            assert_eq!(session.try_submit("   "), Err(SessionError::NameRequired));
            assert_eq!(session.state(), SessionState::Complete);
        }

        it "requires every card placed even with a name" {
            session.place_card("Ridge", top).unwrap();
            assert_eq!(
                session.try_submit("Alice"),
                Err(SessionError::Incomplete { unplaced: 3 })
            );
            assert_eq!(session.state(), SessionState::Partial);
        }

        it "fails on an empty session" {
            assert_eq!(
                SortSession::new().try_submit("Alice"),
                Err(SessionError::NoCardsLoaded)
            );
        }

        it "snapshots columns and card text in slot order" {
            session.place_card("Sunfield", SlotPosition::new(2, 3)).unwrap();
            session.place_card("Ridge", SlotPosition::new(2, 1)).unwrap();
            session.place_card("Harbor", top).unwrap();
            session.place_card("Meadow", SlotPosition::new(2, 2)).unwrap();

            let submission = session.try_submit("  Alice ").unwrap();

            assert_eq!(submission.name, "Alice");
            assert_eq!(submission.version, "V1");
            let snapshot: Vec<(usize, &str)> = submission
                .sorted_data
                .iter()
                .map(|e| (e.column, e.card.as_str()))
                .collect();
            assert_eq!(
                snapshot,
                vec![
                    (2, "Harbor - 10MW (Solar)"),
                    (1, "Ridge - 10MW (Solar)"),
                    (2, "Meadow - 10MW (Solar)"),
                    (3, "Sunfield - 10MW (Solar)"),
                ]
            );
            assert_eq!(session.state(), SessionState::Complete);
        }
    }
}
