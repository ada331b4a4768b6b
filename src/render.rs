//! Text rendering of a pyramid for the terminal.

use crate::layout::{PyramidLayout, SlotPosition};
use crate::session::SortSession;

/// Characters per grid column, brackets included.
const CELL_WIDTH: usize = 6;
const LABEL_WIDTH: usize = CELL_WIDTH - 2;

/// Render an empty pyramid, one line per row.
///
/// Example output for four cards:
/// ```text
///       [    ]
/// [    ][    ][    ]
/// ```
pub fn render_layout(layout: &PyramidLayout) -> String {
    render_with(layout, |_| None)
}

/// Render a session's pyramid with placed card ids abbreviated into the
/// slots, followed by the parking lot.
pub fn render_session(session: &SortSession) -> String {
    let Some(layout) = session.layout() else {
        return "(no cards loaded)\n".to_string();
    };

    let mut output = render_with(layout, |slot| {
        session.card_at(slot).map(|card| card.id.clone())
    });

    let parked: Vec<&str> = session.parking_lot().map(|c| c.id.as_str()).collect();
    if !parked.is_empty() {
        output.push_str(&format!("\nUnplaced ({}): {}\n", parked.len(), parked.join(", ")));
    }
    output
}

fn render_with<F>(layout: &PyramidLayout, label: F) -> String
where
    F: Fn(SlotPosition) -> Option<String>,
{
    let mut output = String::new();
    for row in &layout.rows {
        let Some(first) = row.first() else {
            continue;
        };
        output.push_str(&" ".repeat((first.column - 1) * CELL_WIDTH));
        for &slot in row {
            let text: String = label(slot)
                .unwrap_or_default()
                .chars()
                .take(LABEL_WIDTH)
                .collect();
            output.push('[');
            output.push_str(&format!("{:<width$}", text, width = LABEL_WIDTH));
            output.push(']');
        }
        output.push('\n');
    }
    output
}
