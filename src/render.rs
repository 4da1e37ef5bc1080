//! Plain-text rendering of bingo boards for chat delivery.

use std::collections::HashSet;

use crate::game::{Card, CardView, LineId};

/// Render a participant's board as monospace chat text.
///
/// Marked numbers come bracketed, everything else padded to the same width,
/// with a completed-line summary underneath. Pure formatting: the caller
/// supplies which lines are done, no game logic runs here.
pub fn render_card(name: &str, card: &Card, marked: &HashSet<u8>, completed: &[LineId]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}'s BINGO\n", name));

    for row in card.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|&value| {
                if marked.contains(&value) {
                    format!("[{:>2}]", value)
                } else {
                    format!(" {:>2} ", value)
                }
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }

    if completed.is_empty() {
        out.push_str("no lines yet");
    } else {
        let labels: Vec<String> = completed.iter().map(|line| line.to_string()).collect();
        out.push_str(&format!(
            "{} line{}: {}",
            completed.len(),
            if completed.len() == 1 { "" } else { "s" },
            labels.join(", ")
        ));
    }
    out
}

/// Convenience wrapper for rendering straight from a [`CardView`].
pub fn render_view(view: &CardView) -> String {
    render_card(&view.name, &view.card, &view.marked, &view.completed)
}
