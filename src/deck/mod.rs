//! Deck assembly for slidecraft
//!
//! Parses completion text into slides and writes them as a `.pptx` package.

mod outline;
mod pptx;
mod template;

use std::path::Path;

pub use outline::{parse_outline, Outline, SkippedGroup, SlideContent};
pub use pptx::{escape_xml, Deck};

use crate::Result;

/// Extension of generated decks.
pub const DECK_EXTENSION: &str = "pptx";

/// File name for a topic's deck: spaces become underscores, plus a fixed suffix.
pub fn deck_filename(topic: &str) -> String {
    format!("{}_slides.{}", topic.replace(' ', "_"), DECK_EXTENSION)
}

/// Parse `text` into slides and save them as a deck at `path`.
///
/// Returns the outline so callers can report skipped groups.
pub fn write_deck(text: &str, title: &str, path: &Path) -> Result<Outline> {
    let outline = parse_outline(text);

    for skipped in &outline.skipped {
        tracing::warn!(
            "Skipping group {} without body lines: {:?}",
            skipped.index + 1,
            skipped.text
        );
    }
    if outline.is_empty() {
        tracing::warn!("Completion text produced no slides; writing an empty deck");
    }

    Deck::from_outline(title, &outline).save(path)?;
    Ok(outline)
}
