//! Slide outline parsing
//!
//! Completion text is read as blank-line separated groups: the first line of a
//! group is the slide title and the remaining lines are its body.

use serde::Serialize;

/// Title and body text of one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideContent {
    pub title: String,
    pub body: String,
}

impl SlideContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A non-empty group that could not be read as a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedGroup {
    /// Zero-based position of the group in the completion text
    pub index: usize,
    pub text: String,
}

/// Slides recovered from a completion, plus the groups that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub slides: Vec<SlideContent>,
    pub skipped: Vec<SkippedGroup>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Split completion text into slides.
///
/// Groups without a body line are recorded in [`Outline::skipped`]; groups
/// that are entirely whitespace are ignored.
pub fn parse_outline(text: &str) -> Outline {
    let normalized = text.replace("\r\n", "\n");
    let mut outline = Outline::default();

    for (index, group) in normalized.split("\n\n").enumerate() {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }

        match group.split_once('\n') {
            Some((title, body)) => outline
                .slides
                .push(SlideContent::new(title.trim(), body.trim())),
            None => outline.skipped.push(SkippedGroup {
                index,
                text: group.to_string(),
            }),
        }
    }

    outline
}
