/// Default system instruction fixing the assistant's role.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that creates PowerPoint slides.";

/// Build a deterministic slide-drafting prompt from a topic and search context.
///
/// The requested layout (title line, bullet lines, blank line between slides)
/// is what [`crate::deck::parse_outline`] expects back.
pub fn build_slides_prompt(topic: &str, context: &str, slide_count: usize) -> String {
    format!(
        "Create {slide_count} PowerPoint slides on the topic '{topic}'. Use the following info:\n\
{context}\n\
Format as:\n\
\n\
Slide Title\n\
Bullet point 1\n\
Bullet point 2\n\
...\n\
\n"
    )
}
