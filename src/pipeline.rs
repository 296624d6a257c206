//! Topic-to-deck pipeline
//!
//! Search, prompt, completion and deck assembly run strictly in order. Each
//! stage is exposed on its own so the CLI can report progress between them.

use std::path::{Path, PathBuf};

use crate::deck::{self, Outline};
use crate::llm::prompts::build_slides_prompt;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::search::{join_snippets, SearchProvider};
use crate::Result;

/// Search context gathered for a topic.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    pub snippet_count: usize,
    /// Snippets joined with newlines; empty when the search found nothing.
    pub text: String,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub snippet_count: usize,
    pub completion: String,
    pub outline: Outline,
    pub output: PathBuf,
}

pub struct Pipeline {
    search: Box<dyn SearchProvider>,
    llm: Box<dyn LlmProvider>,
    slide_count: usize,
}

impl Pipeline {
    pub fn new(
        search: Box<dyn SearchProvider>,
        llm: Box<dyn LlmProvider>,
        slide_count: usize,
    ) -> Self {
        Self {
            search,
            llm,
            slide_count,
        }
    }

    /// Search the web for `topic` and join the snippets into a context block.
    pub async fn gather_context(&self, topic: &str) -> Result<SearchContext> {
        let snippets = self.search.search(topic).await?;
        Ok(SearchContext {
            snippet_count: snippets.len(),
            text: join_snippets(&snippets),
        })
    }

    /// Build the prompt for `topic` and ask the LLM for slide content.
    pub async fn generate(&self, topic: &str, context: &SearchContext) -> Result<String> {
        let prompt = build_slides_prompt(topic, &context.text, self.slide_count);
        tracing::debug!("Prompt is {} chars", prompt.len());

        self.llm
            .complete(CompletionRequest {
                system: self.llm.system_prompt(),
                prompt: &prompt,
            })
            .await
    }

    /// Turn completion text into a deck saved at `output`.
    pub fn assemble(&self, topic: &str, completion: &str, output: &Path) -> Result<Outline> {
        deck::write_deck(completion, topic, output)
    }

    /// Run every stage for `topic`, writing the deck to `output`.
    ///
    /// A failed completion stops the run before anything is written.
    pub async fn run(&self, topic: &str, output: &Path) -> Result<PipelineReport> {
        let context = self.gather_context(topic).await?;
        let completion = self.generate(topic, &context).await?;
        let outline = self.assemble(topic, &completion, output)?;

        Ok(PipelineReport {
            snippet_count: context.snippet_count,
            completion,
            outline,
            output: output.to_path_buf(),
        })
    }
}
