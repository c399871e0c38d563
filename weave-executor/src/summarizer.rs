//! The Few-shot Summarizer: condense an over-long instruction prompt into
//! a short description for the active-instructions catalogue.

use weave_core::context::{Context, Role};
use weave_core::error::LlmError;
use weave_core::llm::{ChatOptions, LlmClient};

/// Summarizer calls always run at this temperature — a description task
/// has no use for sampling variance.
pub const SUMMARIZER_TEMPERATURE: f32 = 0.0;

/// Number of words a word limit is allowed to exceed before a prompt is
/// considered "over-long" and worth summarizing.
const WORD_LIMIT_SLACK: usize = 5;

/// Count words by whitespace splitting.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Return `prompt` verbatim if it is within `word_limit + 5` words;
/// otherwise ask `llm` for a description no longer than `word_limit` words.
pub async fn summarize(
    llm: &dyn LlmClient,
    prompt: &str,
    word_limit: usize,
) -> Result<String, LlmError> {
    if word_count(prompt) <= word_limit + WORD_LIMIT_SLACK {
        return Ok(prompt.to_string());
    }

    let system = format!(
        "Act as a description generator for text. Read the following text and \
         produce a short description of what it does. Not more than {word_limit} words."
    );
    let mut ctx = Context::new();
    ctx.add_message("summarizer", Role::System, system);
    ctx.add_message("summarizer", Role::User, prompt);

    let response = llm
        .chat_completion(&ctx, SUMMARIZER_TEMPERATURE, ChatOptions::default())
        .await?;
    Ok(response.first_content().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::test_utils::{text_response, MockLlmClient};

    #[tokio::test]
    async fn short_prompt_passes_through_unsummarized() {
        let llm = MockLlmClient::new(vec![], vec![]);
        let result = summarize(&llm, "a short prompt", 120).await.unwrap();
        assert_eq!(result, "a short prompt");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn over_long_prompt_is_summarized() {
        let long_prompt = "word ".repeat(50);
        let llm = MockLlmClient::new(vec![text_response("a short summary")], vec![]);
        let result = summarize(&llm, &long_prompt, 10).await.unwrap();
        assert_eq!(result, "a short summary");
        assert_eq!(llm.call_count(), 1);
    }

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(word_count("one two  three"), 3);
        assert_eq!(word_count(""), 0);
    }
}
