//! Prompt shaping for the chat tool.
//!
//! The tool sends exactly one user message. The only transformation is an
//! optional instruction asking for a short answer, which keeps replies (and
//! token bills) small for quick terminal questions.

/// Appended to the user's prompt when brief mode is on.
pub const BRIEF_ANSWER_SUFFIX: &str = "\n\nAnswer briefly.";

/// Build the message text sent to the model.
pub fn build_prompt(prompt: &str, brief: bool) -> String {
    let prompt = prompt.trim();
    if brief {
        format!("{prompt}{BRIEF_ANSWER_SUFFIX}")
    } else {
        prompt.to_string()
    }
}

/// Pick the prompt: non-blank piped input wins, else the argument words
/// joined by single spaces. Empty when neither has content.
pub fn choose_prompt(piped: Option<&str>, words: &[String]) -> String {
    match piped.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => words.join(" ").trim().to_string(),
    }
}
