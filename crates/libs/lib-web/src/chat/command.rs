//! Inbound message classification and the fixed strings sent back to clients.

use lib_utils::truncate_chars;

/// Case-sensitive prefix that turns a message into an assistant command.
pub const HELP_MARKER: &str = "/help";

/// Sent to the sender when no assistant is configured.
pub const NOTICE_NOT_CONFIGURED: &str = "Error: Gemini is not configured.";

/// Sent to the sender when the answer could not be generated.
pub const NOTICE_GENERATION_FAILED: &str = "Error: Failed to generate a response.";

/// Sent to the sender when anything unexpected breaks the pipeline.
pub const NOTICE_PROCESSING_ERROR: &str = "An error occurred while processing your request.";

/// Title used when the query is empty and title generation failed.
pub const DEFAULT_TITLE: &str = "AI Response";

/// Max characters kept from the query when it stands in for a title.
pub const FALLBACK_TITLE_CHARS: usize = 60;

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Relayed verbatim to the room.
    Chat(String),
    /// Assistant request; holds the trimmed query, which may be empty.
    Command(String),
}

impl Inbound {
    pub fn classify(text: &str) -> Self {
        match text.strip_prefix(HELP_MARKER) {
            Some(rest) => Inbound::Command(rest.trim().to_string()),
            None => Inbound::Chat(text.to_string()),
        }
    }
}

/// Prompt sent to the assistant to name a question.
pub fn title_prompt(query: &str) -> String {
    format!("Generate a concise title for this question: {}", query)
}

/// Title used when the assistant could not produce one.
pub fn fallback_title(query: &str) -> String {
    if query.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        truncate_chars(query, FALLBACK_TITLE_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(Inbound::classify("hello there"), Inbound::Chat("hello there".into()));
        // Marker must lead and is case-sensitive
        assert_eq!(Inbound::classify(" /help x"), Inbound::Chat(" /help x".into()));
        assert_eq!(Inbound::classify("/HELP x"), Inbound::Chat("/HELP x".into()));
    }

    #[test]
    fn test_command_query_is_trimmed() {
        assert_eq!(
            Inbound::classify("/help   what is glaucoma  "),
            Inbound::Command("what is glaucoma".into())
        );
    }

    #[test]
    fn test_whitespace_only_command_has_empty_query() {
        assert_eq!(Inbound::classify("/help   "), Inbound::Command(String::new()));
        assert_eq!(Inbound::classify("/help"), Inbound::Command(String::new()));
    }

    #[test]
    fn test_marker_without_space_still_commands() {
        assert_eq!(Inbound::classify("/helpme"), Inbound::Command("me".into()));
    }

    #[test]
    fn test_title_helpers() {
        assert_eq!(
            title_prompt("what is glaucoma"),
            "Generate a concise title for this question: what is glaucoma"
        );
        assert_eq!(fallback_title(""), "AI Response");
        assert_eq!(fallback_title(&"a".repeat(100)).chars().count(), 60);
    }
}
