use aho_corasick::AhoCorasick;
use anyhow::Result;

const DISCOVERY_KEYWORDS: [&str; 7] = [
    "find", "search", "generate", "show me", "what is", "create", "display",
];

const DISCOVERY_REPLY: &str = "I've processed your request. If it's something I can generate \
an artifact for, you might see it in the artifact window, or you can try a more specific \
command like 'generate sales data table'.";

/// Picks the canned assistant reply for a user message.
pub struct ReplyComposer {
    discovery: AhoCorasick,
}

impl ReplyComposer {
    pub fn new() -> Result<Self> {
        let discovery = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(DISCOVERY_KEYWORDS)?;
        Ok(Self { discovery })
    }

    pub fn reply(&self, message: &str) -> String {
        if self.discovery.is_match(message) {
            DISCOVERY_REPLY.to_string()
        } else {
            format!("AI says: You sent \"{message}\". This is a mock AI response.")
        }
    }
}
