//! Pull structured content out of free-form agent replies.
//!
//! Agents answer in prose with the deliverable wrapped in a fenced code
//! block. Extraction prefers a block tagged with the expected language and
//! falls back to format-specific heuristics.

use std::sync::LazyLock;

use regex::Regex;

/// Opening fence with an optional language tag, the body, then the closing fence.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*([A-Za-z0-9_+-]*)[^\n]*\n(.*?)```").expect("valid regex")
});

static TERMINATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTERMINATE\b").expect("valid regex"));

/// `approved` as a whole word. Group 1 captures a preceding negation or
/// modal (up to two words away), group 2 a trailing condition.
static APPROVED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\b(?:not|never|cannot|can't|won't|isn't|aren't|wasn't|unable|can|could|would|will|should|may|might|must)\b(?:\s+\w+){0,2}\s+)?\bapproved\b(\s+(?:once|when|if|until|after|provided|pending)\b)?",
    )
    .expect("valid regex")
});

/// Expected shape of a stage's deliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Json,
    Markdown,
    Sql,
}

impl ContentFormat {
    /// Fence tags accepted for this format.
    fn tags(self) -> &'static [&'static str] {
        match self {
            ContentFormat::Json => &["json"],
            ContentFormat::Markdown => &["markdown", "md"],
            ContentFormat::Sql => &["sql", "postgresql", "postgres", "sqlite", "mysql"],
        }
    }
}

/// A fenced code block found in a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Lowercased language tag, empty when untagged.
    pub lang: String,
    pub body: String,
}

/// Every fenced block in `text`, in order of appearance.
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    FENCE_RE
        .captures_iter(text)
        .map(|caps| FencedBlock {
            lang: caps[1].to_ascii_lowercase(),
            body: caps[2].trim().to_string(),
        })
        .collect()
}

/// Extract the deliverable of the given format from an agent reply.
///
/// Returns `None` when nothing usable is found.
pub fn extract_content(text: &str, format: ContentFormat) -> Option<String> {
    let blocks = fenced_blocks(text);

    if let Some(block) = blocks
        .iter()
        .find(|b| format.tags().contains(&b.lang.as_str()) && !b.body.is_empty())
    {
        return Some(block.body.clone());
    }

    match format {
        ContentFormat::Json => blocks
            .iter()
            .map(|b| b.body.as_str())
            .chain(std::iter::once(text.trim()))
            .chain(bracketed(text))
            .find(|candidate| serde_json::from_str::<serde_json::Value>(candidate).is_ok())
            .map(str::to_string),
        ContentFormat::Sql => blocks
            .iter()
            .map(|b| b.body.as_str())
            .chain(std::iter::once(text.trim()))
            .find(|candidate| contains_ddl(candidate))
            .map(str::to_string),
        ContentFormat::Markdown => {
            // A reply that is a single untagged fence is the document itself.
            let trimmed = text.trim();
            if let [only] = blocks.as_slice() {
                if only.lang.is_empty() && trimmed.starts_with("```") && trimmed.ends_with("```") {
                    return Some(only.body.clone()).filter(|b| !b.is_empty());
                }
            }
            Some(trimmed.to_string()).filter(|t| !t.is_empty())
        }
    }
}

/// Whether a reviewer reply approves the draft.
///
/// A standalone `APPROVED` (case-insensitive) is a verdict unless a
/// negation or modal precedes it ("not yet approved", "cannot be approved")
/// or a condition follows it ("approved once ..."). `DISAPPROVED` never
/// matches. `TERMINATE` also ends the review.
pub fn is_approval(reply: &str) -> bool {
    if TERMINATE_RE.is_match(reply) {
        return true;
    }
    APPROVED_RE
        .captures_iter(reply)
        .any(|caps| caps.get(1).is_none() && caps.get(2).is_none())
}

/// Largest `[...]` or `{...}` span of `text`, for JSON embedded in prose.
fn bracketed(text: &str) -> Vec<&str> {
    [('[', ']'), ('{', '}')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = text.find(open)?;
            let end = text.rfind(close)?;
            (end > start).then(|| &text[start..=end])
        })
        .collect()
}

fn contains_ddl(text: &str) -> bool {
    text.to_ascii_uppercase().contains("CREATE TABLE")
}
