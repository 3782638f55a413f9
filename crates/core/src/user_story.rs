//! User-story model, parsing and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One user story as produced by the requirements analyst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: i64,
    pub persona: String,
    pub user_story: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
}

/// Accepts both a bare array and an object wrapping it.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoriesDocument {
    List(Vec<UserStory>),
    Wrapped { user_stories: Vec<UserStory> },
}

/// Parse user stories from JSON text.
///
/// Accepts `[...]` or `{"user_stories": [...]}`. An empty list is rejected.
pub fn parse_user_stories(json: &str) -> Result<Vec<UserStory>, CoreError> {
    let doc: StoriesDocument = serde_json::from_str(json)
        .map_err(|e| CoreError::Validation(format!("Invalid user stories JSON: {e}")))?;

    let stories = match doc {
        StoriesDocument::List(stories) => stories,
        StoriesDocument::Wrapped { user_stories } => user_stories,
    };

    if stories.is_empty() {
        return Err(CoreError::Validation(
            "User stories list must not be empty".to_string(),
        ));
    }
    Ok(stories)
}

/// Check a story list for quality issues.
///
/// Returns one human-readable message per issue; an empty vector means the
/// list is clean. Issues are advisory and never block generation.
pub fn validate_user_stories(stories: &[UserStory]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    for story in stories {
        if !seen_ids.insert(story.id) {
            issues.push(format!("Story {}: duplicate id", story.id));
        }
        if story.persona.trim().is_empty() {
            issues.push(format!("Story {}: persona is empty", story.id));
        }
        let text = story.user_story.trim();
        if text.is_empty() {
            issues.push(format!("Story {}: user_story is empty", story.id));
        } else if !text.to_ascii_lowercase().starts_with("as a") {
            issues.push(format!(
                "Story {}: user_story should follow 'As a [persona], I want ...'",
                story.id
            ));
        }
        if story.acceptance_criteria.iter().all(|c| c.trim().is_empty()) {
            issues.push(format!("Story {}: no acceptance criteria", story.id));
        }
    }

    issues
}
