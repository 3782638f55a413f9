//! Task prompts for each generation stage.

/// Longest PRD excerpt handed to the architect, in characters.
pub const PRD_EXCERPT_CHARS: usize = 4_000;

/// Stage 1: user stories from the business problem.
pub fn user_stories_task(problem_statement: &str) -> String {
    format!(
        "Business problem:\n{problem_statement}\n\n\
         Create 5-7 user stories for this problem. Format each story as \
         \"As a [persona], I want [goal], so that [benefit]\" and include \
         acceptance criteria for each story."
    )
}

/// Stage 2: PRD from the user stories.
pub fn prd_task(problem_statement: &str, user_stories_json: &str) -> String {
    format!(
        "Business problem:\n{problem_statement}\n\n\
         User stories:\n{user_stories_json}\n\n\
         Create a comprehensive PRD titled \"# Product Requirements Document\" with \
         these sections:\n\
         ## Introduction\n## User Personas\n## Features / User Stories\n\
         ## Success Metrics\n## Out of Scope\n\n\
         Make it professional and production-ready."
    )
}

/// Stage 3: database schema from the PRD.
pub fn schema_task(prd: &str) -> String {
    format!(
        "Design a normalized SQL database schema for this PRD:\n{}\n\n\
         Include every table the features need, with primary keys, foreign keys \
         and constraints.",
        prd_excerpt(prd)
    )
}

/// Ask the reviewer to judge a draft.
pub fn review_task(deliverable: &str, draft: &str) -> String {
    format!(
        "Review this {deliverable} for completeness and quality.\n\n{draft}\n\n\
         Reply APPROVED if it is ready, otherwise list the changes needed."
    )
}

/// Ask the author to revise after reviewer feedback.
pub fn revision_task(feedback: &str) -> String {
    format!(
        "The QualityReviewer requested changes:\n{feedback}\n\n\
         Revise your deliverable to address the feedback and reply with the complete \
         updated version in the same format."
    )
}

/// The first [`PRD_EXCERPT_CHARS`] characters of the PRD, marked when cut.
fn prd_excerpt(prd: &str) -> String {
    if prd.chars().count() <= PRD_EXCERPT_CHARS {
        return prd.to_string();
    }
    let mut excerpt: String = prd.chars().take(PRD_EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
