//! Generation request types and validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a problem statement in characters.
pub const MAX_PROBLEM_STATEMENT_LENGTH: usize = 10_000;

/// Maximum length of a project name in characters.
pub const MAX_PROJECT_NAME_LENGTH: usize = 64;

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /api/v1/generate`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationRequest {
    /// Description of the business problem to solve.
    pub problem_statement: String,
    /// Optional project name used to label artifacts.
    pub project_name: Option<String>,
}

impl GenerationRequest {
    /// Validate and normalise the request.
    ///
    /// The problem statement is trimmed; a blank project name is treated
    /// as absent.
    pub fn validated(self) -> Result<Self, CoreError> {
        let problem_statement = self.problem_statement.trim().to_string();
        validate_problem_statement(&problem_statement)?;

        let project_name = match self.project_name.map(|n| n.trim().to_string()) {
            Some(name) if name.is_empty() => None,
            Some(name) => {
                validate_project_name(&name)?;
                Some(name)
            }
            None => None,
        };

        Ok(Self {
            problem_statement,
            project_name,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Problem statements must be non-empty and within the length limit.
pub fn validate_problem_statement(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Problem statement must not be empty".to_string(),
        ));
    }
    let len = text.chars().count();
    if len > MAX_PROBLEM_STATEMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Problem statement exceeds maximum length of {MAX_PROBLEM_STATEMENT_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

/// Project names are short slugs of letters, digits, `_` and `-`.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    if name.len() > MAX_PROJECT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project name exceeds maximum length of {MAX_PROJECT_NAME_LENGTH} characters (got {})",
            name.len()
        )));
    }
    if !PROJECT_NAME_RE.is_match(name) {
        return Err(CoreError::Validation(format!(
            "Project name '{name}' may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Examples
// ---------------------------------------------------------------------------

/// A ready-made business problem offered to new users.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleProblem {
    pub name: &'static str,
    pub problem_statement: &'static str,
}

/// Example business problems served by `GET /api/v1/examples`.
pub const EXAMPLE_PROBLEMS: [ExampleProblem; 3] = [
    ExampleProblem {
        name: "Employee Onboarding",
        problem_statement: "We need a tool to help our company's new hires get up to speed. \
            New employees often feel overwhelmed in their first weeks.",
    },
    ExampleProblem {
        name: "Customer Support",
        problem_statement: "We need a customer support ticketing system that helps our \
            support team manage inquiries efficiently.",
    },
    ExampleProblem {
        name: "Project Management",
        problem_statement: "We need a lightweight project management tool for small teams \
            to track tasks and deadlines.",
    },
];

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request(problem: &str, project: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            problem_statement: problem.to_string(),
            project_name: project.map(str::to_string),
        }
    }

    #[test]
    fn valid_request_is_trimmed() {
        let req = request("  Track water intake  ", Some("hydrate_app"))
            .validated()
            .unwrap();
        assert_eq!(req.problem_statement, "Track water intake");
        assert_eq!(req.project_name.as_deref(), Some("hydrate_app"));
    }

    #[test]
    fn blank_problem_rejected() {
        let err = request("   ", None).validated().unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn too_long_problem_rejected() {
        let long = "x".repeat(MAX_PROBLEM_STATEMENT_LENGTH + 1);
        assert_matches!(validate_problem_statement(&long), Err(CoreError::Validation(_)));
    }

    #[test]
    fn boundary_problem_length_passes() {
        let exact = "x".repeat(MAX_PROBLEM_STATEMENT_LENGTH);
        assert!(validate_problem_statement(&exact).is_ok());
    }

    #[test]
    fn blank_project_name_becomes_none() {
        let req = request("X", Some("  ")).validated().unwrap();
        assert!(req.project_name.is_none());
    }

    #[test]
    fn project_name_with_spaces_rejected() {
        let err = request("X", Some("my project")).validated().unwrap_err();
        assert!(err.to_string().contains("may only contain"));
    }

    #[test]
    fn project_name_too_long_rejected() {
        let name = "a".repeat(MAX_PROJECT_NAME_LENGTH + 1);
        assert_matches!(validate_project_name(&name), Err(CoreError::Validation(_)));
    }

    #[test]
    fn examples_are_valid_requests() {
        for example in EXAMPLE_PROBLEMS {
            assert!(validate_problem_statement(example.problem_statement).is_ok());
        }
    }
}
