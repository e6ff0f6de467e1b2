// validate.rs — Field validation for goal and milestone input.
//
// Bounds are enforced here explicitly rather than left to any backend
// limit, so the accepted inputs are the same on every substrate. Length
// checks count characters, not bytes: titles are ASCII (so the two agree),
// descriptions are UTF-8.

use crate::error::LedgerError;
use crate::goal::GoalDraft;

/// Maximum title length in characters. Titles are ASCII-only.
pub const MAX_TITLE_CHARS: usize = 64;

/// Maximum description length in characters (UTF-8).
pub const MAX_DESCRIPTION_CHARS: usize = 256;

/// Priority range: 1 is the most urgent.
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

fn invalid(field: &'static str, reason: impl Into<String>) -> LedgerError {
    LedgerError::Validation {
        field,
        reason: reason.into(),
    }
}

/// Check a title field: non-empty, ASCII, at most [`MAX_TITLE_CHARS`].
pub fn validate_title(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if !value.is_ascii() {
        return Err(invalid(field, "must be ASCII"));
    }
    if value.len() > MAX_TITLE_CHARS {
        return Err(invalid(
            field,
            format!("must be at most {MAX_TITLE_CHARS} characters"),
        ));
    }
    Ok(())
}

/// Check a description field: non-empty, at most [`MAX_DESCRIPTION_CHARS`]
/// characters of UTF-8.
pub fn validate_description(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if value.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(invalid(
            field,
            format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
        ));
    }
    Ok(())
}

/// Validate a full goal draft against the current block height.
///
/// The same checks apply on creation and update; a deadline always has to
/// be in the future relative to the height the operation runs at.
pub fn validate_goal_draft(draft: &GoalDraft, current_height: u64) -> Result<(), LedgerError> {
    validate_title("title", &draft.title)?;
    validate_description("description", &draft.description)?;

    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&draft.priority) {
        return Err(invalid(
            "priority",
            format!("must be between {MIN_PRIORITY} and {MAX_PRIORITY}"),
        ));
    }

    if let Some(deadline) = draft.deadline {
        if deadline <= current_height {
            return Err(invalid(
                "deadline",
                format!("must be after the current block height {current_height}"),
            ));
        }
    }

    if draft.weight == 0 {
        return Err(invalid("weight", "must be positive"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> GoalDraft {
        GoalDraft {
            title: "Learn Rust".to_string(),
            description: "Work through the ownership chapters".to_string(),
            deadline: Some(100),
            priority: 1,
            category: None,
            weight: 50,
        }
    }

    fn field_of(err: LedgerError) -> &'static str {
        match err {
            LedgerError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_a_well_formed_draft() {
        assert!(validate_goal_draft(&draft(), 10).is_ok());
    }

    #[test]
    fn title_must_be_non_empty_ascii_and_bounded() {
        assert_eq!(field_of(validate_title("title", "").unwrap_err()), "title");
        assert_eq!(
            field_of(validate_title("title", "café plans").unwrap_err()),
            "title"
        );

        let exactly_64 = "x".repeat(MAX_TITLE_CHARS);
        assert!(validate_title("title", &exactly_64).is_ok());

        let one_over = "x".repeat(MAX_TITLE_CHARS + 1);
        assert_eq!(field_of(validate_title("title", &one_over).unwrap_err()), "title");
    }

    #[test]
    fn description_is_bounded_in_characters_not_bytes() {
        assert_eq!(
            field_of(validate_description("description", "").unwrap_err()),
            "description"
        );

        // 256 multibyte characters are within bounds even though the byte
        // count is far larger.
        let exactly_256 = "é".repeat(MAX_DESCRIPTION_CHARS);
        assert!(validate_description("description", &exactly_256).is_ok());

        let one_over = "é".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert_eq!(
            field_of(validate_description("description", &one_over).unwrap_err()),
            "description"
        );
    }

    #[test]
    fn priority_bounds_are_inclusive() {
        let mut d = draft();
        d.priority = MIN_PRIORITY;
        assert!(validate_goal_draft(&d, 10).is_ok());
        d.priority = MAX_PRIORITY;
        assert!(validate_goal_draft(&d, 10).is_ok());

        d.priority = 0;
        assert_eq!(field_of(validate_goal_draft(&d, 10).unwrap_err()), "priority");
        d.priority = MAX_PRIORITY + 1;
        assert_eq!(field_of(validate_goal_draft(&d, 10).unwrap_err()), "priority");
    }

    #[test]
    fn deadline_must_be_strictly_future() {
        let mut d = draft();
        d.deadline = Some(10);
        assert_eq!(field_of(validate_goal_draft(&d, 10).unwrap_err()), "deadline");

        d.deadline = Some(11);
        assert!(validate_goal_draft(&d, 10).is_ok());

        // No deadline is always fine.
        d.deadline = None;
        assert!(validate_goal_draft(&d, 10).is_ok());
    }

    #[test]
    fn weight_must_be_positive() {
        let mut d = draft();
        d.weight = 0;
        assert_eq!(field_of(validate_goal_draft(&d, 10).unwrap_err()), "weight");
    }
}
