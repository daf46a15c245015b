//! Common validation rules shared across request payloads.

use chrono::{Datelike, NaiveDate, Weekday};
use validator::ValidationError;

pub const MAX_REASON_LENGTH: usize = 500;

/// Validates a free-text reason.
///
/// Requirements:
/// - Not blank
/// - At most 500 characters
pub fn validate_reason(reason: &str) -> Result<(), ValidationError> {
    if reason.trim().is_empty() {
        return Err(ValidationError::new("reason_required"));
    }
    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(ValidationError::new("reason_too_long"));
    }
    Ok(())
}

/// Validates that overtime hours are within (0, 24].
pub fn validate_overtime_hours(hours: f64) -> Result<(), ValidationError> {
    if !(hours > 0.0 && hours <= 24.0) {
        return Err(ValidationError::new("overtime_hours_out_of_range"));
    }
    Ok(())
}

/// Timesheet weeks are keyed by their Monday.
pub fn validate_week_start(week_start: &NaiveDate) -> Result<(), ValidationError> {
    if week_start.weekday() != Weekday::Mon {
        return Err(ValidationError::new("week_start_not_monday"));
    }
    Ok(())
}

/// Returns the trimmed reason when present and valid, `None` when absent or blank.
pub fn required_reason(reason: Option<&str>) -> Option<&str> {
    reason
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.chars().count() <= MAX_REASON_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_rejects_blank() {
        assert!(validate_reason("   ").is_err());
    }

    #[test]
    fn reason_rejects_too_long() {
        assert!(validate_reason(&"x".repeat(501)).is_err());
        assert!(validate_reason(&"x".repeat(500)).is_ok());
    }

    #[test]
    fn overtime_hours_range() {
        assert!(validate_overtime_hours(0.0).is_err());
        assert!(validate_overtime_hours(-1.0).is_err());
        assert!(validate_overtime_hours(24.5).is_err());
        assert!(validate_overtime_hours(f64::NAN).is_err());
        assert!(validate_overtime_hours(8.0).is_ok());
    }

    #[test]
    fn week_start_must_be_monday() {
        assert!(validate_week_start(&NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).is_ok());
        assert!(validate_week_start(&NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()).is_err());
    }

    #[test]
    fn required_reason_trims_and_filters_blank() {
        assert_eq!(required_reason(Some("  insufficient justification ")), Some("insufficient justification"));
        assert_eq!(required_reason(Some("  ")), None);
        assert_eq!(required_reason(None), None);
    }
}
