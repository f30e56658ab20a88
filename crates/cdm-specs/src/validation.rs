//! Value checks shared by the desired-state types
//!
//! These are simple enum and shape checks; the appliance remains the
//! authority on anything deeper.

use crate::error::SpecError;

/// Timezones the appliance accepts for its cluster setting
pub const SUPPORTED_TIMEZONES: &[&str] = &[
    "America/Anchorage",
    "America/Araguaina",
    "America/Barbados",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Mexico_City",
    "America/New_York",
    "America/Noronha",
    "America/Phoenix",
    "America/Toronto",
    "America/Vancouver",
    "Asia/Bangkok",
    "Asia/Dhaka",
    "Asia/Dubai",
    "Asia/Hong_Kong",
    "Asia/Karachi",
    "Asia/Kathmandu",
    "Asia/Kolkata",
    "Asia/Magadan",
    "Asia/Singapore",
    "Asia/Tokyo",
    "Atlantic/Cape_Verde",
    "Australia/Perth",
    "Australia/Sydney",
    "Europe/Amsterdam",
    "Europe/Athens",
    "Europe/London",
    "Europe/Moscow",
    "Pacific/Auckland",
    "Pacific/Honolulu",
    "Pacific/Midway",
    "UTC",
];

/// AWS regions accepted for S3 archival locations
pub const AWS_REGIONS: &[&str] = &[
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "cn-north-1",
    "cn-northwest-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "sa-east-1",
    "us-gov-west-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

pub fn non_empty(field: &str, value: &str) -> Result<(), SpecError> {
    if value.trim().is_empty() {
        return Err(SpecError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Check that `value` is one of `allowed`
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), SpecError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(SpecError::validation(
            field,
            format!("'{}' is not one of: {}", value, allowed.join(", ")),
        ))
    }
}

pub fn timezone(field: &str, value: &str) -> Result<(), SpecError> {
    one_of(field, value, SUPPORTED_TIMEZONES)
}

pub fn aws_region(field: &str, value: &str) -> Result<(), SpecError> {
    one_of(field, value, AWS_REGIONS)
}

/// Hostnames and IP addresses: non-empty, no whitespace
pub fn hostname(field: &str, value: &str) -> Result<(), SpecError> {
    non_empty(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(SpecError::validation(field, format!("'{}' contains whitespace", value)));
    }
    Ok(())
}

/// S3 bucket names: 3 to 63 characters of lowercase letters, digits, `-` and `.`
pub fn bucket_name(field: &str, value: &str) -> Result<(), SpecError> {
    if !(3..=63).contains(&value.len()) {
        return Err(SpecError::validation(field, "must be between 3 and 63 characters"));
    }
    if value.contains('_') {
        return Err(SpecError::validation(field, "must not contain underscores"));
    }
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    if !valid {
        return Err(SpecError::validation(
            field,
            "may only contain lowercase letters, digits, '-' and '.'",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timezone_must_be_supported() {
        assert!(timezone("cluster.timezone", "America/Chicago").is_ok());
        assert!(timezone("cluster.timezone", "UTC").is_ok());
        let err = timezone("cluster.timezone", "Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("cluster.timezone"));
    }

    #[test]
    fn test_bucket_name_rules() {
        assert!(bucket_name("b", "backup-archive.01").is_ok());
        assert!(bucket_name("b", "ab").is_err());
        assert!(bucket_name("b", "my_bucket").is_err());
        assert!(bucket_name("b", "MyBucket").is_err());
    }

    #[test]
    fn test_hostname_rejects_blank_and_whitespace() {
        assert!(hostname("h", "db01.lab").is_ok());
        assert!(hostname("h", "  ").is_err());
        assert!(hostname("h", "db 01").is_err());
    }

    #[test]
    fn test_region_list() {
        assert!(aws_region("r", "eu-west-2").is_ok());
        assert!(aws_region("r", "moon-1").is_err());
    }
}
