use std::sync::LazyLock;

use regex::Regex;

use super::ApiErr;

/// Lowercase slug, matching the `about_content.section` column width.
static SECTION_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9_-]{0,99}$").expect("valid section regex")
});

pub fn validate_id(id: i32) -> Result<i32, ApiErr> {
    if id <= 0 {
        return Err(ApiErr::validation(format!(
            "Invalid id: {id}. Id must be a positive integer"
        )));
    }
    Ok(id)
}

/// Required text field: must contain something other than whitespace.
pub fn validate_required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiErr> {
    if value.trim().is_empty() {
        return Err(ApiErr::validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

/// Same as [`validate_required`], for fields of a partial update.
pub fn validate_optional(field: &str, value: Option<&str>) -> Result<(), ApiErr> {
    if let Some(v) = value {
        validate_required(field, v)?;
    }
    Ok(())
}

pub fn validate_rating(rating: i32) -> Result<i32, ApiErr> {
    if !(1..=5).contains(&rating) {
        return Err(ApiErr::validation(format!(
            "Invalid rating: {rating}. Rating must be between 1 and 5"
        )));
    }
    Ok(rating)
}

pub fn validate_section_key(section: &str) -> Result<&str, ApiErr> {
    if !SECTION_KEY.is_match(section) {
        return Err(ApiErr::validation(
            "Section key may only contain lowercase letters, digits, '-' and '_' (max 100)",
        ));
    }
    Ok(section)
}
