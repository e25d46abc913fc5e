//! Language code validation.
//!
//! Valid language codes:
//! - Must be non-empty and lowercase ASCII
//! - First subtag is 2 or 3 letters
//! - Following subtags are 1 to 8 letters or digits, separated by `-`
//!
//! This accepts the codes Wikibase ships with (`en`, `de-ch`, `be-tarask`,
//! `zh-hans`, ...). Installations that need a closed list layer an allowlist
//! on top of this check.

use crate::error::{Result, TypeError};

/// Validate a language code, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use wb_types::validate_language_code;
///
/// assert!(validate_language_code("en").is_ok());
/// assert!(validate_language_code("be-tarask").is_ok());
/// assert!(validate_language_code("").is_err());
/// assert!(validate_language_code("invalid-language-code").is_err());
/// ```
pub fn validate_language_code(code: &str) -> Result<()> {
    let fail = |reason: &str| {
        Err(TypeError::InvalidLanguageCode {
            code: code.to_string(),
            reason: reason.to_string(),
        })
    };

    if code.is_empty() {
        return fail("language code must not be empty");
    }

    let mut subtags = code.split('-');

    // `split` always yields at least one item.
    let primary = subtags.next().unwrap_or_default();
    if !(2..=3).contains(&primary.len()) || !primary.bytes().all(|b| b.is_ascii_lowercase()) {
        return fail("primary subtag must be 2 or 3 lowercase letters");
    }

    for subtag in subtags {
        if subtag.is_empty() || subtag.len() > 8 {
            return fail("subtags must be 1 to 8 characters long");
        }
        if !subtag
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return fail("subtags may only contain lowercase letters and digits");
        }
    }

    Ok(())
}

/// Returns `true` if `code` is a well-formed language code.
pub fn is_valid_language_code(code: &str) -> bool {
    validate_language_code(code).is_ok()
}
