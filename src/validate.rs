//! Input-shape rules shared by every screen.
//!
//! The store accepts anything; these checks run on raw prompt text before a
//! value is handed to it.

use crate::error::InputError;

/// Accept a track id typed by the user.
///
/// Rules: non-empty, ASCII digits only, and a single digit must be the
/// leading `0` of a padded id (`"1"` is rejected, `"01"` is fine).
pub fn track_id(input: &str) -> Result<&str, InputError> {
    let id = input.trim();
    if id.is_empty() {
        return Err(InputError::EmptyTrackId);
    }
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NonNumericTrackId);
    }
    if id.len() == 1 && id != "0" {
        return Err(InputError::MissingLeadingZero);
    }
    Ok(id)
}

/// Accept a rating from 1 to 5.
pub fn rating(input: &str) -> Result<u32, InputError> {
    let value = input.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::RatingOutOfRange);
    }
    match value.parse::<u32>() {
        Ok(r) if (1..=5).contains(&r) => Ok(r),
        _ => Err(InputError::RatingOutOfRange),
    }
}

/// Accept a rename: both fields must be non-blank.
pub fn name_and_artist<'a>(name: &'a str, artist: &'a str) -> Result<(&'a str, &'a str), InputError> {
    let (name, artist) = (name.trim(), artist.trim());
    if name.is_empty() || artist.is_empty() {
        return Err(InputError::EmptyNameOrArtist);
    }
    Ok((name, artist))
}

/// Accept a remote search query.
pub fn search_query(input: &str) -> Result<&str, InputError> {
    let query = input.trim();
    if query.is_empty() {
        return Err(InputError::EmptyQuery);
    }
    Ok(query)
}

/// Whether `c` may be typed into a numeric prompt.
pub fn is_numeric_keystroke(c: char) -> bool {
    c.is_ascii_digit()
}
