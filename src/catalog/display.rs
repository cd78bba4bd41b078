use super::model::TrackRecord;

/// The list line shown for a record on the library screen.
pub fn list_line(record: &TrackRecord, stars: bool) -> String {
    format!(
        "Name: {}, Singer: {}, Rating: {}",
        record.name,
        record.artist,
        format_rating(record.rating, stars)
    )
}

/// Render a rating either as a number or as five stars.
///
/// Values above five are shown as numbers even in star mode, since the
/// store does not clamp them.
pub fn format_rating(rating: u32, stars: bool) -> String {
    if !stars || rating > 5 {
        return rating.to_string();
    }
    let filled = rating as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
