/// Allocate the identifier following the highest numeric id in `ids`.
///
/// Only ids made entirely of ASCII digits take part; anything else is
/// ignored. The result is zero-padded to two digits, so an empty catalog
/// starts at `"01"`.
pub fn next_track_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let max = ids
        .into_iter()
        .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{:02}", max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_starts_at_01() {
        assert_eq!(next_track_id(Vec::<&str>::new()), "01");
    }

    #[test]
    fn increments_the_maximum_not_the_count() {
        assert_eq!(next_track_id(["01", "02", "04"]), "05");
        assert_eq!(next_track_id(["04", "01"]), "05");
    }

    #[test]
    fn ignores_non_numeric_ids() {
        assert_eq!(next_track_id(["01", "intro", "7a", ""]), "02");
    }

    #[test]
    fn grows_past_two_digits() {
        assert_eq!(next_track_id(["09"]), "10");
        assert_eq!(next_track_id(["10", "99"]), "100");
    }
}
