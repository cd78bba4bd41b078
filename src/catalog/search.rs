/// Fuzzy/subsequence match: return the character positions in `text`
/// that match `query` (ASCII case-insensitive), or `None` if not matched.
///
/// An empty query matches everything with no highlighted positions.
pub fn fuzzy_match_positions(text: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut text_iter = text.chars().enumerate();

    for qc in query.chars() {
        let qc_low = qc.to_ascii_lowercase();
        loop {
            match text_iter.next() {
                Some((ti, tc)) if tc.to_ascii_lowercase() == qc_low => {
                    positions.push(ti);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_match_simple() {
        let title = "Hello World";
        assert!(fuzzy_match_positions(title, "hw").is_some());
        assert!(fuzzy_match_positions(title, "ello").is_some());
        assert!(fuzzy_match_positions(title, "xyz").is_none());
    }

    #[test]
    fn positions_point_at_matched_chars() {
        assert_eq!(
            fuzzy_match_positions("Artist X - Song A", "xsa"),
            Some(vec![7, 11, 16])
        );
    }

    #[test]
    fn letters_must_appear_in_order() {
        assert!(fuzzy_match_positions("Metallica - Blackened", "mtbk").is_some());
        assert!(fuzzy_match_positions("Black Sabbath - Paranoid", "mtbk").is_none());
    }
}
