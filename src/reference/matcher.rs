//! Free-text food name matching
//!
//! Maps a name coming from the image analysis service (e.g. "Arroz branco,
//! cozido") onto a record of the reference table.

use crate::models::FoodRecord;

/// Resolves a free-text food name against a set of reference foods
pub trait FoodMatcher: Send + Sync {
    fn find<'a>(&self, name: &str, foods: &'a [FoodRecord]) -> Option<&'a FoodRecord>;
}

/// Matches on the text before the first comma.
///
/// The name is trimmed and lower-cased; the first food whose lower-cased name
/// contains that leading segment wins. Only the leading segment is compared,
/// so "Feijão preto, cozido" can resolve to any "feijão preto" record and a
/// generic name may resolve to an unrelated record that happens to contain it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSegmentMatcher;

impl FoodMatcher for FirstSegmentMatcher {
    fn find<'a>(&self, name: &str, foods: &'a [FoodRecord]) -> Option<&'a FoodRecord> {
        let normalized = name.trim().to_lowercase();
        let segment = normalized.split(',').next().unwrap_or_default();

        // "", ", cozido" and similar would otherwise match every record
        if segment.trim().is_empty() {
            return None;
        }

        foods.iter().find(|f| f.name.to_lowercase().contains(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::FoodTable;

    fn find(name: &str) -> Option<i64> {
        let table = FoodTable::builtin();
        FirstSegmentMatcher.find(name, table.all()).map(|f| f.id)
    }

    #[test]
    fn test_matches_leading_segment() {
        assert_eq!(find("Arroz"), Some(1));
        assert_eq!(find("  FEIJÃO, preto, cozido "), Some(2));
        assert_eq!(find("salmão"), Some(16));
    }

    #[test]
    fn test_first_match_in_table_order() {
        // "o" appears in many names; the lowest id wins
        assert_eq!(find("o"), Some(1));
    }

    #[test]
    fn test_segment_must_be_contained() {
        // The table writes "Arroz, branco", so "arroz branco" is not a substring
        assert_eq!(find("Arroz branco, cozido"), None);
        assert_eq!(find("Pizza, calabresa"), None);
    }

    #[test]
    fn test_empty_segment_matches_nothing() {
        assert_eq!(find(""), None);
        assert_eq!(find("   "), None);
        assert_eq!(find(", cozido"), None);
    }

    #[test]
    fn test_empty_pool() {
        assert!(FirstSegmentMatcher.find("Arroz", &[]).is_none());
    }
}
