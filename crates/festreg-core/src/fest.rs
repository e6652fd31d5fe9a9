// Sub-fest categories, per-student quotas, and event id derivation

/// Canonical sub-fest identifiers. Events may carry other values; the
/// quota lookup falls back to [`DEFAULT_QUOTA`] for anything unrecognized.
pub const CULTURAL: &str = "CULTURAL-AKANKSHA";
pub const SPORTS: &str = "SPORTS-AHWAAN";
pub const TECHNOLOGY: &str = "TECHNOLOGY-ANWESH";

/// Quota applied to sub-fest values outside the fixed table.
pub const DEFAULT_QUOTA: u32 = 2;

/// Maximum number of events one student may register for within the given
/// sub-fest. Matches on the category prefix so that renamed editions
/// (e.g. a future `SPORTS-*`) keep their quota without a code change.
pub fn quota_for(sub_fest: &str) -> u32 {
    let upper = sub_fest.to_ascii_uppercase();
    if upper.starts_with("TECHNOLOGY") {
        2
    } else if upper.starts_with("CULTURAL") {
        2
    } else if upper.starts_with("SPORTS") {
        4
    } else {
        DEFAULT_QUOTA
    }
}

/// Deterministic event id: lowercased `sub_fest-name` with whitespace runs
/// collapsed to single dashes. Two events with the same sub-fest and name
/// map to the same id, which is what makes duplicate creation a conflict.
pub fn event_id(sub_fest: &str, name: &str) -> String {
    format!("{sub_fest}-{name}")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_table() {
        assert_eq!(quota_for(TECHNOLOGY), 2);
        assert_eq!(quota_for(CULTURAL), 2);
        assert_eq!(quota_for(SPORTS), 4);
    }

    #[test]
    fn test_quota_prefix_match_is_case_insensitive() {
        assert_eq!(quota_for("sports-ahwaan"), 4);
        assert_eq!(quota_for("Sports-2027"), 4);
        assert_eq!(quota_for("cultural-next"), 2);
    }

    #[test]
    fn test_quota_default_for_unrecognized() {
        assert_eq!(quota_for("LITERARY-KALAM"), DEFAULT_QUOTA);
        assert_eq!(quota_for(""), DEFAULT_QUOTA);
    }

    #[test]
    fn test_event_id_slug() {
        assert_eq!(
            event_id(CULTURAL, "Solo Dance"),
            "cultural-akanksha-solo-dance"
        );
        assert_eq!(event_id(SPORTS, "Chess"), "sports-ahwaan-chess");
    }

    #[test]
    fn test_event_id_collapses_whitespace() {
        assert_eq!(
            event_id(TECHNOLOGY, "  Robo   Race "),
            "technology-anwesh-robo-race"
        );
    }

    #[test]
    fn test_event_id_is_deterministic() {
        assert_eq!(
            event_id(CULTURAL, "Group Song"),
            event_id(CULTURAL, "Group Song")
        );
    }
}
