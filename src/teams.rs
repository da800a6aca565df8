//! FanGraphs team index to team abbreviation mapping.
//!
//! FanGraphs filters team queries by a numeric index. The order has been
//! stable since the 1998 expansion; the abbreviations are the modern ones
//! (e.g. index 20 is `MIA` even for the Florida Marlins years). Sources that
//! use era codes are normalized with [`current_abbreviation`].

/// The 30 FanGraphs team indices with their 3-letter abbreviations.
pub const FANGRAPHS_TEAMS: [(u8, &str); 30] = [
    (1, "LAA"),
    (2, "BAL"),
    (3, "BOS"),
    (4, "CHW"),
    (5, "CLE"),
    (6, "DET"),
    (7, "KCR"),
    (8, "MIN"),
    (9, "NYY"),
    (10, "OAK"),
    (11, "SEA"),
    (12, "TBR"),
    (13, "TEX"),
    (14, "TOR"),
    (15, "ARI"),
    (16, "ATL"),
    (17, "CHC"),
    (18, "CIN"),
    (19, "COL"),
    (20, "MIA"),
    (21, "HOU"),
    (22, "LAD"),
    (23, "MIL"),
    (24, "WSN"),
    (25, "NYM"),
    (26, "PHI"),
    (27, "PIT"),
    (28, "STL"),
    (29, "SDP"),
    (30, "SFG"),
];

/// Returns the abbreviation for a FanGraphs team index, `None` outside `1..=30`.
pub fn team_abbreviation(index: u8) -> Option<&'static str> {
    FANGRAPHS_TEAMS
        .iter()
        .find(|(i, _)| *i == index)
        .map(|(_, abbreviation)| *abbreviation)
}

/// Baseball-Reference codes used by franchises before they took their
/// current name, paired with the current abbreviation.
const ERA_CODES: [(&str, &str); 4] = [
    ("ANA", "LAA"),
    ("FLA", "MIA"),
    ("MON", "WSN"),
    ("TBD", "TBR"),
];

/// Maps an era-specific team code to the franchise's current abbreviation.
/// Codes that are already current pass through unchanged.
pub fn current_abbreviation(code: &str) -> &str {
    ERA_CODES
        .iter()
        .find(|(era, _)| *era == code)
        .map_or(code, |(_, current)| *current)
}

/// All team indices in ascending order. Used as the fan-out enumeration for
/// team-scoped provider queries.
pub fn team_indices() -> impl Iterator<Item = u8> {
    FANGRAPHS_TEAMS.iter().map(|(index, _)| *index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_map_is_total_over_known_indices() {
        for index in 1..=30u8 {
            assert!(
                team_abbreviation(index).is_some(),
                "index {index} should map to a team"
            );
        }
        assert_eq!(team_abbreviation(0), None);
        assert_eq!(team_abbreviation(31), None);
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes: HashSet<&str> = team_indices().filter_map(team_abbreviation).collect();
        assert_eq!(codes.len(), 30);
        assert!(codes.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn test_mapping_is_stable_across_calls() {
        let first: Vec<_> = team_indices().map(team_abbreviation).collect();
        let second: Vec<_> = team_indices().map(team_abbreviation).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_era_codes_map_to_current_franchise() {
        assert_eq!(current_abbreviation("MON"), "WSN");
        assert_eq!(current_abbreviation("FLA"), "MIA");
        assert_eq!(current_abbreviation("TBD"), "TBR");
        assert_eq!(current_abbreviation("ANA"), "LAA");
        assert_eq!(current_abbreviation("NYY"), "NYY");

        let current: HashSet<&str> = team_indices().filter_map(team_abbreviation).collect();
        for (_, code) in ERA_CODES {
            assert!(current.contains(code));
        }
    }

    #[test]
    fn test_known_entries() {
        assert_eq!(team_abbreviation(1), Some("LAA"));
        assert_eq!(team_abbreviation(12), Some("TBR"));
        assert_eq!(team_abbreviation(30), Some("SFG"));
        assert_eq!(team_indices().count(), 30);
        assert!(team_indices().zip(team_indices().skip(1)).all(|(a, b)| a < b));
    }
}
