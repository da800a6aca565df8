//! Column catalogs: which provider fields each dataset keeps, in output order.
//!
//! Catalogs only list statistic columns. Identity and tagging columns
//! (`key_fangraphs`, `Name`, `Season`, `Team`, ...) are owned by the fetcher
//! that builds the table.

/// A named, ordered list of columns to keep from a provider response.
///
/// `required` columns must be present in every response; a missing one is a
/// schema mismatch. `optional` columns are position- or era-specific and are
/// filled with nulls when the provider leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl Catalog {
    /// All catalog columns in declared order, required first.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + use<> {
        let required: &'static [&'static str] = self.required;
        let optional: &'static [&'static str] = self.optional;
        required.iter().chain(optional.iter()).copied()
    }

    /// Number of columns in the catalog.
    pub fn len(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// FanGraphs hitting columns, shared by player and team batting tables.
pub const HITTING: Catalog = Catalog {
    name: "hitting",
    required: &[
        "AB", "PA", "H", "1B", "2B", "3B", "HR", "R", "RBI", "BB", "IBB", "SO", "HBP", "SF", "SH",
        "GDP", "SB", "CS", "AVG", "GB", "FB", "LD", "IFFB", "IFH", "BU", "BUH", "BB%", "K%",
        "BB/K", "OBP", "SLG", "OPS", "ISO", "BABIP", "GB/FB", "LD%", "GB%", "FB%", "IFFB%",
        "HR/FB", "IFH%", "BUH%", "wOBA", "wRAA", "wRC", "WAR", "Spd", "wRC+", "WPA", "-WPA",
        "+WPA", "pLI", "phLI", "PH", "WPA/LI", "Clutch", "O-Swing%", "Z-Swing%", "Swing%",
        "O-Contact%", "Z-Contact%", "Contact%", "Zone%", "SwStr%", "Pace", "wSB", "UBR", "Off",
        "wGDP", "Pull%", "Cent%", "Oppo%", "Soft%", "Med%", "Hard%", "TTO%", "EV", "LA",
        "Barrels", "Barrel%", "maxEV", "HardHit", "HardHit%", "CStr%", "xBA", "xSLG", "xwOBA",
    ],
    optional: &[],
};

/// FanGraphs pitching columns, shared by player and team pitching tables.
pub const PITCHING: Catalog = Catalog {
    name: "pitching",
    required: &[
        "W", "L", "ERA", "CG", "ShO", "SV", "BS", "IP", "TBF", "H", "R", "ER", "HR", "BB", "IBB",
        "BK", "SO", "GB", "FB", "LD", "IFFB", "Balls", "Strikes", "Pitches", "RS", "IFH", "BU",
        "BUH", "K/9", "BB/9", "K/BB", "H/9", "HR/9", "AVG", "WHIP", "BABIP", "LOB%", "FIP",
        "GB/FB", "LD%", "GB%", "FB%", "IFFB%", "HR/FB", "IFH%", "BUH%", "WAR", "tERA", "xFIP",
        "WPA", "-WPA", "+WPA", "pLI", "inLI", "exLI", "Clutch", "FBv", "SLv", "CTv", "CBv",
        "CHv", "SFv", "O-Swing%", "Z-Swing%", "Swing%", "O-Contact%", "Z-Contact%", "Contact%",
        "Zone%", "F-Strike%", "SwStr%", "SD", "MD", "HLD", "ERA-", "FIP-", "xFIP-", "K%", "BB%",
        "SIERA", "RS/9", "E-F", "K-BB%", "Pull%", "Cent%", "Oppo%", "Soft%", "Med%", "Hard%",
        "kwERA", "FRM", "Barrel%", "HardHit%", "CStr%", "CSW%", "xERA",
    ],
    optional: &[],
};

/// FanGraphs player fielding columns. Catcher-only columns are optional.
pub const FIELDING: Catalog = Catalog {
    name: "fielding",
    required: &[
        "Pos", "PO", "A", "E", "FE", "TE", "DP", "DPS", "DPT", "DPF", "FP", "DRS", "Def",
    ],
    optional: FIELDING_CATCHER,
};

/// Position-specific fielding columns only reported for catchers.
pub const FIELDING_CATCHER: &[&str] = &["SB", "CS", "PB", "WP", "rSB"];

/// FanGraphs team fielding layout, identity columns included.
pub const TEAM_FIELDING: Catalog = Catalog {
    name: "team fielding",
    required: &[
        "G", "GS", "Inn", "PO", "A", "E", "FE", "TE", "DP", "Scp", "SB", "CS", "PB", "WP", "FP",
        "rSB", "rGDP", "rARM", "rGFP", "rPM", "DRS", "BIZ", "RZR", "OOZ", "ARM", "DPR", "RngR",
        "ErrR", "UZR", "Def", "FRM", "OAA", "RAA",
    ],
    optional: &[],
};

/// Lahman people columns excluded from biographical tables: death details,
/// raw name parts, career endpoints and alternate registry keys.
pub const DROP_BIO: &[&str] = &[
    "deathYear",
    "deathMonth",
    "deathDay",
    "deathCountry",
    "deathState",
    "deathCity",
    "nameFirst",
    "nameLast",
    "nameGiven",
    "debut",
    "finalGame",
    "retroID",
    "bbrefID",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_unique(catalog: &Catalog) {
        let mut seen = HashSet::new();
        for column in catalog.columns() {
            assert!(
                seen.insert(column),
                "catalog '{}' lists '{}' twice",
                catalog.name,
                column
            );
        }
    }

    #[test]
    fn test_catalogs_have_no_duplicate_columns() {
        for catalog in [&HITTING, &PITCHING, &FIELDING, &TEAM_FIELDING] {
            assert_unique(catalog);
            assert!(!catalog.is_empty());
        }
    }

    #[test]
    fn test_catalog_order_is_declared_order() {
        let first: Vec<&str> = HITTING.columns().take(3).collect();
        assert_eq!(first, vec!["AB", "PA", "H"]);

        let last = PITCHING.columns().last();
        assert_eq!(last, Some("xERA"));
    }

    #[test]
    fn test_fielding_catcher_columns_are_optional() {
        assert_eq!(FIELDING.optional, FIELDING_CATCHER);
        assert!(FIELDING.optional.contains(&"rSB"));
        assert!(!FIELDING.required.contains(&"rSB"));
        assert_eq!(FIELDING.len(), 18);
    }

    #[test]
    fn test_catalogs_exclude_identity_columns() {
        for catalog in [&HITTING, &PITCHING, &FIELDING, &TEAM_FIELDING] {
            for identity in ["IDfg", "key_fangraphs", "Name", "Season", "Team"] {
                assert!(catalog.columns().all(|column| column != identity));
            }
        }
    }

    #[test]
    fn test_drop_bio_covers_death_and_alternate_keys() {
        assert!(DROP_BIO.contains(&"deathYear"));
        assert!(DROP_BIO.contains(&"retroID"));
        assert!(DROP_BIO.contains(&"bbrefID"));
        assert!(!DROP_BIO.contains(&"birthYear"));
    }
}
