//! Column names shared by every stage of the merge.
//!
//! Source files are matched by exact (case-sensitive) header names, so these
//! constants are the compatibility contract with existing survey exports.

/// Subject identifier; the join key across diary, trait, and network data.
pub const ID: &str = "ID";
/// Dorm code of the subject at the time of the diary entry.
pub const DORM: &str = "Dorm";
/// Diary day number.
pub const DAY: &str = "Day";
/// Event polarity extracted from wide column names.
pub const VALENCE: &str = "Valence";
/// Event number extracted from wide column names.
pub const EVENT_NUM: &str = "EventNum";
/// Measurement occasion in the trait table.
pub const TIME: &str = "time";
/// Total dormmates told about an event.
pub const NUM_DRM_TLD: &str = "NumDrmTld";
/// 1 when at least one dormmate was told, 0 otherwise.
pub const GOT_HELP: &str = "GotHelp";

/// Identifier columns carried through the diary melt.
pub const DIARY_ID_COLUMNS: [&str; 3] = [ID, DORM, DAY];

/// Composite key of a long-form event row.
pub const EVENT_KEY_COLUMNS: [&str; 5] = [ID, DORM, DAY, VALENCE, EVENT_NUM];

/// Number of dormmate slots recorded per event.
pub const DISCLOSURE_SLOTS: u8 = 5;

/// Value column name for a dormmate disclosure slot (`TldDrm1`..`TldDrm5`).
pub fn disclosure_column(slot: u8) -> String {
    format!("TldDrm{slot}")
}

/// All disclosure value columns in slot order.
pub fn disclosure_columns() -> Vec<String> {
    (1..=DISCLOSURE_SLOTS).map(disclosure_column).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disclosure_columns_are_numbered_from_one() {
        assert_eq!(
            disclosure_columns(),
            vec!["TldDrm1", "TldDrm2", "TldDrm3", "TldDrm4", "TldDrm5"]
        );
    }

    #[test]
    fn event_key_extends_diary_ids() {
        assert_eq!(&EVENT_KEY_COLUMNS[..3], &DIARY_ID_COLUMNS[..]);
    }
}
