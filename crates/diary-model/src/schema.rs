//! Typed view of the wide diary header.
//!
//! Diary exports encode the measured variable, the event polarity, the event
//! number and (for disclosure counts) the dormmate slot in each column name:
//!
//! - `PosEv1_Cat` / `NegEv2_Cat`: event category
//! - `PosEv1_Emo` / `NegEv2_Emo`: emotion rating
//! - `DrmPsEvTld1_3` / `DrmNgEvTld2_5`: whether dormmate 3 / 5 was told
//!
//! Headers are parsed once into [`EventColumn`]s and the reshape step works
//! from those instead of re-matching strings.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::columns::{DISCLOSURE_SLOTS, disclosure_column};

static CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<Valence>Pos|Neg)Ev(?P<EventNum>\d)_Cat").expect("Invalid category regex")
});

static EMO_RATING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<Valence>Pos|Neg)Ev(?P<EventNum>\d)_Emo").expect("Invalid emotion regex")
});

/// One pattern per dormmate slot; index 0 is slot 1.
static DISCLOSURE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=DISCLOSURE_SLOTS)
        .map(|slot| {
            Regex::new(&format!(
                r"^Drm(?P<Valence>Ps|Ng)EvTld(?P<EventNum>[123])_{slot}"
            ))
            .expect("Invalid disclosure regex")
        })
        .collect()
});

/// Polarity of a diary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Valence {
    Positive,
    Negative,
}

impl Valence {
    /// Long label used in the merged output (`Pos` / `Neg`).
    pub fn label(self) -> &'static str {
        match self {
            Valence::Positive => "Pos",
            Valence::Negative => "Neg",
        }
    }

    /// Abbreviated label used by disclosure column names (`Ps` / `Ng`).
    pub fn short_label(self) -> &'static str {
        match self {
            Valence::Positive => "Ps",
            Valence::Negative => "Ng",
        }
    }

    /// Parses the long label (`Pos` / `Neg`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Pos" => Some(Valence::Positive),
            "Neg" => Some(Valence::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Valence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rewrites abbreviated valence labels to the long form.
///
/// Long labels and unrecognized values pass through untouched, so applying
/// this more than once is the same as applying it once.
pub fn normalize_valence(label: &str) -> String {
    match label {
        "Ps" => Valence::Positive.label().to_string(),
        "Ng" => Valence::Negative.label().to_string(),
        other => other.to_string(),
    }
}

/// A repeated-measure variable family in the wide diary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VariableFamily {
    /// Event category (`PosEv1_Cat`).
    Category,
    /// Emotion rating (`PosEv1_Emo`).
    EmoRating,
    /// Whether a given dormmate (1-based slot) was told (`DrmPsEvTld1_3`).
    Disclosure(u8),
}

impl VariableFamily {
    /// Every family in join order: category, emotion, then slots 1 to 5.
    pub fn all() -> Vec<Self> {
        let mut families = vec![VariableFamily::Category, VariableFamily::EmoRating];
        families.extend((1..=DISCLOSURE_SLOTS).map(VariableFamily::Disclosure));
        families
    }

    /// Name of the long-form value column produced for this family.
    pub fn value_column(self) -> String {
        match self {
            VariableFamily::Category => "Category".to_string(),
            VariableFamily::EmoRating => "EmoRating".to_string(),
            VariableFamily::Disclosure(slot) => disclosure_column(slot),
        }
    }

    /// Column-name pattern with `Valence` and `EventNum` capture groups.
    ///
    /// Returns `None` for a disclosure slot outside the recorded range.
    pub fn pattern(self) -> Option<&'static Regex> {
        match self {
            VariableFamily::Category => Some(&*CATEGORY_PATTERN),
            VariableFamily::EmoRating => Some(&*EMO_RATING_PATTERN),
            VariableFamily::Disclosure(slot) => {
                let index = usize::from(slot).checked_sub(1)?;
                DISCLOSURE_PATTERNS.get(index)
            }
        }
    }

    /// Parses a header into an [`EventColumn`] of this family.
    ///
    /// Matching is anchored at the start of the name only, so trailing
    /// suffixes after the pattern are tolerated.
    pub fn parse_column(self, name: &str) -> Option<EventColumn> {
        let captures = self.pattern()?.captures(name)?;
        let token = captures.name("Valence")?.as_str();
        let valence = Valence::from_token(&normalize_valence(token))?;
        let event_num = captures.name("EventNum")?.as_str().parse::<u8>().ok()?;
        Some(EventColumn {
            name: name.to_string(),
            family: self,
            valence,
            event_num,
        })
    }
}

impl fmt::Display for VariableFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value_column())
    }
}

/// A wide diary column resolved into its structured parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventColumn {
    /// Header as it appears in the source file.
    pub name: String,
    pub family: VariableFamily,
    pub valence: Valence,
    pub event_num: u8,
}

/// Event columns of a diary header, grouped by family in header order.
#[derive(Debug, Clone, Default)]
pub struct DiarySchema {
    columns: BTreeMap<VariableFamily, Vec<EventColumn>>,
}

impl DiarySchema {
    /// Classifies every header against every family.
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let families = VariableFamily::all();
        let mut columns: BTreeMap<VariableFamily, Vec<EventColumn>> = BTreeMap::new();
        for header in headers {
            for family in &families {
                if let Some(column) = family.parse_column(header.as_ref()) {
                    columns.entry(*family).or_default().push(column);
                }
            }
        }
        Self { columns }
    }

    /// Event columns for one family (empty when none matched).
    pub fn columns(&self, family: VariableFamily) -> &[EventColumn] {
        self.columns.get(&family).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Families with no matching column, in join order.
    pub fn missing_families(&self) -> Vec<VariableFamily> {
        VariableFamily::all()
            .into_iter()
            .filter(|family| self.columns(*family).is_empty())
            .collect()
    }

    /// Total number of classified event columns.
    pub fn event_column_count(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }
}
