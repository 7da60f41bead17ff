//! Core record types for notam-review.
//!
//! This module defines the row format of the record store, the fixed
//! four-level impact scale, reviewer feedback, and the parsing of the
//! embedded purpose/topic markers in NOTAM text.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One of the fixed, ordered impact levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    /// Low impact.
    Low,
    /// Medium impact.
    Medium,
    /// High impact.
    High,
    /// Critical impact.
    Critical,
}

impl ImpactLevel {
    /// All levels in ascending order, as presented in the form dropdowns.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// The exact string stored in the record files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImpactLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            "Critical" => Ok(Self::Critical),
            other => Err(Error::InvalidImpactLevel {
                value: other.to_string(),
            }),
        }
    }
}

/// One row of a per-user record store.
///
/// The column names and encodings are fixed by the data format shared with the
/// reference dataset: feedback columns are stored as strings and are empty
/// until the row has been reviewed. `last_index` carries the session cursor on
/// the first data row only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    /// NOTAM text, with embedded `<Purpose>`/`<Topic>` markers.
    pub e_line: String,
    /// Category tag.
    pub tag_type: String,
    /// Catalog relevance carried through from the reference dataset.
    #[serde(default)]
    pub relevance_level: String,
    /// Medical-emergency impact level.
    pub class_impact_med: String,
    /// Technical-issue impact level.
    pub class_impact_tech: String,
    /// Land-as-soon-as-possible impact level.
    pub class_impact_land: String,
    /// ICAO style agreement: `2` agree, `1` disagree, empty when unreviewed.
    #[serde(default)]
    pub fb_style: String,
    /// Category correctness: `1` yes, `0` no, empty when unreviewed.
    #[serde(default)]
    pub fb_category: String,
    /// Corrected category when `fb_category` is `0`.
    #[serde(default)]
    pub fb_corrected_category: String,
    /// Operational realism: `2` high, `1` low, empty when unreviewed.
    #[serde(default)]
    pub fb_realism: String,
    /// Reviewer medical-emergency impact override.
    #[serde(default)]
    pub fb_impact_med: String,
    /// Reviewer technical-issue impact override.
    #[serde(default)]
    pub fb_impact_tech: String,
    /// Reviewer land-ASAP impact override.
    #[serde(default)]
    pub fb_impact_land: String,
    /// Free-text note.
    #[serde(default)]
    pub fb_notes: String,
    /// RFC 3339 timestamp of the last save for this row.
    #[serde(default)]
    pub fb_saved_at: String,
    /// Session cursor, present on the first data row only.
    #[serde(default)]
    pub last_index: String,
}

impl UserRow {
    /// Whether this row has been reviewed (feedback saved at least once).
    #[must_use]
    pub fn is_reviewed(&self) -> bool {
        !self.fb_style.trim().is_empty()
    }

    /// The record's own impact level for the medical-emergency class.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is not one of the four levels.
    pub fn impact_med(&self) -> Result<ImpactLevel> {
        self.class_impact_med.parse()
    }

    /// The record's own impact level for the technical-issue class.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is not one of the four levels.
    pub fn impact_tech(&self) -> Result<ImpactLevel> {
        self.class_impact_tech.parse()
    }

    /// The record's own impact level for the land-ASAP class.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is not one of the four levels.
    pub fn impact_land(&self) -> Result<ImpactLevel> {
        self.class_impact_land.parse()
    }

    /// Previously saved style agreement, if any.
    #[must_use]
    pub fn style_agrees(&self) -> Option<bool> {
        match self.fb_style.trim() {
            "2" => Some(true),
            "1" => Some(false),
            _ => None,
        }
    }

    /// Previously saved category correctness, if any.
    #[must_use]
    pub fn category_correct(&self) -> Option<bool> {
        match self.fb_category.trim() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        }
    }

    /// Previously saved realism rating, if any.
    #[must_use]
    pub fn realism_high(&self) -> Option<bool> {
        match self.fb_realism.trim() {
            "2" => Some(true),
            "1" => Some(false),
            _ => None,
        }
    }

    /// Previously saved impact override for a class column, if parseable.
    #[must_use]
    pub fn saved_impact(column: &str) -> Option<ImpactLevel> {
        column.parse().ok()
    }
}

/// Per-record reviewer judgment, as collected by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Whether the reviewer agrees the record is written in ICAO style.
    pub style_agrees: bool,
    /// Whether the assigned category is correct.
    pub category_correct: bool,
    /// The corrected category when `category_correct` is false.
    pub corrected_category: Option<String>,
    /// Whether the record is operationally realistic.
    pub realism_high: bool,
    /// Perceived medical-emergency impact.
    pub impact_med: ImpactLevel,
    /// Perceived technical-issue impact.
    pub impact_tech: ImpactLevel,
    /// Perceived land-ASAP impact.
    pub impact_land: ImpactLevel,
    /// Free-text note.
    pub notes: String,
}

impl Feedback {
    /// Write this feedback into the feedback columns of a row.
    ///
    /// The corrected category is stored only when the category was marked
    /// incorrect, matching the fixed column encoding. Stamps `fb_saved_at`.
    pub fn apply_to(&self, row: &mut UserRow) {
        row.fb_style = if self.style_agrees { "2" } else { "1" }.to_string();
        row.fb_category = if self.category_correct { "1" } else { "0" }.to_string();
        row.fb_corrected_category = if self.category_correct {
            String::new()
        } else {
            self.corrected_category.clone().unwrap_or_default()
        };
        row.fb_realism = if self.realism_high { "2" } else { "1" }.to_string();
        row.fb_impact_med = self.impact_med.to_string();
        row.fb_impact_tech = self.impact_tech.to_string();
        row.fb_impact_land = self.impact_land.to_string();
        row.fb_notes = self.notes.clone();
        row.fb_saved_at = Utc::now().to_rfc3339();
    }
}

/// A NOTAM text split into its context markers and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotamText {
    /// Content of the `<Purpose>` marker, if present.
    pub purpose: String,
    /// Content of the `<Topic>` marker, if present.
    pub topic: String,
    /// The NOTAM body (everything after `</Topic>`).
    pub body: String,
}

fn purpose_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<Purpose>(.*?)</Purpose>").expect("static regex"))
}

fn topic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<Topic>(.*?)</Topic>").expect("static regex"))
}

impl NotamText {
    /// Split a raw `e_line` into purpose, topic, and body.
    ///
    /// A line without markers yields empty purpose/topic and the full
    /// (trimmed) text as the body.
    #[must_use]
    pub fn parse(e_line: &str) -> Self {
        let purpose = purpose_re()
            .captures(e_line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let topic = topic_re()
            .captures(e_line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let body = match e_line.split_once("</Topic>") {
            Some((_, rest)) => rest.trim().to_string(),
            None => e_line.trim().to_string(),
        };

        Self {
            purpose,
            topic,
            body,
        }
    }
}
