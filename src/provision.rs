//! Core data model: the tagged provision record shared by every pipeline
//! stage, plus the drop records produced when validation discards a fragment.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier given to preamble text captured before the first numbered
/// provision of a document.
pub const PREAMBLE_IDENTIFIER: &str = "PREAMBLE";

/// Category assigned to preamble records. Never produced by routing.
pub const META_CATEGORY: &str = "meta";

/// A jurisdiction whose documents this pipeline knows how to segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "PH")]
    Philippine,
    #[serde(rename = "HK")]
    HongKong,
}

impl Jurisdiction {
    pub fn code(self) -> &'static str {
        match self {
            Jurisdiction::Philippine => "PH",
            Jurisdiction::HongKong => "HK",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "PH" => Some(Jurisdiction::Philippine),
            "HK" => Some(Jurisdiction::HongKong),
            _ => None,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validated provision, ready for persistence.
///
/// `identifier` is the label as it appears in the document ("130", "130-A",
/// "12B", or [`PREAMBLE_IDENTIFIER`]). `number` is its numeric projection,
/// used only for ordering. `superseded` carries the bracketed secondary
/// number some renumbered articles show, e.g. `ART. 130 [135]`.
#[derive(Debug, Clone, Serialize)]
pub struct Provision {
    pub identifier: String,
    pub number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded: Option<i64>,
    pub title: String,
    pub body: String,
    pub repealed: bool,
    pub category: String,
    pub jurisdiction: Jurisdiction,
    pub source_file: String,
    pub extracted_at: DateTime<Utc>,
}

/// Why a fragment was discarded during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    EmptyBody,
    EmptyIdentifier,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::EmptyBody => f.write_str("empty body"),
            DropReason::EmptyIdentifier => f.write_str("empty identifier"),
        }
    }
}

/// Record of a fragment that validation refused to keep.
#[derive(Debug, Clone, Serialize)]
pub struct Dropped {
    pub identifier: String,
    pub reason: DropReason,
}

/// Digits-only projection of a provision identifier, for ordering.
///
/// "130-A" maps to 130, "12B" to 12. Identifiers without digits
/// (the preamble included) map to 0, so the result is never negative.
pub fn numeric_projection(identifier: &str) -> i64 {
    let digits: String = identifier.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_projection_strips_suffixes() {
        assert_eq!(numeric_projection("130"), 130);
        assert_eq!(numeric_projection("130-A"), 130);
        assert_eq!(numeric_projection("12B"), 12);
    }

    #[test]
    fn numeric_projection_defaults_to_zero() {
        assert_eq!(numeric_projection(PREAMBLE_IDENTIFIER), 0);
        assert_eq!(numeric_projection(""), 0);
        assert_eq!(numeric_projection("---"), 0);
    }

    #[test]
    fn jurisdiction_codes_round_trip() {
        assert_eq!(Jurisdiction::from_code("PH"), Some(Jurisdiction::Philippine));
        assert_eq!(Jurisdiction::from_code("hk"), Some(Jurisdiction::HongKong));
        assert_eq!(Jurisdiction::from_code("XX"), None);
        assert_eq!(Jurisdiction::Philippine.to_string(), "PH");
    }

    #[test]
    fn jurisdiction_serializes_as_code() {
        let json = serde_json::to_string(&Jurisdiction::HongKong).unwrap();
        assert_eq!(json, "\"HK\"");
    }
}
