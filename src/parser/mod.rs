//! Document parsing: segmentation into fragments, then per-fragment
//! validation into provisions, with every discard recorded.

pub mod segment;
pub mod validate;

use serde::Serialize;
use tracing::debug;

use crate::profile::JurisdictionProfile;
use crate::provision::{Dropped, Jurisdiction, Provision};

/// Outcome of parsing one document: what survived and what was dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub jurisdiction: Jurisdiction,
    pub source_file: String,
    pub provisions: Vec<Provision>,
    pub dropped: Vec<Dropped>,
}

impl ParseReport {
    /// Fragments the segmenter produced, kept or not.
    pub fn fragment_count(&self) -> usize {
        self.provisions.len() + self.dropped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provisions.is_empty()
    }
}

/// Parse already-normalized text under the given profile.
pub fn parse_text(text: &str, source_file: &str, profile: &JurisdictionProfile) -> ParseReport {
    let fragments = segment::segment(profile.jurisdiction, text);
    let mut provisions = Vec::with_capacity(fragments.len());
    let mut dropped = Vec::new();
    for fragment in fragments {
        match validate::validate(fragment, profile, source_file) {
            Ok(provision) => provisions.push(provision),
            Err(drop) => {
                debug!("dropped fragment {:?}: {}", drop.identifier, drop.reason);
                dropped.push(drop);
            }
        }
    }
    ParseReport {
        jurisdiction: profile.jurisdiction,
        source_file: source_file.to_string(),
        provisions,
        dropped,
    }
}

// ── Tests ──────────────────────────────────────────────────────────
