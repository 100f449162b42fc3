//! Validation: turn a raw fragment into a persisted-ready [`Provision`] or
//! reject it with a recorded reason. Rejection is per-fragment; the rest of
//! the document is unaffected.

use chrono::Utc;

use crate::parser::segment::Fragment;
use crate::profile::JurisdictionProfile;
use crate::provision::{numeric_projection, DropReason, Dropped, Provision, META_CATEGORY};

/// Titles longer than this are cut, not ellipsized.
pub const TITLE_MAX_CHARS: usize = 100;

pub fn validate(
    fragment: Fragment,
    profile: &JurisdictionProfile,
    source_file: &str,
) -> Result<Provision, Dropped> {
    if fragment.identifier.trim().is_empty() {
        return Err(Dropped {
            identifier: fragment.identifier,
            reason: DropReason::EmptyIdentifier,
        });
    }
    let body = fragment.body.trim();
    if body.is_empty() {
        return Err(Dropped {
            identifier: fragment.identifier,
            reason: DropReason::EmptyBody,
        });
    }

    let title = title_of(&fragment, body);
    let (category, repealed) = if fragment.preamble {
        (META_CATEGORY.to_string(), false)
    } else {
        (profile.rules.route(body).to_string(), profile.is_repealed(body))
    };

    Ok(Provision {
        number: numeric_projection(&fragment.identifier),
        title,
        body: body.to_string(),
        repealed,
        category,
        jurisdiction: profile.jurisdiction,
        source_file: source_file.to_string(),
        extracted_at: Utc::now(),
        superseded: fragment.superseded,
        identifier: fragment.identifier,
    })
}

/// Heading-line title when the dialect captured one, first body line
/// otherwise. A heading that captured nothing gets a synthesized label so
/// the record stays addressable.
fn title_of(fragment: &Fragment, body: &str) -> String {
    let raw = match fragment.title_hint.as_deref().map(str::trim) {
        Some(hint) if !hint.is_empty() => hint.to_string(),
        Some(_) => format!("Section {}", fragment.identifier),
        None => body.lines().next().unwrap_or_default().trim().to_string(),
    };
    truncate_chars(&raw, TITLE_MAX_CHARS)
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

// ── Tests ──────────────────────────────────────────────────────────
