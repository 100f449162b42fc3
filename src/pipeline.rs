//! Pipeline entry points: extract, classify, segment, route, validate.
//!
//! [`process_document`] runs the whole chain from PDF bytes.
//! [`process_text`] starts after extraction for callers that already hold
//! text or want to force a jurisdiction. Persistence is a separate step;
//! see [`crate::db::Store`].

use thiserror::Error;
use tracing::info;

use crate::classifier::Classifier;
use crate::parser::{self, ParseReport};
use crate::pdf;
use crate::profile::JurisdictionProfile;
use crate::provision::Jurisdiction;

/// Failures that abort a document run. Classification trouble never lands
/// here (it falls back to the primary jurisdiction), and single bad
/// provisions are dropped into the report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The byte stream is not a parseable PDF.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    /// The classifier placed the document outside the supported corpus.
    #[error("document rejected: not recognized as a supported labor-law text")]
    ContentRejected,
    /// A store open or statement error. Rows written before it remain.
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] rusqlite::Error),
}

/// Full run: extract text, classify the jurisdiction, parse. Rejects the
/// document when classification says it is out of domain.
pub async fn process_document(
    bytes: &[u8],
    source_file: &str,
    classifier: &Classifier,
) -> Result<ParseReport, PipelineError> {
    let text = pdf::extract_text(bytes)?;
    match classifier.classify(&text).await.jurisdiction() {
        Some(jurisdiction) => {
            info!("classified {} as {}", source_file, jurisdiction);
            Ok(process_text(&text, source_file, jurisdiction))
        }
        None => Err(PipelineError::ContentRejected),
    }
}

/// Parse text under a known jurisdiction, skipping extraction and
/// classification.
pub fn process_text(text: &str, source_file: &str, jurisdiction: Jurisdiction) -> ParseReport {
    process_text_with(text, source_file, &JurisdictionProfile::for_jurisdiction(jurisdiction))
}

/// Parse text under a caller-assembled profile, for custom routing tables
/// or repeal triggers.
pub fn process_text_with(text: &str, source_file: &str, profile: &JurisdictionProfile) -> ParseReport {
    let normalized = pdf::normalize(text);
    parser::parse_text(&normalized, source_file, profile)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RoutingRules;

    #[test]
    fn text_is_normalized_before_segmentation() {
        let text = "1.\u{a0}Short title\nThis Ordinance may be cited as the Employment Ordinance.";
        let report = process_text(text, "eo.pdf", Jurisdiction::HongKong);
        assert_eq!(report.provisions.len(), 1);
        assert_eq!(report.provisions[0].title, "Short title");
    }

    #[test]
    fn custom_profile_flows_through() {
        let profile = JurisdictionProfile::philippine()
            .with_rules(RoutingRules::custom([("night", vec!["night work"])]))
            .with_repeal_triggers(["abolished"]);
        let text = "ART. 130 Night work prohibition\nNight work was abolished for specific roles.";
        let report = process_text_with(text, "code.pdf", &profile);
        let p = &report.provisions[0];
        assert_eq!(p.category, "night");
        assert!(p.repealed);
    }

    #[tokio::test]
    async fn garbage_bytes_abort_before_classification() {
        let classifier = Classifier::new("unused-key");
        let err = process_document(b"not a pdf", "junk.pdf", &classifier).await.unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn classifier_outage_still_parses_under_fallback() {
        let classifier = Classifier::new("test-key").with_base_url("http://127.0.0.1:9");
        let text = "ART. 1 Name of Decree.\nThis Decree shall be known as the Labor Code.";

        let jurisdiction = classifier.classify(text).await.jurisdiction();
        assert_eq!(jurisdiction, Some(Jurisdiction::Philippine));

        let report = process_text(text, "code.pdf", Jurisdiction::Philippine);
        assert_eq!(report.provisions.len(), 1);
        assert_eq!(report.provisions[0].identifier, "1");
    }
}
