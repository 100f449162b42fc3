//! Per-jurisdiction configuration: which routing table applies and which
//! phrases mark a provision as repealed. Built once per document and passed
//! immutably through segmentation and validation.

use crate::provision::Jurisdiction;
use crate::rules::RoutingRules;

/// Everything jurisdiction-specific the parser needs.
#[derive(Debug, Clone)]
pub struct JurisdictionProfile {
    pub jurisdiction: Jurisdiction,
    pub rules: RoutingRules,
    repeal_triggers: Vec<String>,
}

impl JurisdictionProfile {
    pub fn philippine() -> Self {
        Self {
            jurisdiction: Jurisdiction::Philippine,
            rules: RoutingRules::philippine(),
            repeal_triggers: vec!["repealed".into()],
        }
    }

    /// Hong Kong ordinances mark dead sections as repealed or amended, so
    /// both phrases flag the provision.
    pub fn hong_kong() -> Self {
        Self {
            jurisdiction: Jurisdiction::HongKong,
            rules: RoutingRules::hong_kong(),
            repeal_triggers: vec!["repealed".into(), "amended".into()],
        }
    }

    pub fn for_jurisdiction(jurisdiction: Jurisdiction) -> Self {
        match jurisdiction {
            Jurisdiction::Philippine => Self::philippine(),
            Jurisdiction::HongKong => Self::hong_kong(),
        }
    }

    /// Replace the routing table.
    pub fn with_rules(mut self, rules: RoutingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the repeal trigger phrases. Matching stays case-insensitive.
    pub fn with_repeal_triggers<S: Into<String>>(mut self, triggers: impl IntoIterator<Item = S>) -> Self {
        self.repeal_triggers = triggers.into_iter().map(|t| t.into().to_lowercase()).collect();
        self
    }

    /// True if the body carries any repeal trigger phrase.
    pub fn is_repealed(&self, body: &str) -> bool {
        let lower = body.to_lowercase();
        self.repeal_triggers.iter().any(|t| lower.contains(t.as_str()))
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn philippine_flags_repealed_only() {
        let profile = JurisdictionProfile::philippine();
        assert!(profile.is_repealed("This article was REPEALED by RA 10151."));
        assert!(!profile.is_repealed("As amended by RA 6715."));
    }

    #[test]
    fn hong_kong_flags_amended_too() {
        let profile = JurisdictionProfile::hong_kong();
        assert!(profile.is_repealed("(Repealed 41 of 1990 s. 3)"));
        assert!(profile.is_repealed("(Amended 7 of 2001 s. 2)"));
        assert!(!profile.is_repealed("An employer shall grant rest days."));
    }

    #[test]
    fn triggers_can_be_overridden() {
        let profile = JurisdictionProfile::philippine().with_repeal_triggers(["superseded"]);
        assert!(profile.is_repealed("Superseded by a later enactment."));
        assert!(!profile.is_repealed("Repealed by RA 10151."));
    }
}
