//! Keyword routing: an ordered category table scanned first-match-wins
//! against a provision body. The table is fixed at construction; routing
//! itself never mutates it.

/// Category used when no rule matches.
pub const DEFAULT_CATEGORY: &str = "general";

/// Ordered routing table. Earlier entries win; within an entry, any one
/// keyword hit routes the provision to that category.
#[derive(Debug, Clone)]
pub struct RoutingRules {
    rules: Vec<(String, Vec<String>)>,
}

impl RoutingRules {
    /// Routing table for Philippine labor-code articles.
    pub fn philippine() -> Self {
        Self::custom([
            ("wages", vec!["wage", "salary", "pay", "overtime", "payroll", "deduction"]),
            ("contracts", vec!["contract", "dismissal", "termination", "probationary"]),
        ])
    }

    /// Routing table for Hong Kong employment-ordinance sections.
    pub fn hong_kong() -> Self {
        Self::custom([
            (
                "wages",
                vec!["wage", "salary", "pay", "remuneration", "bonus", "commission", "overtime", "rest day"],
            ),
            (
                "leave",
                vec!["leave", "annual leave", "sick leave", "maternity", "paternity", "holiday"],
            ),
            (
                "contracts",
                vec!["contract", "employment", "termination", "dismissal", "resignation", "probation"],
            ),
            (
                "safety",
                vec!["safety", "accident", "compensation", "injury", "health"],
            ),
        ])
    }

    /// Build a table from caller-supplied entries, preserving their order.
    /// Keywords are lowercased so matching stays case-insensitive.
    pub fn custom<C, K>(entries: impl IntoIterator<Item = (C, Vec<K>)>) -> Self
    where
        C: Into<String>,
        K: Into<String>,
    {
        let rules = entries
            .into_iter()
            .map(|(category, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.into().to_lowercase())
                    .collect();
                (category.into(), keywords)
            })
            .collect();
        Self { rules }
    }

    /// Pick the category for a provision body. Case-insensitive substring
    /// scan in table order; falls back to [`DEFAULT_CATEGORY`].
    pub fn route(&self, body: &str) -> &str {
        let lower = body.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(category, _)| category.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Categories this table can produce, in rule order. Does not include
    /// the fallback category.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(category, _)| category.as_str())
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let rules = RoutingRules::philippine();
        // "pay" (wages) and "termination" (contracts) both occur; wages is
        // listed first so it wins.
        let body = "Separation pay shall be due upon termination of employment.";
        assert_eq!(rules.route(body), "wages");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = RoutingRules::philippine();
        assert_eq!(rules.route("OVERTIME WORK ON HOLIDAYS"), "wages");
        assert_eq!(rules.route("Probationary employment shall not exceed six months."), "contracts");
    }

    #[test]
    fn unmatched_body_falls_back_to_general() {
        let rules = RoutingRules::philippine();
        assert_eq!(rules.route("The State shall afford full protection."), DEFAULT_CATEGORY);
    }

    #[test]
    fn hong_kong_table_covers_leave_and_safety() {
        let rules = RoutingRules::hong_kong();
        assert_eq!(rules.route("An employee is entitled to maternity leave."), "leave");
        assert_eq!(rules.route("Compensation for injury at work."), "safety");
    }

    #[test]
    fn custom_table_preserves_caller_order() {
        let rules = RoutingRules::custom([
            ("special", vec!["holiday"]),
            ("generic", vec!["work"]),
        ]);
        assert_eq!(rules.route("Holiday work rules"), "special");
        assert_eq!(rules.route("Work rules"), "generic");
        assert_eq!(rules.route("Nothing relevant"), DEFAULT_CATEGORY);
        let categories: Vec<&str> = rules.categories().collect();
        assert_eq!(categories, vec!["special", "generic"]);
    }
}
