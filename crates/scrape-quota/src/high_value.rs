//! High-value query predicate (spec.md §4.3), grounded on
//! `original_source/.../serpapi_scraper.py`'s `_is_high_value_query`.

/// One class of signal that marks a query as worth spending metered quota
/// on. The source hardcodes five groups of literal substrings; we keep the
/// groups as variants so each can be tested and extended independently
/// instead of one flat string list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighValueSignal {
    MajorJobBoard,
    FreshnessToken,
    ExecutiveRole,
    MajorEmployer,
    HighDemandOccupation,
}

impl HighValueSignal {
    const ALL: [HighValueSignal; 5] = [
        HighValueSignal::MajorJobBoard,
        HighValueSignal::FreshnessToken,
        HighValueSignal::ExecutiveRole,
        HighValueSignal::MajorEmployer,
        HighValueSignal::HighDemandOccupation,
    ];

    fn tokens(self) -> &'static [&'static str] {
        match self {
            HighValueSignal::MajorJobBoard => &[
                "site:pnet.co.za",
                "site:careers24.com",
                "site:jobmail.co.za",
                "site:linkedin.com/jobs",
                "site:indeed.co.za",
            ],
            HighValueSignal::FreshnessToken => &["posted today", "yesterday", "new"],
            HighValueSignal::ExecutiveRole => {
                &["executive", "director", "manager", "c-level", "senior"]
            }
            HighValueSignal::MajorEmployer => &[
                "shoprite",
                "pick n pay",
                "checkers",
                "woolworths",
                "standard bank",
                "fnb",
                "absa",
                "nedbank",
                "sanlam",
                "discovery",
                "mtv",
                "dstv",
            ],
            HighValueSignal::HighDemandOccupation => &[
                "software engineer",
                "data scientist",
                "developer",
                "nurse",
                "doctor",
                "accountant",
                "engineer",
                "teacher",
                "pilot",
                "lawyer",
            ],
        }
    }

    /// Whether `query` (case-insensitively) contains any token of this class.
    pub fn matches(self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.tokens().iter().any(|token| query.contains(token))
    }
}

/// `value_score >= 1` from the source: at least one signal class matches.
pub fn is_high_value(query: &str) -> bool {
    HighValueSignal::ALL.iter().any(|signal| signal.matches(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_job_board_site_tag_is_high_value() {
        assert!(is_high_value("site:pnet.co.za junior developer"));
    }

    #[test]
    fn freshness_token_is_high_value() {
        assert!(is_high_value("warehouse jobs posted today"));
    }

    #[test]
    fn executive_keyword_is_high_value() {
        assert!(is_high_value("regional sales director"));
    }

    #[test]
    fn major_employer_name_is_high_value_case_insensitively() {
        assert!(is_high_value("Standard Bank graduate programme"));
    }

    #[test]
    fn high_demand_occupation_is_high_value() {
        assert!(is_high_value("software engineer contract role"));
    }

    #[test]
    fn low_value_query_matches_no_signal() {
        assert!(!is_high_value("random word"));
    }
}
