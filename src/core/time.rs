use serde::{Deserialize, Serialize};

/// Coarse part of the day a time-of-day phrase refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Morning,
    Afternoon,
    Evening,
}

impl TimePeriod {
    /// Classification order. Keyword sets overlap, the first hit wins.
    pub const ALL: [TimePeriod; 3] = [TimePeriod::Morning, TimePeriod::Afternoon, TimePeriod::Evening];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            TimePeriod::Morning => &["morning", "am", "8", "9", "10", "11", "early"],
            TimePeriod::Afternoon => &["afternoon", "pm", "12", "1", "2", "3", "4", "noon"],
            TimePeriod::Evening => &["evening", "pm", "5", "6", "7", "8", "9", "night", "late"],
        }
    }

    /// True if the normalized text contains any keyword of this period
    #[inline]
    pub fn mentioned_in(self, normalized: &str) -> bool {
        self.keywords().iter().any(|kw| normalized.contains(kw))
    }

    /// Classify a normalized request
    ///
    /// Ambiguous phrases are not disambiguated: "pm" alone is always the
    /// afternoon, and "5-9 pm" is the morning because of the "9".
    pub fn classify(normalized: &str) -> Option<TimePeriod> {
        Self::ALL.into_iter().find(|period| period.mentioned_in(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_plain_periods() {
        assert_eq!(TimePeriod::classify("morning"), Some(TimePeriod::Morning));
        assert_eq!(TimePeriod::classify("afternoon"), Some(TimePeriod::Afternoon));
        assert_eq!(TimePeriod::classify("evening"), Some(TimePeriod::Evening));
        assert_eq!(TimePeriod::classify("late night"), Some(TimePeriod::Evening));
    }

    #[test]
    fn test_classify_first_match_wins() {
        // "pm" is in both afternoon and evening
        assert_eq!(TimePeriod::classify("pm"), Some(TimePeriod::Afternoon));
        // "9" is a morning keyword
        assert_eq!(TimePeriod::classify("evening (5-9 pm)"), Some(TimePeriod::Morning));
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(TimePeriod::classify("whenever"), None);
        assert_eq!(TimePeriod::classify(""), None);
    }
}
