use crate::style::Tag;

/// Qualitative CVSS tier, only used to pick a display emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Absent,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Unscored (zero, negative or NaN) values are `Absent`, boundaries belong to the higher tier.
    pub fn classify(score: f64) -> Self {
        // NaN fails every comparison and falls through to Absent
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else if score > 0.0 {
            Severity::Low
        } else {
            Severity::Absent
        }
    }

    pub fn is_scored(&self) -> bool {
        *self != Severity::Absent
    }

    pub fn tag(&self) -> Tag {
        match self {
            Severity::Critical => Tag::Critical,
            Severity::High => Tag::High,
            Severity::Medium => Tag::Medium,
            Severity::Low | Severity::Absent => Tag::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Severity::classify(0.0), Severity::Absent);
        assert_eq!(Severity::classify(-1.0), Severity::Absent);
        assert_eq!(Severity::classify(f64::NAN), Severity::Absent);
        assert_eq!(Severity::classify(0.1), Severity::Low);
        assert_eq!(Severity::classify(3.999), Severity::Low);
        assert_eq!(Severity::classify(4.0), Severity::Medium);
        assert_eq!(Severity::classify(6.9), Severity::Medium);
        assert_eq!(Severity::classify(7.0), Severity::High);
        assert_eq!(Severity::classify(8.99), Severity::High);
        assert_eq!(Severity::classify(9.0), Severity::Critical);
        assert_eq!(Severity::classify(10.0), Severity::Critical);
    }

    #[test]
    fn test_only_upper_tiers_are_emphasized() {
        assert_eq!(Severity::Absent.tag(), Tag::Plain);
        assert_eq!(Severity::Low.tag(), Tag::Plain);
        assert_eq!(Severity::Medium.tag(), Tag::Medium);
        assert_eq!(Severity::Critical.tag(), Tag::Critical);
        assert!(!Severity::Absent.is_scored());
        assert!(Severity::Low.is_scored());
    }
}
