use serde::{Deserialize, Serialize};

use crate::badge::Badge;

/// Coarse risk bucket shown next to scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a normalized score in `[0, 1]`.
    ///
    /// `0.4` is still LOW and `0.7` is still MEDIUM.
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Bucket a transaction score in `[0, 100]`.
    pub fn from_score_100(score: f64) -> Self {
        if score >= 75.0 {
            Self::High
        } else if score >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn badge(self) -> Badge {
        match self {
            Self::Low => Badge::Success,
            Self::Medium => Badge::Warning,
            Self::High => Badge::Danger,
        }
    }

    /// Heatmap cell class, `risk-{low|medium|high}`.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Low => "risk-low",
            Self::Medium => "risk-medium",
            Self::High => "risk-high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.4), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.41), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.71), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.82), RiskLevel::High);
    }

    #[test]
    fn hundred_point_boundaries() {
        assert_eq!(RiskLevel::from_score_100(49.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score_100(50.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score_100(74.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score_100(75.0), RiskLevel::High);
    }

    #[test]
    fn serde_is_uppercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
        let lvl: RiskLevel = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(lvl, RiskLevel::Medium);
    }
}
