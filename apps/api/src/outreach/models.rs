use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::errors::AppError;

/// Scores strictly above this get a drafted message. Fixed, not configurable.
pub const DRAFTING_THRESHOLD: f64 = 5.0;

pub const MAX_LEARNINGS: usize = 3;

/// ICP fit score in [0, 10]. Whole numbers serialize as integers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct IcpScore(f64);

impl IcpScore {
    pub fn new(value: f64) -> Result<Self, AppError> {
        if !value.is_finite() || !(0.0..=10.0).contains(&value) {
            return Err(AppError::GenerationFailed(format!(
                "icpScore {value} is outside 0-10"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The drafting gate.
    pub fn is_good_fit(self) -> bool {
        self.0 > DRAFTING_THRESHOLD
    }
}

impl Serialize for IcpScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 {
            serializer.serialize_u64(self.0 as u64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl std::fmt::Display for IcpScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage 1 output as the vendor returns it, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScreening {
    pub icp_score: f64,
    pub icp_reason: String,
    pub icp_learning: Vec<String>,
}

/// Stage 1 output: fit only, no message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    pub icp_score: IcpScore,
    pub icp_reason: String,
    pub icp_learning: Vec<String>,
}

impl TryFrom<RawScreening> for ScreeningResult {
    type Error = AppError;

    fn try_from(raw: RawScreening) -> Result<Self, Self::Error> {
        let icp_score = IcpScore::new(raw.icp_score)?;

        let icp_reason = raw.icp_reason.trim().to_string();
        if icp_reason.is_empty() {
            return Err(AppError::GenerationFailed(
                "icpReason is empty".to_string(),
            ));
        }

        let mut icp_learning: Vec<String> = raw
            .icp_learning
            .into_iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if icp_learning.len() > MAX_LEARNINGS {
            warn!(
                "Screening returned {} learnings, keeping the first {MAX_LEARNINGS}",
                icp_learning.len()
            );
            icp_learning.truncate(MAX_LEARNINGS);
        }

        Ok(Self {
            icp_score,
            icp_reason,
            icp_learning,
        })
    }
}

/// The core's only external output. `message` is set only for good fits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub icp_score: IcpScore,
    pub icp_reason: String,
    pub icp_learning: Vec<String>,
    pub message: Option<String>,
}

impl GenerationResult {
    pub fn screened_out(screening: ScreeningResult) -> Self {
        Self::with_message(screening, None)
    }

    pub fn with_message(screening: ScreeningResult, message: Option<String>) -> Self {
        Self {
            icp_score: screening.icp_score,
            icp_reason: screening.icp_reason,
            icp_learning: screening.icp_learning,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(score: f64, learnings: &[&str]) -> RawScreening {
        RawScreening {
            icp_score: score,
            icp_reason: "Strong operational fit".to_string(),
            icp_learning: learnings.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_gate_is_strictly_greater_than_five() {
        assert!(!IcpScore::new(5.0).unwrap().is_good_fit());
        assert!(!IcpScore::new(4.5).unwrap().is_good_fit());
        assert!(IcpScore::new(5.5).unwrap().is_good_fit());
        assert!(IcpScore::new(6.0).unwrap().is_good_fit());
    }

    #[test]
    fn test_score_out_of_range_is_rejected() {
        assert!(IcpScore::new(-1.0).is_err());
        assert!(IcpScore::new(10.5).is_err());
        assert!(IcpScore::new(f64::NAN).is_err());
        assert!(IcpScore::new(0.0).is_ok());
        assert!(IcpScore::new(10.0).is_ok());
    }

    #[test]
    fn test_whole_score_serializes_as_integer() {
        let json = serde_json::to_string(&IcpScore::new(8.0).unwrap()).unwrap();
        assert_eq!(json, "8");
        let json = serde_json::to_string(&IcpScore::new(6.5).unwrap()).unwrap();
        assert_eq!(json, "6.5");
    }

    #[test]
    fn test_raw_screening_accepts_integer_score() {
        let json = r#"{"icpScore": 8, "icpReason": "Fits", "icpLearning": ["a", "b"]}"#;
        let parsed: RawScreening = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.icp_score, 8.0);
    }

    #[test]
    fn test_raw_screening_missing_field_fails() {
        let json = r#"{"icpScore": 8, "icpReason": "Fits"}"#;
        assert!(serde_json::from_str::<RawScreening>(json).is_err());
    }

    #[test]
    fn test_learnings_are_capped_at_three() {
        let result = ScreeningResult::try_from(raw(7.0, &["a", "b", "c", "d"])).unwrap();
        assert_eq!(result.icp_learning, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_blank_reason_is_rejected() {
        let mut r = raw(7.0, &[]);
        r.icp_reason = "  ".to_string();
        assert!(matches!(
            ScreeningResult::try_from(r),
            Err(AppError::GenerationFailed(_))
        ));
    }
}
