//! Result Normalizer: maps a `GenerationResult` onto the response contract the
//! browser extension reads.

use serde::Serialize;

use crate::outreach::models::{GenerationResult, IcpScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IcpFit {
    Good,
    Poor,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Always present; `null` when no message was drafted.
    pub message: Option<String>,
    pub length: usize,
    pub icp_fit: IcpFit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icp_score: Option<IcpScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icp_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icp_learning: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Failure shape. The cause stays in the server logs.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            message: None,
            length: 0,
            icp_fit: IcpFit::Unknown,
            icp_score: None,
            icp_reason: None,
            icp_learning: None,
            error: Some(error.into()),
        }
    }
}

/// Character count, not byte count.
pub fn message_length(message: Option<&str>) -> usize {
    message.map_or(0, |m| m.chars().count())
}

pub fn normalize(result: GenerationResult) -> GenerateResponse {
    let icp_fit = if result.icp_score.is_good_fit() {
        IcpFit::Good
    } else {
        IcpFit::Poor
    };

    GenerateResponse {
        length: message_length(result.message.as_deref()),
        message: result.message,
        icp_fit,
        icp_score: Some(result.icp_score),
        icp_reason: Some(result.icp_reason),
        icp_learning: Some(result.icp_learning),
        error: None,
    }
}
