//! Service health and token accounting DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reachability of one AI service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Offline,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Offline => write!(f, "offline"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

/// Health of both AI services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub suggestion: ServiceHealth,
    pub generation: ServiceHealth,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.suggestion.status == HealthStatus::Healthy
            && self.generation.status == HealthStatus::Healthy
    }
}

/// Token balance after recording usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub tokens_used: u64,
    #[serde(default)]
    pub tokens_remaining: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl TokenUsage {
    /// Placeholder returned when tracking fails
    pub fn untracked(tokens_used: u64) -> Self {
        Self {
            tokens_used,
            tokens_remaining: 0,
            total_tokens: 0,
        }
    }
}
