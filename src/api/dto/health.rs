//! Health check DTOs for API responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response structure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "healthy",
    "version": "0.1.0",
    "timestamp": "2025-04-25T06:00:00Z",
    "checks": {
        "user_store": {
            "status": "healthy",
            "message": "2 users loaded"
        }
    }
}))]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Timestamp of the health check (RFC 3339)
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: String,
    /// Per-component results keyed by component name
    pub checks: BTreeMap<String, ComponentHealth>,
}

/// Health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Individual component health information.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    /// Overall status is unhealthy if any component is
    pub fn from_checks(version: String, checks: BTreeMap<String, ComponentHealth>) -> Self {
        let status = if checks
            .values()
            .any(|check| check.status == HealthStatus::Unhealthy)
        {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            version,
            timestamp: jiff::Timestamp::now().to_string(),
            checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(status: HealthStatus) -> ComponentHealth {
        ComponentHealth {
            status,
            message: None,
        }
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_overall_status_from_checks() {
        let mut checks = BTreeMap::new();
        checks.insert("a".to_string(), check(HealthStatus::Healthy));
        let healthy = HealthResponse::from_checks("0.1.0".to_string(), checks.clone());
        assert_eq!(healthy.status, HealthStatus::Healthy);

        checks.insert("b".to_string(), check(HealthStatus::Unhealthy));
        let unhealthy = HealthResponse::from_checks("0.1.0".to_string(), checks);
        assert_eq!(unhealthy.status, HealthStatus::Unhealthy);
        assert!(!unhealthy.timestamp.is_empty());
    }
}
