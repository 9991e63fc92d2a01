//! Core traits shared across layers.

use async_trait::async_trait;

/// Trait for health checks.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns the name of this health check.
    fn name(&self) -> &str;

    /// Performs the health check.
    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The component is healthy.
    Healthy,
    /// The component is degraded but functional.
    Degraded(String),
    /// The component is unhealthy.
    Unhealthy(String),
}

impl HealthStatus {
    /// Returns true if the status is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Returns true if the status is unhealthy.
    #[must_use]
    pub const fn is_unhealthy(&self) -> bool {
        matches!(self, Self::Unhealthy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status() {
        assert!(HealthStatus::Healthy.is_healthy());
        assert!(!HealthStatus::Degraded("slow".to_string()).is_healthy());
        assert!(!HealthStatus::Degraded("slow".to_string()).is_unhealthy());
        assert!(HealthStatus::Unhealthy("down".to_string()).is_unhealthy());
    }
}
