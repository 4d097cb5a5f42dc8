// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::time::Duration;

/// Error reported by a backend API implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The named project, cluster or service does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Any other failure: throttling, permissions, transport.
    #[error("{code}: {message}")]
    Service { code: String, message: String },
}

impl BackendError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Service {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Kind of backend resource a lookup failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    Cluster,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Project => f.write_str("build project"),
            ResourceKind::Cluster => f.write_str("cluster"),
        }
    }
}

/// Errors returned by collectors and the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("{operation} failed: {message}")]
    UnexpectedBackendFault {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} timed out after {after:?}")]
    TimedOut {
        operation: &'static str,
        after: Duration,
    },

    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },
}

impl CollectError {
    pub(crate) fn fault(operation: &'static str, err: impl fmt::Display) -> Self {
        CollectError::UnexpectedBackendFault {
            operation,
            message: err.to_string(),
        }
    }

    /// Whether the caller can reasonably present the error and carry on.
    /// Only unexpected backend faults are not.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CollectError::UnexpectedBackendFault { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CollectError::NotFound { .. })
    }
}

/// Errors raised while loading configuration or installing the logger.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to install log subscriber: {0}")]
    Logger(String),
}
