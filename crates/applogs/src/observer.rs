// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Injected sink for collection events.
//!
//! Collectors never log through a global handle directly. They report what
//! happened to an [`Observer`] they were built with; [`TracingObserver`] turns
//! those reports into `tracing` events, tests can record them instead.
//!
//! ```text
//! BuildLogCollector ──┐
//!                     ├──> Arc<dyn Observer> ──> tracing / test recorder
//! DeployLogCollector ─┤
//! LogAggregator ──────┘
//! ```

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::record::Process;

/// Something worth reporting during one aggregation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A backend call is about to be made.
    BackendCall {
        process: Process,
        operation: &'static str,
        resource: String,
    },
    /// The project or cluster the call targeted does not exist.
    NotFound {
        process: Process,
        operation: &'static str,
        resource: String,
    },
    /// The backend failed for a reason other than not-found.
    BackendFault {
        process: Process,
        operation: &'static str,
        resource: String,
        message: String,
    },
    TimedOut {
        process: Process,
        operation: &'static str,
        after: Duration,
    },
    Cancelled {
        process: Process,
        operation: &'static str,
    },
    /// A collector finished with `count` records.
    Collected { process: Process, count: usize },
    /// The aggregator returned `count` merged records.
    Merged { app_name: String, count: usize },
}

pub trait Observer: Send + Sync {
    fn notify(&self, event: &Event);
}

/// Forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, event: &Event) {
        match event {
            Event::BackendCall {
                process,
                operation,
                resource,
            } => debug!(%process, operation = %operation, %resource, "Calling backend"),
            Event::NotFound {
                process,
                operation,
                resource,
            } => info!(%process, operation = %operation, %resource, "Backend resource not found"),
            Event::BackendFault {
                process,
                operation,
                resource,
                message,
            } => error!(
                %process,
                operation = %operation,
                %resource,
                "Backend call failed: {message}"
            ),
            Event::TimedOut {
                process,
                operation,
                after,
            } => warn!(%process, operation = %operation, "Backend call timed out after {after:?}"),
            Event::Cancelled { process, operation } => {
                debug!(%process, operation = %operation, "Backend call cancelled")
            }
            Event::Collected { process, count } => {
                debug!(%process, "Collected {count} records")
            }
            Event::Merged { app_name, count } => {
                debug!(app_name = %app_name, "Merged {count} records")
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&self, _event: &Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_tracing_observer_logs_faults() {
        TracingObserver.notify(&Event::BackendFault {
            process: Process::Builder,
            operation: "GetLogEvents",
            resource: "/builds/myapp".to_string(),
            message: "ThrottlingException: Rate exceeded".to_string(),
        });

        assert!(logs_contain("Backend call failed"));
        assert!(logs_contain("ThrottlingException: Rate exceeded"));
    }

    #[test]
    #[traced_test]
    fn test_tracing_observer_logs_timeouts() {
        TracingObserver.notify(&Event::TimedOut {
            process: Process::Deployer,
            operation: "DescribeServices",
            after: Duration::from_secs(3),
        });

        assert!(logs_contain("timed out after 3s"));
    }

    #[test]
    #[traced_test]
    fn test_noop_observer_is_silent() {
        NoopObserver.notify(&Event::Collected {
            process: Process::Builder,
            count: 3,
        });

        assert!(!logs_contain("Collected"));
    }
}
