// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Collectors query one backend subsystem each and return canonical records.
//!
//! - **[`builder`]**: output of the most recent build run
//! - **[`deployer`]**: event history of the running service
//!
//! The aggregator only sees the [`Collector`] trait, so another backend can be
//! plugged in by implementing it and registering the collector.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{BackendError, CollectError, ResourceKind};
use crate::observer::{Event, Observer};
use crate::record::{LogRecord, Process, Source};

pub mod builder;
pub mod deployer;

pub use builder::BuildLogCollector;
pub use deployer::DeploymentLogCollector;

/// Limits applied to every backend call of one aggregation.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub call_timeout: Duration,
    pub cancel: CancellationToken,
}

impl CallContext {
    pub fn new(call_timeout: Duration, cancel: CancellationToken) -> Self {
        CallContext {
            call_timeout,
            cancel,
        }
    }
}

#[async_trait]
pub trait Collector: Send + Sync {
    fn source(&self) -> Source {
        Source::Native
    }

    fn process(&self) -> Process;

    /// Records for `app_name`, in backend order. An application with nothing
    /// to report yields an empty vector, not an error.
    async fn collect(
        &self,
        app_name: &str,
        ctx: &CallContext,
    ) -> Result<Vec<LogRecord>, CollectError>;
}

/// Runs backend calls for one collector under the call context and reports
/// each outcome to the observer.
pub(crate) struct CallGuard<'a> {
    ctx: &'a CallContext,
    observer: &'a dyn Observer,
    process: Process,
}

impl<'a> CallGuard<'a> {
    pub(crate) fn new(ctx: &'a CallContext, observer: &'a dyn Observer, process: Process) -> Self {
        CallGuard {
            ctx,
            observer,
            process,
        }
    }

    /// Awaits `call` unless the context is cancelled or the call timeout
    /// elapses first. The backend's own result is handed back untouched.
    pub(crate) async fn call<T, F>(
        &self,
        operation: &'static str,
        resource: &str,
        call: F,
    ) -> Result<Result<T, BackendError>, CollectError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        if self.ctx.cancel.is_cancelled() {
            return Err(self.cancelled(operation));
        }

        self.observer.notify(&Event::BackendCall {
            process: self.process,
            operation,
            resource: resource.to_string(),
        });

        tokio::select! {
            biased;
            _ = self.ctx.cancel.cancelled() => Err(self.cancelled(operation)),
            res = tokio::time::timeout(self.ctx.call_timeout, call) => match res {
                Ok(inner) => Ok(inner),
                Err(_) => {
                    self.observer.notify(&Event::TimedOut {
                        process: self.process,
                        operation,
                        after: self.ctx.call_timeout,
                    });
                    Err(CollectError::TimedOut {
                        operation,
                        after: self.ctx.call_timeout,
                    })
                }
            },
        }
    }

    pub(crate) fn not_found(
        &self,
        operation: &'static str,
        kind: ResourceKind,
        name: &str,
    ) -> CollectError {
        self.observer.notify(&Event::NotFound {
            process: self.process,
            operation,
            resource: name.to_string(),
        });
        CollectError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn fault(
        &self,
        operation: &'static str,
        resource: &str,
        err: impl std::fmt::Display,
    ) -> CollectError {
        let message = err.to_string();
        self.observer.notify(&Event::BackendFault {
            process: self.process,
            operation,
            resource: resource.to_string(),
            message: message.clone(),
        });
        CollectError::fault(operation, message)
    }

    pub(crate) fn collected(&self, records: Vec<LogRecord>) -> Vec<LogRecord> {
        self.observer.notify(&Event::Collected {
            process: self.process,
            count: records.len(),
        });
        records
    }

    fn cancelled(&self, operation: &'static str) -> CollectError {
        self.observer.notify(&Event::Cancelled {
            process: self.process,
            operation,
        });
        CollectError::Cancelled { operation }
    }
}
