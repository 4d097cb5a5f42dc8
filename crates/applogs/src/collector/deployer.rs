// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Event history of an application's running service.
//!
//! Each application is deployed as one service inside a cluster of the same
//! name, so the application name is used for both.

use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::{DeploymentApi, DeploymentOperation, ServiceEvent};
use crate::collector::{CallContext, CallGuard, Collector};
use crate::error::{BackendError, CollectError, ResourceKind};
use crate::observer::Observer;
use crate::record::{LogRecord, Process, Source};

pub struct DeploymentLogCollector {
    api: Arc<dyn DeploymentApi>,
    observer: Arc<dyn Observer>,
}

impl DeploymentLogCollector {
    pub fn new(api: Arc<dyn DeploymentApi>, observer: Arc<dyn Observer>) -> Self {
        DeploymentLogCollector { api, observer }
    }
}

#[async_trait]
impl Collector for DeploymentLogCollector {
    fn process(&self) -> Process {
        Process::Deployer
    }

    async fn collect(
        &self,
        app_name: &str,
        ctx: &CallContext,
    ) -> Result<Vec<LogRecord>, CollectError> {
        let guard = CallGuard::new(ctx, self.observer.as_ref(), Process::Deployer);

        let op = DeploymentOperation::DescribeServices.as_str();
        let services = [app_name.to_string()];
        let described = match guard
            .call(op, app_name, self.api.describe_services(app_name, &services))
            .await?
        {
            Ok(described) => described,
            Err(BackendError::NotFound(_)) => {
                return Err(guard.not_found(op, ResourceKind::Cluster, app_name));
            }
            Err(err) => return Err(guard.fault(op, app_name, err)),
        };
        let Some(service) = described.into_iter().next() else {
            return Ok(guard.collected(Vec::new()));
        };

        let records = service.events.iter().map(to_record).collect();
        Ok(guard.collected(records))
    }
}

fn to_record(event: &ServiceEvent) -> LogRecord {
    LogRecord::new(
        event.id.clone(),
        event.created_at,
        Source::Native,
        Process::Deployer,
        &event.message,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collector::tests::{context, RecordingObserver};
    use crate::memory::InMemoryDeploymentApi;
    use crate::observer::Event;
    use chrono::{TimeZone, Utc};

    fn service_event(id: &str, secs: i64, message: &str) -> ServiceEvent {
        ServiceEvent {
            id: id.to_string(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_collects_service_events() {
        let api = InMemoryDeploymentApi::new();
        api.record_event(
            "myapp",
            "myapp",
            service_event("e-2", 20, "(service myapp) has reached a steady state."),
        )
        .await;
        api.record_event(
            "myapp",
            "myapp",
            service_event("e-1", 10, "(service myapp) has started 1 tasks."),
        )
        .await;
        let observer = Arc::new(RecordingObserver::default());

        let records = DeploymentLogCollector::new(Arc::new(api.clone()), observer.clone())
            .collect("myapp", &context())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), "e-2");
        assert_eq!(records[0].process(), Process::Deployer);
        assert_eq!(
            records[0].message(),
            "(service myapp) has reached a steady state."
        );
        assert_eq!(records[1].timestamp(), Utc.timestamp_opt(10, 0).unwrap());
        assert!(observer.events().contains(&Event::Collected {
            process: Process::Deployer,
            count: 2
        }));
    }

    #[tokio::test]
    async fn test_cluster_without_service_is_empty() {
        let api = InMemoryDeploymentApi::new();
        api.create_cluster("myapp").await;

        let observer = Arc::new(RecordingObserver::default());
        let records = DeploymentLogCollector::new(Arc::new(api), observer)
            .collect("myapp", &context())
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_missing_cluster_is_not_found() {
        let api = InMemoryDeploymentApi::new();

        let observer = Arc::new(RecordingObserver::default());
        let err = DeploymentLogCollector::new(Arc::new(api), observer)
            .collect("ghost", &context())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CollectError::NotFound {
                kind: ResourceKind::Cluster,
                name: "ghost".to_string()
            }
        );
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_backend_fault_is_returned() {
        let api = InMemoryDeploymentApi::new();
        api.create_cluster("myapp").await;
        api.fail(
            DeploymentOperation::DescribeServices,
            BackendError::service("AccessDeniedException", "not authorized"),
        )
        .await;
        let observer = Arc::new(RecordingObserver::default());

        let err = DeploymentLogCollector::new(Arc::new(api), observer.clone())
            .collect("myapp", &context())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CollectError::UnexpectedBackendFault {
                operation: "DescribeServices",
                message: "AccessDeniedException: not authorized".to_string()
            }
        );
        assert!(observer
            .events()
            .iter()
            .any(|event| matches!(event, Event::BackendFault { .. })));
    }

    #[test]
    fn test_message_kept_verbatim() {
        let record = to_record(&service_event("e-1", 0, "  padded  "));
        assert_eq!(record.message(), "  padded  ");
    }
}
