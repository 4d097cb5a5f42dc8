// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Backend fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use applogs::backend::{BuildLogEvent, ServiceEvent};
use applogs::memory::{InMemoryBuildApi, InMemoryDeploymentApi};
use applogs::{AggregatorConfig, LogAggregator, NoopObserver};
use chrono::{DateTime, TimeZone, Utc};

pub const APP: &str = "myapp";

pub fn at(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).unwrap()
}

pub fn build_line(timestamp_millis: i64, message: &str) -> BuildLogEvent {
    BuildLogEvent {
        timestamp_millis,
        message: format!("{message}\n"),
    }
}

pub fn service_event(id: &str, millis: i64, message: &str) -> ServiceEvent {
    ServiceEvent {
        id: id.to_string(),
        created_at: at(millis),
        message: message.to_string(),
    }
}

/// Backends pre-seeded with one build and one service.
pub struct Backends {
    pub builds: InMemoryBuildApi,
    pub deployments: InMemoryDeploymentApi,
}

impl Backends {
    pub async fn seeded(build_lines: Vec<BuildLogEvent>, events: Vec<ServiceEvent>) -> Self {
        let builds = InMemoryBuildApi::new();
        builds.record_build(APP, "myapp:1", build_lines).await;

        let deployments = InMemoryDeploymentApi::new();
        deployments.create_cluster(APP).await;
        for event in events {
            deployments.record_event(APP, APP, event).await;
        }

        Backends {
            builds,
            deployments,
        }
    }

    pub fn aggregator(&self, config: AggregatorConfig) -> LogAggregator {
        LogAggregator::from_backends(
            Arc::new(self.builds.clone()),
            Arc::new(self.deployments.clone()),
            config,
            Arc::new(NoopObserver),
        )
    }
}
