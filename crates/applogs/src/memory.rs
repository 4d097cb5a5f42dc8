// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory backends.
//!
//! Both types are cheap to clone; clones share state, so a test can keep one
//! handle for seeding and fault injection while the collector owns another.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::backend::{
    BuildApi, BuildDetail, BuildLogEvent, BuildOperation, DeploymentApi, DeploymentOperation,
    ServiceDescription, ServiceEvent,
};
use crate::error::BackendError;

#[derive(Debug, Default)]
struct BuildState {
    /// Project name to build ids, most recent first.
    projects: HashMap<String, Vec<String>>,
    builds: HashMap<String, BuildDetail>,
    streams: HashMap<(String, String), Vec<BuildLogEvent>>,
    faults: HashMap<BuildOperation, BackendError>,
    latency: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBuildApi {
    state: Arc<RwLock<BuildState>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryBuildApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project with no builds. Idempotent.
    pub async fn create_project(&self, project: &str) {
        let mut state = self.state.write().await;
        state.projects.entry(project.to_string()).or_default();
    }

    /// Records a finished build as the project's most recent one, creating the
    /// project if needed. Output goes to group `/builds/{project}`, stream
    /// `build_id`.
    pub async fn record_build(&self, project: &str, build_id: &str, events: Vec<BuildLogEvent>) {
        let detail = BuildDetail {
            id: build_id.to_string(),
            log_group: format!("/builds/{project}"),
            log_stream: build_id.to_string(),
        };

        let mut state = self.state.write().await;
        state
            .projects
            .entry(project.to_string())
            .or_default()
            .insert(0, build_id.to_string());
        state.streams.insert(
            (detail.log_group.clone(), detail.log_stream.clone()),
            events,
        );
        state.builds.insert(build_id.to_string(), detail);
    }

    /// Makes every subsequent `operation` call fail with `error`.
    pub async fn fail(&self, operation: BuildOperation, error: BackendError) {
        self.state.write().await.faults.insert(operation, error);
    }

    /// Delays every call by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        self.state.write().await.latency = Some(latency);
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, operation: BuildOperation) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (latency, fault) = {
            let state = self.state.read().await;
            (state.latency, state.faults.get(&operation).cloned())
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match fault {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BuildApi for InMemoryBuildApi {
    async fn list_builds_for_project(&self, project: &str) -> Result<Vec<String>, BackendError> {
        self.enter(BuildOperation::ListBuildsForProject).await?;
        let state = self.state.read().await;
        state
            .projects
            .get(project)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("project {project}")))
    }

    async fn batch_get_builds(&self, ids: &[String]) -> Result<Vec<BuildDetail>, BackendError> {
        self.enter(BuildOperation::BatchGetBuilds).await?;
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.builds.get(id).cloned())
            .collect())
    }

    async fn get_log_events(
        &self,
        group: &str,
        stream: &str,
    ) -> Result<Vec<BuildLogEvent>, BackendError> {
        self.enter(BuildOperation::GetLogEvents).await?;
        let state = self.state.read().await;
        state
            .streams
            .get(&(group.to_string(), stream.to_string()))
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("log stream {group}/{stream}")))
    }
}

#[derive(Debug, Default)]
struct DeploymentState {
    /// Cluster name to its services.
    clusters: HashMap<String, HashMap<String, ServiceDescription>>,
    faults: HashMap<DeploymentOperation, BackendError>,
    latency: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDeploymentApi {
    state: Arc<RwLock<DeploymentState>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryDeploymentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a cluster with no services. Idempotent.
    pub async fn create_cluster(&self, cluster: &str) {
        let mut state = self.state.write().await;
        state.clusters.entry(cluster.to_string()).or_default();
    }

    /// Appends an event to `service` in `cluster`, creating both if needed.
    pub async fn record_event(&self, cluster: &str, service: &str, event: ServiceEvent) {
        let mut state = self.state.write().await;
        state
            .clusters
            .entry(cluster.to_string())
            .or_default()
            .entry(service.to_string())
            .or_insert_with(|| ServiceDescription {
                name: service.to_string(),
                events: Vec::new(),
            })
            .events
            .push(event);
    }

    pub async fn fail(&self, operation: DeploymentOperation, error: BackendError) {
        self.state.write().await.faults.insert(operation, error);
    }

    pub async fn set_latency(&self, latency: Duration) {
        self.state.write().await.latency = Some(latency);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeploymentApi for InMemoryDeploymentApi {
    async fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<ServiceDescription>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (latency, fault) = {
            let state = self.state.read().await;
            (
                state.latency,
                state
                    .faults
                    .get(&DeploymentOperation::DescribeServices)
                    .cloned(),
            )
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(err) = fault {
            return Err(err);
        }

        let state = self.state.read().await;
        let known = state
            .clusters
            .get(cluster)
            .ok_or_else(|| BackendError::NotFound(format!("cluster {cluster}")))?;
        Ok(services
            .iter()
            .filter_map(|name| known.get(name).cloned())
            .collect())
    }
}
