// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Capabilities the collectors need from the two backend subsystems.
//!
//! Concrete clients (and their credentials, regions and retry policies) live
//! outside this crate. Anything that can answer these calls can feed the
//! aggregator; [`crate::memory`] ships in-memory implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Storage coordinates of one build run's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDetail {
    pub id: String,
    pub log_group: String,
    pub log_stream: String,
}

/// A raw line of build output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLogEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp_millis: i64,
    /// Line as written by the build, usually newline terminated.
    pub message: String,
}

/// A state change recorded by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescription {
    pub name: String,
    pub events: Vec<ServiceEvent>,
}

/// Calls made against the build subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildOperation {
    ListBuildsForProject,
    BatchGetBuilds,
    GetLogEvents,
}

impl BuildOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildOperation::ListBuildsForProject => "ListBuildsForProject",
            BuildOperation::BatchGetBuilds => "BatchGetBuilds",
            BuildOperation::GetLogEvents => "GetLogEvents",
        }
    }
}

/// Calls made against the deployment subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentOperation {
    DescribeServices,
}

impl DeploymentOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentOperation::DescribeServices => "DescribeServices",
        }
    }
}

#[async_trait]
pub trait BuildApi: Send + Sync {
    /// Build ids for `project`, most recent first.
    ///
    /// Must return [`BackendError::NotFound`] when the project does not exist.
    async fn list_builds_for_project(&self, project: &str) -> Result<Vec<String>, BackendError>;

    /// Details for the given build ids. Unknown ids are omitted.
    async fn batch_get_builds(&self, ids: &[String]) -> Result<Vec<BuildDetail>, BackendError>;

    /// Every event written to `group`/`stream`, oldest first.
    async fn get_log_events(
        &self,
        group: &str,
        stream: &str,
    ) -> Result<Vec<BuildLogEvent>, BackendError>;
}

#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// Current state of `services` within `cluster`. Unknown services are
    /// omitted.
    ///
    /// Must return [`BackendError::NotFound`] when the cluster does not exist.
    async fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<ServiceDescription>, BackendError>;
}
