// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Output of an application's most recent build.
//!
//! Three round trips: list the project's builds, resolve the newest build to
//! its log stream, read the stream. Only the newest build is reported; older
//! runs are not paginated through.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::backend::{BuildApi, BuildLogEvent, BuildOperation};
use crate::collector::{CallContext, CallGuard, Collector};
use crate::error::{BackendError, CollectError, ResourceKind};
use crate::observer::Observer;
use crate::record::{LogRecord, Process, Source};

pub struct BuildLogCollector {
    api: Arc<dyn BuildApi>,
    observer: Arc<dyn Observer>,
}

impl BuildLogCollector {
    pub fn new(api: Arc<dyn BuildApi>, observer: Arc<dyn Observer>) -> Self {
        BuildLogCollector { api, observer }
    }
}

#[async_trait]
impl Collector for BuildLogCollector {
    fn process(&self) -> Process {
        Process::Builder
    }

    async fn collect(
        &self,
        app_name: &str,
        ctx: &CallContext,
    ) -> Result<Vec<LogRecord>, CollectError> {
        let guard = CallGuard::new(ctx, self.observer.as_ref(), Process::Builder);

        let op = BuildOperation::ListBuildsForProject.as_str();
        let ids = match guard
            .call(op, app_name, self.api.list_builds_for_project(app_name))
            .await?
        {
            Ok(ids) => ids,
            Err(BackendError::NotFound(_)) => {
                return Err(guard.not_found(op, ResourceKind::Project, app_name));
            }
            Err(err) => return Err(guard.fault(op, app_name, err)),
        };
        let Some(build_id) = ids.into_iter().next() else {
            return Ok(guard.collected(Vec::new()));
        };

        let op = BuildOperation::BatchGetBuilds.as_str();
        let details = guard
            .call(
                op,
                &build_id,
                self.api.batch_get_builds(std::slice::from_ref(&build_id)),
            )
            .await?
            .map_err(|err| guard.fault(op, &build_id, err))?;
        let Some(detail) = details.into_iter().next() else {
            return Ok(guard.collected(Vec::new()));
        };

        let op = BuildOperation::GetLogEvents.as_str();
        let stream = format!("{}/{}", detail.log_group, detail.log_stream);
        let events = guard
            .call(
                op,
                &stream,
                self.api.get_log_events(&detail.log_group, &detail.log_stream),
            )
            .await?
            .map_err(|err| guard.fault(op, &stream, err))?;

        let records = events
            .iter()
            .map(|event| {
                to_record(&build_id, event).map_err(|err| guard.fault(op, &stream, err))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(guard.collected(records))
    }
}

/// Identifier of a build output line. The backend assigns none, so one is
/// derived from everything that distinguishes the line; querying the same
/// line twice yields the same id.
pub fn event_id(build_id: &str, event: &BuildLogEvent) -> String {
    format!("{}-{}-{}", build_id, event.timestamp_millis, event.message)
}

fn to_record(build_id: &str, event: &BuildLogEvent) -> Result<LogRecord, String> {
    let timestamp = Utc
        .timestamp_millis_opt(event.timestamp_millis)
        .single()
        .ok_or_else(|| {
            format!(
                "event timestamp {} of build {build_id} is out of range",
                event.timestamp_millis
            )
        })?;

    Ok(LogRecord::new(
        event_id(build_id, event),
        timestamp,
        Source::Native,
        Process::Builder,
        &event.message,
    ))
}
