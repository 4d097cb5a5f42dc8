// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Merges the output of every selected collector into one ordered stream.
//!
//! # Ordering
//!
//! The backends share no sequence number, so records are ordered by
//! timestamp alone. Equal timestamps are broken by source, then by process
//! (builder before deployer), then by the order the collector returned them.
//!
//! # Failure
//!
//! A call either returns every selected collector's records or an error.
//! When several collectors fail, the error of the earliest registered one is
//! returned unchanged, whatever order the failures arrive in. Records
//! gathered by other collectors are dropped.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::backend::{BuildApi, DeploymentApi};
use crate::collector::{BuildLogCollector, CallContext, Collector, DeploymentLogCollector};
use crate::config::AggregatorConfig;
use crate::error::CollectError;
use crate::observer::{Event, Observer};
use crate::record::LogRecord;
use crate::selector::Selector;

pub struct LogAggregator {
    collectors: Vec<Arc<dyn Collector>>,
    config: AggregatorConfig,
    observer: Arc<dyn Observer>,
}

impl LogAggregator {
    /// An aggregator with no collectors registered.
    pub fn new(config: AggregatorConfig, observer: Arc<dyn Observer>) -> Self {
        LogAggregator {
            collectors: Vec::new(),
            config,
            observer,
        }
    }

    /// The standard setup: build output first, deployment events second.
    pub fn from_backends(
        build_api: Arc<dyn BuildApi>,
        deployment_api: Arc<dyn DeploymentApi>,
        config: AggregatorConfig,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let builder = BuildLogCollector::new(build_api, Arc::clone(&observer));
        let deployer = DeploymentLogCollector::new(deployment_api, Arc::clone(&observer));
        LogAggregator::new(config, observer)
            .with_collector(Arc::new(builder))
            .with_collector(Arc::new(deployer))
    }

    /// Registers another collector. Collectors run, and their records are
    /// concatenated, in registration order.
    #[must_use]
    pub fn with_collector(mut self, collector: Arc<dyn Collector>) -> Self {
        self.collectors.push(collector);
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Logs of `app_name` matching `selector`, oldest first.
    ///
    /// Without a selector nothing is fetched and the result is empty.
    pub async fn describe_logs(
        &self,
        app_name: &str,
        selector: Option<&Selector>,
    ) -> Result<Vec<LogRecord>, CollectError> {
        self.describe_logs_with_cancel(app_name, selector, CancellationToken::new())
            .await
    }

    /// Same as [`describe_logs`](Self::describe_logs); cancelling `cancel`
    /// aborts any backend call in flight with [`CollectError::Cancelled`].
    pub async fn describe_logs_with_cancel(
        &self,
        app_name: &str,
        selector: Option<&Selector>,
        cancel: CancellationToken,
    ) -> Result<Vec<LogRecord>, CollectError> {
        let Some(selector) = selector else {
            return Ok(Vec::new());
        };

        let selected: Vec<&Arc<dyn Collector>> = self
            .collectors
            .iter()
            .filter(|collector| selector.matches(collector.source(), collector.process()))
            .collect();
        if selected.is_empty() {
            return Ok(Vec::new());
        }

        let ctx = CallContext::new(self.config.call_timeout, cancel);
        let batches = if self.config.concurrent {
            join_all(selected.iter().map(|collector| collector.collect(app_name, &ctx)))
                .await
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?
        } else {
            let mut batches = Vec::with_capacity(selected.len());
            for collector in &selected {
                batches.push(collector.collect(app_name, &ctx).await?);
            }
            batches
        };

        let records = merge(batches);
        self.observer.notify(&Event::Merged {
            app_name: app_name.to_string(),
            count: records.len(),
        });
        Ok(records)
    }
}

/// Concatenates `batches` in order and sorts the result by timestamp, then
/// source, then process. The sort is stable, so remaining ties keep their
/// concatenation order.
pub fn merge(batches: Vec<Vec<LogRecord>>) -> Vec<LogRecord> {
    let mut records: Vec<LogRecord> = batches.into_iter().flatten().collect();
    records.sort_by_key(|record| (record.timestamp(), record.source(), record.process()));
    records
}
