// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Unified log stream for a deployed application.
//!
//! An application's history is split across two backends: the build
//! subsystem keeps the output of each build run, the deployment subsystem
//! keeps the state changes of the running service. This crate queries both,
//! normalizes their events into [`LogRecord`]s and merges them into one
//! stream ordered by timestamp.
//!
//! ```text
//!   BuildApi ──────> BuildLogCollector ──────┐
//!                                            ├──> LogAggregator ──> Vec<LogRecord>
//!   DeploymentApi ─> DeploymentLogCollector ─┘          ^
//!                                                       │
//!                                                   Selector
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use applogs::{AggregatorConfig, LogAggregator, Selector, TracingObserver};
//! use applogs::memory::{InMemoryBuildApi, InMemoryDeploymentApi};
//!
//! # async fn example() -> Result<(), applogs::CollectError> {
//! let aggregator = LogAggregator::from_backends(
//!     Arc::new(InMemoryBuildApi::new()),
//!     Arc::new(InMemoryDeploymentApi::new()),
//!     AggregatorConfig::default(),
//!     Arc::new(TracingObserver),
//! );
//!
//! for record in aggregator.describe_logs("myapp", Some(&Selector::default())).await? {
//!     println!("{record}");
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod aggregator;
pub mod backend;
pub mod collector;
pub mod config;
pub mod error;
pub mod logger;
pub mod memory;
pub mod observer;
pub mod record;
pub mod selector;

pub use aggregator::LogAggregator;
pub use collector::{BuildLogCollector, CallContext, Collector, DeploymentLogCollector};
pub use config::AggregatorConfig;
pub use error::{BackendError, CollectError, ConfigError, ResourceKind};
pub use observer::{NoopObserver, Observer, TracingObserver};
pub use record::{LogRecord, Process, Source};
pub use selector::{ProcessFilter, Selector, SourceFilter};
