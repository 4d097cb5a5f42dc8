// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Canonical log record shared by every collector.
//!
//! Build output lines and deployment state changes arrive in two unrelated
//! shapes. Both are normalized into [`LogRecord`] so the aggregator can merge
//! them into one stream without knowing where a record came from.
//!
//! # Text form
//!
//! ```text
//! 2024-03-01T10:15:30.125Z app[builder]: Step 1/7 : FROM ruby:3.3
//! 2024-03-01T10:16:02.000Z app[deployer]: (service myapp) has reached a steady state.
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Origin of a record.
///
/// Only application-native logs exist today. The enum stays closed so adding an
/// external source forces every match in the crate to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Logs emitted by the platform itself for the application.
    #[serde(rename = "app")]
    Native,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Native => "app",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app" => Ok(Source::Native),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Subsystem that produced a record.
///
/// Declaration order is significant: records with equal timestamps sort
/// builder first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    Builder,
    Deployer,
}

impl Process {
    pub const ALL: [Process; 2] = [Process::Builder, Process::Deployer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Process::Builder => "builder",
            Process::Deployer => "deployer",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Process {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "builder" => Ok(Process::Builder),
            "deployer" => Ok(Process::Deployer),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Returned when a string names no known [`Source`] or [`Process`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant '{0}'")]
pub struct UnknownVariant(pub String);

/// One normalized log line.
///
/// Records are value objects: a collector builds them, the aggregator orders
/// them, nothing mutates them afterwards. Fields are therefore only readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    id: String,
    timestamp: DateTime<Utc>,
    source: Source,
    process: Process,
    message: String,
}

impl LogRecord {
    /// Builds a record, stripping trailing line feeds from `message`.
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        source: Source,
        process: Process,
        message: &str,
    ) -> Self {
        LogRecord {
            id: id.into(),
            timestamp,
            source,
            process,
            message: message.trim_end_matches('\n').to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn process(&self) -> Process {
        self.process
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Serializes the record as a single JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}[{}]: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.source,
            self.process,
            self.message
        )
    }
}
