// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Caller-supplied filter deciding which collectors run.

use crate::record::{Process, Source};

/// Restriction on the record source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    /// No restriction.
    #[default]
    Any,
    Only(Source),
    /// A value naming no known source. Selecting it yields an empty stream
    /// rather than an error, so callers can pass through user input verbatim.
    Unrecognized(String),
}

/// Restriction on the producing subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProcessFilter {
    /// Builder and deployer.
    #[default]
    All,
    Only(Process),
    /// A value naming no known process. Yields an empty stream.
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub source: SourceFilter,
    pub process: ProcessFilter,
}

impl Selector {
    /// Builds a selector from raw text such as CLI flags. An empty string
    /// means "unspecified"; parsing never fails.
    pub fn parse(source: &str, process: &str) -> Self {
        let source = match source {
            "" => SourceFilter::Any,
            raw => raw
                .parse::<Source>()
                .map(SourceFilter::Only)
                .unwrap_or_else(|_| SourceFilter::Unrecognized(raw.to_string())),
        };
        let process = match process {
            "" => ProcessFilter::All,
            raw => raw
                .parse::<Process>()
                .map(ProcessFilter::Only)
                .unwrap_or_else(|_| ProcessFilter::Unrecognized(raw.to_string())),
        };
        Selector { source, process }
    }

    pub fn process(process: Process) -> Self {
        Selector {
            source: SourceFilter::Any,
            process: ProcessFilter::Only(process),
        }
    }

    /// Whether a collector producing `source`/`process` records should run.
    pub fn matches(&self, source: Source, process: Process) -> bool {
        let source_ok = match &self.source {
            SourceFilter::Any => true,
            SourceFilter::Only(wanted) => *wanted == source,
            SourceFilter::Unrecognized(_) => false,
        };
        let process_ok = match &self.process {
            ProcessFilter::All => true,
            ProcessFilter::Only(wanted) => *wanted == process,
            ProcessFilter::Unrecognized(_) => false,
        };
        source_ok && process_ok
    }
}
