// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log line format for embedders that want the crate's diagnostics on stderr.
//!
//! ```text
//! APPLOGS | DEBUG | Calling backend process=builder operation=GetLogEvents resource=/builds/myapp/myapp:2
//! APPLOGS | ERROR | Backend call failed: AccessDeniedException: ... process=deployer operation=DescribeServices resource=myapp
//! ```
//!
//! Installing the subscriber is optional. The collectors report through an
//! injected [`crate::observer::Observer`]; this module only decides how the
//! default observer's `tracing` events are printed.

use std::fmt;

use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::config::AggregatorConfig;
use crate::error::ConfigError;

/// Prefixes each line with `APPLOGS` and the level, followed by the active
/// spans and the event fields.
#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(&mut writer, "APPLOGS | {} | ", event.metadata().level())?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs a global stderr subscriber filtered at the configured log level.
///
/// Fails if the configuration is invalid or a global subscriber is already
/// set.
pub fn init(config: &AggregatorConfig) -> Result<(), ConfigError> {
    config.validate()?;
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| ConfigError::Logger(e.to_string()))?;

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .event_format(Formatter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::Logger(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_formatter_prefix_and_fields() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .event_format(Formatter)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("describe_logs", app = "myapp");
            let _entered = span.enter();
            tracing::warn!(operation = "DescribeServices", "Backend call timed out");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.starts_with("APPLOGS | WARN | describe_logs{app=\"myapp\"}: "));
        assert!(output.contains("Backend call timed out"));
        assert!(output.contains("operation=\"DescribeServices\""));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_formatter_output_has_no_escape_codes() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .event_format(Formatter)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("collect", process = "builder");
            let _entered = span.enter();
            tracing::info!(count = 3, "Collected records");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(!output.contains('\u{1b}'));
        assert!(output.contains("collect{process=\"builder\"}: "));
        assert!(output.contains("count=3"));
    }

    #[test]
    fn test_init_rejects_unknown_log_level() {
        let config = AggregatorConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(matches!(init(&config), Err(ConfigError::InvalidConfig(_))));
    }
}
