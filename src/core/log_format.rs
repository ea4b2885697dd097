use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Timestamp layout of every log line, e.g. `2025-07-31 15:42:00,123`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Dash-separated single-line event format
///
/// Produces `time - logger - LEVEL - function:line - message key=value`.
/// The timestamp and the `function:line` part are optional. The function
/// is the name of the innermost active span, which is the function name
/// for anything annotated with `#[instrument]`.
#[derive(Debug, Clone)]
pub struct LineFormat {
    logger_name: String,
    timer: Option<ChronoLocal>,
    location: bool,
}

impl LineFormat {
    pub fn new(logger_name: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            timer: None,
            location: false,
        }
    }

    pub fn with_time(mut self) -> Self {
        self.timer = Some(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()));
        self
    }

    pub fn with_location(mut self) -> Self {
        self.location = true;
        self
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        if let Some(timer) = &self.timer {
            timer.format_time(&mut writer)?;
            write!(writer, " - ")?;
        }

        write!(writer, "{} - {}", self.logger_name, meta.level())?;

        if self.location {
            let function = ctx.lookup_current().map(|span| span.name()).unwrap_or("-");
            write!(writer, " - {}:{}", function, meta.line().unwrap_or(0))?;
        }

        write!(writer, " - ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
