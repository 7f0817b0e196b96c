//! Tracing subscriber for the CLI.
//!
//! `RUST_LOG` wins when set. Otherwise the level follows `-v`: warnings by
//! default, `-v` for debug, `-vv` for trace. Events go to stderr so generated
//! output on stdout stays clean.

use console::Style;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

pub struct JsonobjFormatter;

impl<S, N> FormatEvent<S, N> for JsonobjFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        let (symbol, style) = match *meta.level() {
            Level::TRACE => ("[ ]", Style::new().dim()),
            Level::DEBUG => ("[?]", Style::new().blue()),
            Level::INFO => ("[+]", Style::new().green().bold()),
            Level::WARN => ("[*]", Style::new().yellow().bold()),
            Level::ERROR => ("[-]", Style::new().red().bold()),
        };

        write!(writer, "{} ", style.apply_to(symbol))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "jsonobj=debug,jsonobj_cli=debug",
        _ => "jsonobj=trace,jsonobj_cli=trace",
    }
}

pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(JsonobjFormatter)
        .try_init();
}
