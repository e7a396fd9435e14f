use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{format::Writer, time::FormatTime},
};

pub const NO_COLOR_ENV: &str = "BUILDCHECK_NO_COLOR";

struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

pub fn color_enabled(no_color: Option<&str>) -> bool {
    no_color != Some("1")
}

pub fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let level = default_level(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let no_color = std::env::var(NO_COLOR_ENV).ok();

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime)
        .with_target(false)
        .with_ansi(color_enabled(no_color.as_deref()))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!("Logger is initialized: level={level}");
    }
}
