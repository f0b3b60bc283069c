//! Terminal reporting for cismeta-rs: leveled log records and per-feature
//! progress bars, sharing one terminal without tearing each other apart.

use std::io::Write;

use env_logger::{fmt::Color, Builder, Env};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use once_cell::sync::OnceCell;

static INSTANCE: OnceCell<Logger> = OnceCell::new();

/// Process-wide logger. env_logger formats the records; the sink is wrapped
/// around an indicatif `MultiProgress`, which every progress bar of the
/// engines registers with.
#[derive(Debug)]
pub struct Logger {
    multi: MultiProgress,
}

impl Logger {
    /// Install the global logger.
    ///
    /// Warnings are reported by default; `verbose` raises the level (-v
    /// Info, -vv Debug, -vvv and beyond Trace) and `quiet` drops it to
    /// errors only. The `CISMETA_LOG` environment variable overrides both.
    pub fn init(verbose: u8, quiet: bool) {
        let logger = Builder::new()
            .filter_level(Self::level_filter(verbose, quiet))
            .format(format_record)
            .parse_env(Env::default().filter("CISMETA_LOG"))
            .build();

        let multi = MultiProgress::new();
        LogWrapper::new(multi.clone(), logger)
            .try_init()
            .expect("a global logger is already installed");
        INSTANCE.set(Self { multi }).expect("Logger::init ran twice");
    }

    fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Error
        }
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// The `MultiProgress` behind the installed logger.
    ///
    /// # Panics
    /// If [`Logger::init`] has not run.
    pub fn multi() -> &'static MultiProgress {
        &INSTANCE.get().expect("Logger::init has not run").multi
    }

    /// Non-panicking variant of [`Logger::multi`], for callers that may run
    /// before (or without) logger initialization.
    pub fn try_multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi)
    }

    /// A progress bar over `len` work items, registered with the global
    /// `MultiProgress` so concurrent log lines redraw above it. Hidden when
    /// the logger was never installed (unit tests, library embeddings).
    pub fn progress(len: usize, message: String) -> ProgressBar {
        let Some(multi) = Self::try_multi() else {
            return ProgressBar::hidden()
        };
        let bar = ProgressBar::new(len as u64).with_message(message).with_style(
            ProgressStyle::with_template("{msg:<22} {bar:40.green/white} {pos}/{len} [{elapsed_precise}]")
                .expect("valid progress template")
                .progress_chars("=> "),
        );
        multi.add(bar)
    }
}

/// One line per record: time, colored level, message. Errors additionally
/// carry their call site.
fn format_record(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    let mut level_style = buf.style();
    let color = match record.level() {
        Level::Error => Color::Red,
        Level::Warn  => Color::Yellow,
        Level::Info  => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Magenta,
    };
    level_style.set_color(color).set_bold(true);

    let time = chrono::Local::now().format("%H:%M:%S");
    match record.level() {
        Level::Error => writeln!(
            buf,
            "{time} {} ({}:{}) {}",
            level_style.value(record.level()),
            record.file().unwrap_or("?"),
            record.line().unwrap_or(0),
            record.args()
        ),
        _ => writeln!(
            buf,
            "{time} {:<5} {}",
            level_style.value(record.level()),
            record.args()
        ),
    }
}
