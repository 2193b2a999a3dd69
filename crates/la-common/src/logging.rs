use std::any::Any;
use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: the engine's own targets at `info`,
/// everything else the host links in at `warn`.
pub const DEFAULT_DIRECTIVES: &str = "warn,la_common=info,lead_assign=info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging knobs read from the environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogSettings {
    /// `RUST_LOG`; [`DEFAULT_DIRECTIVES`] when unset or blank.
    pub directives: Option<String>,
    /// `LA_LOG_DIR`; daily-rotated file output when set.
    pub log_dir: Option<PathBuf>,
    /// `LA_LOG_INCLUDE_BACKTRACE=1|true`; panics also reach the default hook.
    pub include_backtrace: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            directives: non_blank("RUST_LOG"),
            log_dir: non_blank("LA_LOG_DIR").map(PathBuf::from),
            include_backtrace: lookup("LA_LOG_INCLUDE_BACKTRACE")
                .is_some_and(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true")),
        }
    }

    /// Invalid directives fall back to [`DEFAULT_DIRECTIVES`].
    pub fn env_filter(&self) -> EnvFilter {
        self.directives
            .as_deref()
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic payload not string".into())
}

/// Route panics through `tracing`. Optional for hosts; the engine never
/// installs it on its own. Later calls are no-ops.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let include_backtrace = LogSettings::from_env().include_backtrace;
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));

            tracing::error!(
                application = app_name,
                thread = std::thread::current().name().unwrap_or("unknown"),
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %panic_message(info.payload()),
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

/// Install the global subscriber described by `settings`.
///
/// Returns false when a subscriber was already installed.
pub fn init_with_settings(app_name: &str, settings: &LogSettings) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.env_filter())
        .with_target(true);

    let Some(dir) = settings.log_dir.as_ref() else {
        return builder.try_init().is_ok();
    };
    if let Err(err) = std::fs::create_dir_all(dir) {
        let installed = builder.try_init().is_ok();
        tracing::warn!(
            error = %err,
            dir = %dir.display(),
            "cannot create LA_LOG_DIR; logging to stdout"
        );
        return installed;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let installed = builder
        .with_ansi(false)
        .with_writer(BoxMakeWriter::new(writer))
        .try_init()
        .is_ok();
    if installed {
        let _ = LOG_GUARD.set(guard);
    }
    installed
}

/// [`init_with_settings`] with [`LogSettings::from_env`].
pub fn init_tracing_subscriber(app_name: &str) -> bool {
    init_with_settings(app_name, &LogSettings::from_env())
}
