//! Logging setup for the hoshikuzu CLI.
//!
//! Built on `tracing-subscriber` with an `EnvFilter`:
//!
//! 1. `--verbose`: debug for hoshikuzu crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, when set
//! 4. otherwise info for hoshikuzu crates

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str =
    "hoshikuzu=debug,hoshikuzu_cli=debug,hoshikuzu_plugin=debug,hoshikuzu_plugin_devtools=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str =
    "hoshikuzu=info,hoshikuzu_cli=info,hoshikuzu_plugin=info,hoshikuzu_plugin_devtools=info";

/// Initialize the global tracing subscriber.
///
/// Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether colored output should be enabled.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise falls back to terminal detection.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_filters_build() {
        // EnvFilter has no stable introspection; building them must not panic.
        let _ = filter_for(true, false);
        let _ = filter_for(false, true);
        let _ = filter_for(false, false);
    }

    #[test]
    #[serial]
    fn test_no_color_wins() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_colors());
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    #[serial]
    fn test_force_color() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(should_use_colors());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }
}
