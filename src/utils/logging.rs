//! Logger installation.
//!
//! The engine itself only talks to the [`log`] facade. Call [`init`] once at
//! startup to route records somewhere visible: the browser console on
//! wasm32, `env_logger` on native targets (tests, tools).

use log::LevelFilter;

/// Installs a logger for the current target. Safe to call more than once.
pub fn init(level: LevelFilter) {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let level = level.to_level().unwrap_or(log::Level::Error);
        if console_log::init_with_level(level).is_err() {
            log::debug!("console logger already installed");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        if env_logger::Builder::new()
            .filter_level(level)
            .try_init()
            .is_err()
        {
            log::debug!("env_logger already installed");
        }
    }
}
