mod app;
mod events;
mod logging;
mod persist;
mod strings;
mod terminal;
mod theme;
mod ui;
mod worker;

use anyhow::{Context, Result};
use providers::roast::RoastConfig;
use terminal::TerminalGuard;
use tracing::info;

fn main() -> Result<()> {
    let _log_guard = logging::init();
    let cfg = RoastConfig::from_env_and_file();
    info!(target: "tui", "starting; base_url={}", cfg.base_url);
    let mut app = app::App::new(cfg);
    let mut term = TerminalGuard::new().context("terminal setup")?;
    events::run(&mut term.terminal, &mut app)
}
