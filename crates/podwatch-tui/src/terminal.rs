//! Terminal setup and restoration

use podwatch_core::prelude::*;

/// Install a panic hook that restores the terminal
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

/// Enter raw mode and the alternate screen
pub fn init() -> Result<ratatui::DefaultTerminal> {
    ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))
}

/// Leave the alternate screen; failures are logged, not returned
pub fn restore() {
    if let Err(e) = ratatui::try_restore() {
        let err = Error::TerminalRestore(e.to_string());
        error!("{}", err);
    }
}
