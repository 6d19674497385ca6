//! Terminal presenter and logging reboot hooks for the interactive driver.

use anyhow::Result;
use crossbeam_channel::Sender;
use menu_core::{DialogHost, FilteredView, SystemControls};
use tracing::info;

use crate::event_loop::LoopEvent;

/// Prints the visible rows instead of drawing a dialog. Reports finished
/// teardowns back to the loop so the controller sees them the way it would
/// from an animated dialog.
pub struct TerminalHost {
    events: Sender<LoopEvent>,
    visible: bool,
}

impl TerminalHost {
    pub fn new(events: Sender<LoopEvent>) -> Self {
        Self {
            events,
            visible: false,
        }
    }

    fn render(&self, view: &FilteredView<'_>) {
        println!("power menu, {} action(s):", view.count());
        for (index, action) in view.iter().enumerate() {
            let marker = if action.enabled() { "" } else { " (disabled)" };
            match action.status() {
                Some(status) => println!("  [{index}] {}: {status}{marker}", action.label()),
                None => println!("  [{index}] {}{marker}", action.label()),
            }
        }
    }
}

impl DialogHost for TerminalHost {
    fn present(&mut self, view: FilteredView<'_>) {
        self.visible = true;
        self.render(&view);
    }

    fn refresh(&mut self, view: FilteredView<'_>) {
        if self.visible {
            self.render(&view);
        }
    }

    fn dismiss(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        println!("menu closed");
        let _ = self.events.send(LoopEvent::DismissCompleted);
    }
}

/// Stands in for the platform reboot surface; every hook only logs.
pub struct LoggingControls;

impl SystemControls for LoggingControls {
    fn quick_restart(&self) -> Result<()> {
        info!("would hot-restart the shell session");
        Ok(())
    }

    fn reboot_recovery(&self) -> Result<()> {
        info!("would reboot to recovery");
        Ok(())
    }

    fn reboot_bootloader(&self) -> Result<()> {
        info!("would reboot to bootloader");
        Ok(())
    }

    fn on_menu_shown(&self) {
        info!("menu shown");
    }

    fn on_menu_hidden(&self) {
        info!("menu hidden");
    }
}
