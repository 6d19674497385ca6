use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::action::VisibilityContext;
use crate::catalog::{build_action_list, ActionCatalog, BuiltinCatalog, SystemControls};
use crate::list::{ActionList, FilteredView};
use crate::{DIALOG_DISMISS_DELAY, DISMISS_REASON_POWER_MENU};

/// Ordered configuration keys naming which actions to build. Read fresh on
/// every build so configuration changes apply on the next show.
pub trait ActionKeySource: Send + Sync {
    fn action_keys(&self) -> Vec<String>;
}

/// Presentation collaborator. Owns windows, theming and animation; receives
/// the current filtered view and must not retain it beyond the call.
pub trait DialogHost {
    fn present(&mut self, view: FilteredView<'_>);
    fn refresh(&mut self, view: FilteredView<'_>);
    fn dismiss(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuMessage {
    Show,
    Dismiss,
    Refresh,
}

/// Deferred delivery back into [`PowerMenuController::handle_message`] on the
/// loop that owns the controller. Posting never blocks.
pub trait MessageQueue {
    fn post(&self, message: MenuMessage);
    fn post_delayed(&self, message: MenuMessage, delay: Duration);
}

/// System-wide events that force open dialogs closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemSignal {
    CloseSystemDialogs { reason: Option<String> },
    ScreenOff,
}

impl SystemSignal {
    fn reason(&self) -> Option<&str> {
        match self {
            SystemSignal::CloseSystemDialogs { reason } => reason.as_deref(),
            SystemSignal::ScreenOff => None,
        }
    }
}

/// Session controller for the power menu. Builds the action list from
/// configuration, filters it against the show-time context, routes presses
/// and keeps show/dismiss transitions from overlapping.
///
/// Single-threaded by design: every entry point runs on the loop that owns
/// the controller, and deferred work travels through the [`MessageQueue`]
/// rather than a second thread.
pub struct PowerMenuController<H: DialogHost> {
    keys: Arc<dyn ActionKeySource>,
    catalog: Arc<dyn ActionCatalog>,
    controls: Arc<dyn SystemControls>,
    host: H,
    queue: Box<dyn MessageQueue>,
    session: Option<ActionList>,
    keyguard_showing: bool,
    device_provisioned: bool,
}

impl<H: DialogHost> PowerMenuController<H> {
    pub fn new(
        keys: Arc<dyn ActionKeySource>,
        controls: Arc<dyn SystemControls>,
        host: H,
        queue: Box<dyn MessageQueue>,
    ) -> Self {
        Self {
            keys,
            catalog: Arc::new(BuiltinCatalog),
            controls,
            host,
            queue,
            session: None,
            keyguard_showing: false,
            device_provisioned: false,
        }
    }

    /// Swaps the built-in catalog out, for hosts whose configuration names
    /// actions beyond the standard reboot set.
    pub fn with_catalog(mut self, catalog: Arc<dyn ActionCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Entry point for a show request. Stores the display conditions; when a
    /// session is already active it is torn down first and the fresh show is
    /// deferred by [`DIALOG_DISMISS_DELAY`] so the teardown completes before
    /// the replacement appears.
    pub fn show_dialog(&mut self, keyguard_showing: bool, device_provisioned: bool) -> Result<()> {
        self.keyguard_showing = keyguard_showing;
        self.device_provisioned = device_provisioned;
        if self.session.is_some() {
            self.teardown_session();
            self.queue
                .post_delayed(MenuMessage::Show, DIALOG_DISMISS_DELAY);
            debug!(
                delay_ms = DIALOG_DISMISS_DELAY.as_millis() as u64,
                "re-show deferred behind active dialog teardown"
            );
            Ok(())
        } else {
            self.handle_show()
        }
    }

    /// Processes one message delivered by the owning loop.
    pub fn handle_message(&mut self, message: MenuMessage) -> Result<()> {
        match message {
            MenuMessage::Show => self.handle_show(),
            MenuMessage::Dismiss => {
                if self.session.is_some() {
                    self.teardown_session();
                }
                Ok(())
            }
            MenuMessage::Refresh => {
                if let Some(list) = &self.session {
                    self.host.refresh(list.filtered(VisibilityContext::new(
                        self.keyguard_showing,
                        self.device_provisioned,
                    )));
                }
                Ok(())
            }
        }
    }

    fn handle_show(&mut self) -> Result<()> {
        let list = build_action_list(
            self.catalog.as_ref(),
            &self.keys.action_keys(),
            &self.controls,
        );
        let view = list.filtered(self.context());

        // A lone single-press entry is pressed outright instead of presenting
        // a one-item menu. Nothing is shown and no session is kept.
        if view.count() == 1 && !view.item(0).supports_long_press() {
            let action = view.item(0);
            debug!(key = action.key(), "single visible action, pressing directly");
            return action.press();
        }

        debug!(visible = view.count(), "presenting menu");
        self.host.present(view);
        self.session = Some(list);
        self.controls.on_menu_shown();
        Ok(())
    }

    /// Press on the `index`-th visible row. The dialog is dismissed before
    /// the effect runs; effect failures propagate to the caller.
    pub fn on_item_press(&mut self, index: usize) -> Result<()> {
        let Some(list) = self.session.take() else {
            warn!(index, "press event without an active session, ignoring");
            return Ok(());
        };
        let action = list.filtered(self.context()).item(index);
        self.host.dismiss();
        debug!(key = action.key(), "dispatching press");
        action.press()
    }

    /// Long press on the `index`-th visible row. Rows without long-press
    /// capability report unhandled and the dialog stays up; capable rows are
    /// dismissed first and report their handler's verdict.
    pub fn on_item_long_press(&mut self, index: usize) -> bool {
        let supported = match &self.session {
            Some(list) => list.filtered(self.context()).item(index).supports_long_press(),
            None => {
                warn!(index, "long-press event without an active session, ignoring");
                return false;
            }
        };
        if !supported {
            return false;
        }
        let Some(list) = self.session.take() else {
            return false;
        };
        self.host.dismiss();
        let handled = list.filtered(self.context()).item(index).long_press();
        debug!(handled, "dispatched long press");
        handled
    }

    /// Host notification that dismissal visuals finished.
    pub fn on_dismissed(&mut self) {
        self.controls.on_menu_hidden();
    }

    /// Reaction to a system-wide dialog-closing event. Signals carrying the
    /// menu's own dismissal reason are its own doing and are ignored; all
    /// others queue a dismiss.
    pub fn handle_signal(&mut self, signal: SystemSignal) {
        if signal.reason() == Some(DISMISS_REASON_POWER_MENU) {
            return;
        }
        debug!(?signal, "queueing dismiss for system signal");
        self.queue.post(MenuMessage::Dismiss);
    }

    /// Configuration provider change notification. The key list itself is
    /// re-read on the next build; the active presentation gets a refresh.
    pub fn notify_config_changed(&self) {
        self.queue.post(MenuMessage::Refresh);
    }

    pub fn is_presenting(&self) -> bool {
        self.session.is_some()
    }

    /// Visible row count of the active session, if any.
    pub fn visible_count(&self) -> Option<usize> {
        self.session
            .as_ref()
            .map(|list| list.filtered(self.context()).count())
    }

    fn context(&self) -> VisibilityContext {
        VisibilityContext::new(self.keyguard_showing, self.device_provisioned)
    }

    fn teardown_session(&mut self) {
        self.host.dismiss();
        self.session = None;
        debug!("menu session torn down");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
