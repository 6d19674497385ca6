use std::time::Duration;

pub mod action;
pub mod catalog;
pub mod controller;
pub mod list;

pub use action::{ActionBehavior, LongPressHandler, MenuAction, PressEffect, VisibilityContext};
pub use catalog::{
    build_action_list, resolve_action, ActionCatalog, BuiltinCatalog, SystemControls,
    UnknownActionKey, ACTION_KEY_BOOTLOADER, ACTION_KEY_QUICK_RESTART, ACTION_KEY_RECOVERY,
};
pub use controller::{
    ActionKeySource, DialogHost, MenuMessage, MessageQueue, PowerMenuController, SystemSignal,
};
pub use list::{ActionList, FilteredView};

/// Delay before re-presenting the menu after an active dialog was torn down,
/// so the previous dismissal finishes before the replacement appears.
pub const DIALOG_DISMISS_DELAY: Duration = Duration::from_millis(300);

/// Dismissal reason attached to close-system-dialogs signals raised by the
/// menu itself; such signals must not tear the menu down.
pub const DISMISS_REASON_POWER_MENU: &str = "power-menu";
