use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::error;

use crate::action::MenuAction;
use crate::list::ActionList;

pub const ACTION_KEY_QUICK_RESTART: &str = "quick_restart";
pub const ACTION_KEY_RECOVERY: &str = "recovery";
pub const ACTION_KEY_BOOTLOADER: &str = "bootloader";

/// Reboot hooks and session notifications the built-in actions are wired to.
/// Implementations own the actual system calls; the menu only routes.
pub trait SystemControls: Send + Sync {
    /// Hot restart of the shell session without a full reboot.
    fn quick_restart(&self) -> Result<()>;
    fn reboot_recovery(&self) -> Result<()>;
    fn reboot_bootloader(&self) -> Result<()>;
    fn on_menu_shown(&self);
    fn on_menu_hidden(&self);
}

#[derive(Debug, Error)]
#[error("unrecognized power menu action key: {key}")]
pub struct UnknownActionKey {
    pub key: String,
}

/// Maps one configuration key to its built-in action. All built-ins stay
/// visible on the lock screen but are withheld until the device is
/// provisioned.
pub fn resolve_action(
    key: &str,
    controls: &Arc<dyn SystemControls>,
) -> Result<MenuAction, UnknownActionKey> {
    match key {
        ACTION_KEY_QUICK_RESTART => {
            let controls = Arc::clone(controls);
            Ok(builtin(key, "restart-quick", "Quick restart", move || {
                controls.quick_restart()
            }))
        }
        ACTION_KEY_RECOVERY => {
            let controls = Arc::clone(controls);
            Ok(builtin(key, "restart-recovery", "Reboot to recovery", move || {
                controls.reboot_recovery()
            }))
        }
        ACTION_KEY_BOOTLOADER => {
            let controls = Arc::clone(controls);
            Ok(builtin(
                key,
                "restart-bootloader",
                "Reboot to bootloader",
                move || controls.reboot_bootloader(),
            ))
        }
        _ => Err(UnknownActionKey {
            key: key.to_string(),
        }),
    }
}

fn builtin(
    key: &str,
    icon: &str,
    label: &str,
    on_press: impl Fn() -> Result<()> + Send + Sync + 'static,
) -> MenuAction {
    MenuAction::single_press(key, icon, label, on_press).with_visibility(true, false)
}

/// Resolves one configuration key to its concrete action. [`BuiltinCatalog`]
/// covers the standard reboot set; hosts with additional surfaces layer
/// their own resolver over it and fall back to [`resolve_action`] for the
/// standard keys.
pub trait ActionCatalog: Send + Sync {
    fn resolve(
        &self,
        key: &str,
        controls: &Arc<dyn SystemControls>,
    ) -> Result<MenuAction, UnknownActionKey>;
}

/// The standard reboot actions and nothing else.
pub struct BuiltinCatalog;

impl ActionCatalog for BuiltinCatalog {
    fn resolve(
        &self,
        key: &str,
        controls: &Arc<dyn SystemControls>,
    ) -> Result<MenuAction, UnknownActionKey> {
        resolve_action(key, controls)
    }
}

/// Builds the action list for one show cycle. Unrecognized keys are logged
/// and skipped; any repeated key, recognized or not, is skipped silently
/// after its first occurrence.
pub fn build_action_list(
    catalog: &dyn ActionCatalog,
    keys: &[String],
    controls: &Arc<dyn SystemControls>,
) -> ActionList {
    let mut seen = HashSet::new();
    let mut actions = Vec::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            continue;
        }
        match catalog.resolve(key, controls) {
            Ok(action) => actions.push(action),
            Err(unknown) => error!(key = %unknown.key, "skipping unrecognized action key"),
        }
    }
    ActionList::new(actions)
}
