use std::fmt;
use std::sync::Arc;

use anyhow::Result;

pub type PressEffect = Arc<dyn Fn() -> Result<()> + Send + Sync>;
pub type LongPressHandler = Arc<dyn Fn() -> bool + Send + Sync>;

/// Gesture support of a menu entry. Long-press capable entries still carry a
/// regular press effect; the two handlers are independent.
#[derive(Clone)]
pub enum ActionBehavior {
    SinglePress {
        on_press: PressEffect,
    },
    LongPress {
        on_press: PressEffect,
        on_long_press: LongPressHandler,
    },
}

impl ActionBehavior {
    fn kind(&self) -> &'static str {
        match self {
            ActionBehavior::SinglePress { .. } => "single_press",
            ActionBehavior::LongPress { .. } => "long_press",
        }
    }
}

impl fmt::Debug for ActionBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Display conditions supplied by the caller at show time. Replaced only by a
/// fresh `show_dialog`, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityContext {
    pub keyguard_showing: bool,
    pub device_provisioned: bool,
}

impl VisibilityContext {
    pub fn new(keyguard_showing: bool, device_provisioned: bool) -> Self {
        Self {
            keyguard_showing,
            device_provisioned,
        }
    }
}

/// One selectable menu entry: identity key, presentation fields, display
/// conditions, and its press behavior. Built once per show cycle and
/// immutable afterwards.
#[derive(Clone)]
pub struct MenuAction {
    key: String,
    icon: String,
    label: String,
    status: Option<String>,
    show_during_keyguard: bool,
    show_before_provisioning: bool,
    enabled: bool,
    behavior: ActionBehavior,
}

impl MenuAction {
    pub fn single_press(
        key: impl Into<String>,
        icon: impl Into<String>,
        label: impl Into<String>,
        on_press: impl Fn() -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self::with_behavior(
            key,
            icon,
            label,
            ActionBehavior::SinglePress {
                on_press: Arc::new(on_press),
            },
        )
    }

    pub fn long_press_capable(
        key: impl Into<String>,
        icon: impl Into<String>,
        label: impl Into<String>,
        on_press: impl Fn() -> Result<()> + Send + Sync + 'static,
        on_long_press: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::with_behavior(
            key,
            icon,
            label,
            ActionBehavior::LongPress {
                on_press: Arc::new(on_press),
                on_long_press: Arc::new(on_long_press),
            },
        )
    }

    fn with_behavior(
        key: impl Into<String>,
        icon: impl Into<String>,
        label: impl Into<String>,
        behavior: ActionBehavior,
    ) -> Self {
        Self {
            key: key.into(),
            icon: icon.into(),
            label: label.into(),
            status: None,
            show_during_keyguard: false,
            show_before_provisioning: false,
            enabled: true,
            behavior,
        }
    }

    pub fn with_visibility(mut self, during_keyguard: bool, before_provisioning: bool) -> Self {
        self.show_during_keyguard = during_keyguard;
        self.show_before_provisioning = before_provisioning;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn show_during_keyguard(&self) -> bool {
        self.show_during_keyguard
    }

    pub fn show_before_provisioning(&self) -> bool {
        self.show_before_provisioning
    }

    pub fn supports_long_press(&self) -> bool {
        matches!(self.behavior, ActionBehavior::LongPress { .. })
    }

    /// Text announced by a screen reader for this entry.
    pub fn accessibility_label(&self) -> &str {
        &self.label
    }

    /// Whether this entry appears under the given display conditions.
    pub fn visible_under(&self, ctx: VisibilityContext) -> bool {
        (!ctx.keyguard_showing || self.show_during_keyguard)
            && (ctx.device_provisioned || self.show_before_provisioning)
    }

    /// Runs the press effect once. Effect failures are returned untouched;
    /// the caller decides what a failed press means for the session.
    pub fn press(&self) -> Result<()> {
        match &self.behavior {
            ActionBehavior::SinglePress { on_press }
            | ActionBehavior::LongPress { on_press, .. } => on_press(),
        }
    }

    /// Runs the long-press handler and reports whether it handled the
    /// gesture. Entries without long-press capability report `false` and no
    /// effect runs, not even the press effect.
    pub fn long_press(&self) -> bool {
        match &self.behavior {
            ActionBehavior::SinglePress { .. } => false,
            ActionBehavior::LongPress { on_long_press, .. } => on_long_press(),
        }
    }
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuAction")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("show_during_keyguard", &self.show_during_keyguard)
            .field("show_before_provisioning", &self.show_before_provisioning)
            .field("enabled", &self.enabled)
            .field("behavior", &self.behavior)
            .finish()
    }
}
