use std::collections::HashSet;

use crate::action::{MenuAction, VisibilityContext};

/// Ordered menu entries for one show cycle. Insertion order is configuration
/// order; entries with a key already present are dropped, first wins.
#[derive(Debug)]
pub struct ActionList {
    items: Vec<MenuAction>,
}

impl ActionList {
    pub fn new(actions: Vec<MenuAction>) -> Self {
        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(actions.len());
        for action in actions {
            if seen.insert(action.key().to_string()) {
                items.push(action);
            }
        }
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuAction> {
        self.items.iter()
    }

    pub fn filtered(&self, ctx: VisibilityContext) -> FilteredView<'_> {
        FilteredView {
            items: &self.items,
            ctx,
        }
    }
}

/// Read-only projection of an [`ActionList`] under one [`VisibilityContext`].
/// Membership is recomputed on every query rather than cached, so the view
/// always agrees with the list and context at call time. Linear scans are
/// intentional; the list never holds more than a handful of entries.
#[derive(Clone, Copy)]
pub struct FilteredView<'a> {
    items: &'a [MenuAction],
    ctx: VisibilityContext,
}

impl<'a> FilteredView<'a> {
    pub fn context(&self) -> VisibilityContext {
        self.ctx
    }

    pub fn count(&self) -> usize {
        self.items
            .iter()
            .filter(|action| action.visible_under(self.ctx))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// The `index`-th visible entry, in original list order.
    ///
    /// # Panics
    ///
    /// Panics when `index >= count()`. Count and index must be queried under
    /// the same context; an out-of-range index means the caller desynced from
    /// the filter and there is nothing sensible to recover to.
    pub fn item(&self, index: usize) -> &'a MenuAction {
        let mut filtered = 0;
        for action in self.items {
            if !action.visible_under(self.ctx) {
                continue;
            }
            if filtered == index {
                return action;
            }
            filtered += 1;
        }
        panic!(
            "position {index} out of range of showable actions, filtered count={}, \
             keyguard_showing={}, device_provisioned={}",
            self.count(),
            self.ctx.keyguard_showing,
            self.ctx.device_provisioned,
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a MenuAction> {
        let ctx = self.ctx;
        self.items
            .iter()
            .filter(move |action| action.visible_under(ctx))
    }

    /// Labels to announce for the visible entries, in presentation order.
    pub fn accessibility_labels(&self) -> Vec<&'a str> {
        self.iter()
            .map(|action| action.accessibility_label())
            .collect()
    }
}
