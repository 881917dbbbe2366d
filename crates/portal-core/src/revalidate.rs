//! Revalidation gates for loader data
//!
//! After a route action completes, the framework asks each active loader
//! whether its data is stale. A gate answers `false` for the action tags it
//! suppresses (the screen already patched its state from the action result)
//! and defers to the framework's own decision for everything else.

use crate::error::{Error, Result};
use crate::types::{ActionOutcome, ActionType};

/// Fixed suppression set guarding one read view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidationGate {
    view: &'static str,
    suppressed: &'static [ActionType],
}

impl RevalidationGate {
    /// Content detail: saving items keeps the edited table authoritative
    pub const CONTENT_DETAIL: RevalidationGate = RevalidationGate {
        view: "content-detail",
        suppressed: &[ActionType::Save],
    };

    /// Content list: row-level actions are applied in place
    pub const CONTENT_LIST: RevalidationGate = RevalidationGate {
        view: "content-list",
        suppressed: &[
            ActionType::Rename,
            ActionType::CreateAsset,
            ActionType::Publish,
            ActionType::PublishVisualize,
            ActionType::CreateChat,
            ActionType::Duplicate,
        ],
    };

    /// Every registered gate
    pub const ALL: [RevalidationGate; 2] = [Self::CONTENT_DETAIL, Self::CONTENT_LIST];

    /// Look up a gate by view name
    pub fn for_view(view: &str) -> Result<RevalidationGate> {
        Self::ALL
            .iter()
            .copied()
            .find(|gate| gate.view == view)
            .ok_or_else(|| Error::unknown_view(view))
    }

    /// Name of the view this gate guards
    pub fn view(&self) -> &'static str {
        self.view
    }

    /// Tags for which refetching is suppressed
    pub fn suppressed(&self) -> &'static [ActionType] {
        self.suppressed
    }

    /// Whether `action` is in the suppression set
    pub fn suppresses(&self, action: ActionType) -> bool {
        self.suppressed.contains(&action)
    }

    /// Decide revalidation from the prior action's tag
    ///
    /// Returns `false` for suppressed tags, `default` otherwise (including
    /// when there was no tagged action).
    pub fn should_revalidate(&self, action: Option<ActionType>, default: bool) -> bool {
        match action {
            Some(action) if self.suppresses(action) => false,
            _ => default,
        }
    }

    /// Same as [`should_revalidate`](Self::should_revalidate) for a raw wire tag
    ///
    /// Tags outside the vocabulary fall through to `default`.
    pub fn should_revalidate_tag(&self, tag: Option<&str>, default: bool) -> bool {
        self.should_revalidate(tag.and_then(ActionType::from_tag), default)
    }

    /// Decide revalidation from the action result handed over by the framework
    pub fn should_revalidate_after(&self, outcome: Option<&ActionOutcome>, default: bool) -> bool {
        self.should_revalidate(outcome.and_then(ActionOutcome::action), default)
    }
}

impl std::fmt::Display for RevalidationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.view)
    }
}
