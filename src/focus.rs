use alloc::vec::Vec;

use crate::TabDirection;

/// Capability interface for nodes participating in focus-order computation.
///
/// This stands in for host-specific DOM APIs: a node exposes its light
/// children, an optional attached content root (shadow subtree) to recurse
/// into, and the predicates feeding focusability. Implementations are handles
/// (cheap clones of the same underlying node).
pub trait FocusNode: Clone {
    fn children(&self) -> Vec<Self>;

    /// The node's attached content root, if it hosts a nested subtree.
    /// Traversal descends into it in document order, before light children.
    fn content_root(&self) -> Option<Self>;

    /// `None` when the node never participates in tab order. Negative values
    /// keep the node out of the ring while leaving it in the tree.
    fn tab_index(&self) -> Option<i32>;

    fn disabled(&self) -> bool;

    /// Hidden nodes and their entire subtrees are skipped.
    fn hidden(&self) -> bool;

    /// Identity comparison; ring membership is by identity, not equality.
    fn same_node(&self, other: &Self) -> bool;

    fn focus(&self);
}

/// Computes the ordered focusable-element list for `root`.
///
/// Natural tab order: elements with an explicit positive tab index sort first
/// (ascending), then default-order elements in document order. Elements with a
/// negative tab index are excluded.
pub fn focusable_elements<N: FocusNode>(root: &N) -> Vec<N> {
    let mut out = Vec::new();
    collect(root, &mut out);
    // Stable sort keeps document order within each tab-index group.
    out.sort_by_key(|n| match n.tab_index() {
        Some(t) if t > 0 => t as i64,
        _ => i64::MAX,
    });
    out
}

fn collect<N: FocusNode>(node: &N, out: &mut Vec<N>) {
    if node.hidden() {
        return;
    }
    if !node.disabled() && matches!(node.tab_index(), Some(t) if t >= 0) {
        out.push(node.clone());
    }
    if let Some(shadow) = node.content_root() {
        collect(&shadow, out);
    }
    for child in node.children() {
        collect(&child, out);
    }
}

/// Cycles keyboard focus through the focusable elements of a contained
/// subtree, wrapping at the ends.
///
/// The cached ring must be rebuilt whenever the trapped content changes --
/// in particular after any virtualizer flush that recycled slot elements,
/// since ring membership is compared by identity.
#[derive(Debug)]
pub struct FocusTrap<N> {
    fallback: N,
    enabled: bool,
    ring: Vec<N>,
}

impl<N: FocusNode> FocusTrap<N> {
    /// `fallback` receives focus when the trapped region has no focusable
    /// descendants.
    pub fn new(fallback: N) -> Self {
        Self {
            fallback,
            enabled: false,
            ring: Vec::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Gates whether Tab keys are intercepted at all.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Recomputes the ring from `root`. An empty result falls back to the
    /// designated container, which then occupies list position 0.
    pub fn rebuild(&mut self, root: &N) {
        self.ring = focusable_elements(root);
        if self.ring.is_empty() {
            self.ring.push(self.fallback.clone());
        }
        pdebug!(ring = self.ring.len(), "focus trap rebuilt");
    }

    pub fn ring(&self) -> &[N] {
        &self.ring
    }

    /// Rebuilds the ring and moves focus to its first element. Called when
    /// the trap opens. Returns the focused element, or `None` while disabled.
    pub fn activate(&mut self, root: &N) -> Option<N> {
        self.rebuild(root);
        if !self.enabled {
            return None;
        }
        let first = self.ring[0].clone();
        first.focus();
        Some(first)
    }

    /// Index of `active` within the last computed ring, or `None` when the
    /// focused element is outside the trap or the trap is inactive.
    pub fn focused_index(&self, active: Option<&N>) -> Option<usize> {
        if !self.enabled {
            return None;
        }
        let active = active?;
        self.ring.iter().position(|n| n.same_node(active))
    }

    /// Moves focus to the next ring element in `direction`, wrapping at the
    /// ends, and returns it. A `current` outside the ring (focus on the
    /// container itself, say) restarts from the respective end.
    pub fn cycle_tab(&self, current: Option<&N>, direction: TabDirection) -> Option<N> {
        if !self.enabled || self.ring.is_empty() {
            return None;
        }
        let len = self.ring.len();
        let pos = current.and_then(|c| self.ring.iter().position(|n| n.same_node(c)));
        let next = match (pos, direction) {
            (Some(i), TabDirection::Forward) => (i + 1) % len,
            (Some(i), TabDirection::Backward) => (i + len - 1) % len,
            (None, TabDirection::Forward) => 0,
            (None, TabDirection::Backward) => len - 1,
        };
        let target = self.ring[next].clone();
        target.focus();
        Some(target)
    }
}
