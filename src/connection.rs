/// Lifecycle sentinel deduplicating attach/detach reports.
///
/// Hosts forward their connected/disconnected callbacks here; the observer
/// reports each state exactly once, so the engine's `Detached` <-> `Idle`
/// transition never fires twice for the same state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectionObserver {
    state: Option<bool>,
}

impl ConnectionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the host's current connectedness. Returns `Some(attached)` on
    /// a transition, `None` for a duplicate report.
    pub fn observe(&mut self, attached: bool) -> Option<bool> {
        if self.state == Some(attached) {
            return None;
        }
        self.state = Some(attached);
        Some(attached)
    }

    pub fn is_attached(&self) -> bool {
        self.state == Some(true)
    }
}
