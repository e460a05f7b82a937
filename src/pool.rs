use alloc::vec::Vec;

/// A reusable physical render unit.
///
/// The pool owns the element; hosts mutate its content through the
/// `update_element` callback but must not reparent or destroy it. A released
/// slot keeps its element and is merely flagged hidden, so shrinking the
/// visible range costs an attribute change instead of a DOM removal.
#[derive(Debug)]
pub struct Slot<E> {
    element: E,
    assigned: Option<usize>,
    hidden: bool,
    tick: u64,
}

impl<E> Slot<E> {
    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// The logical index this slot currently represents, if any.
    pub fn index(&self) -> Option<usize> {
        self.assigned
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Owns the fixed collection of render slots and the index -> slot mapping.
///
/// Slots are created lazily through the host factory, never destroyed, and
/// only ever reassigned. Reuse prefers free slots, then the
/// least-recently-assigned slot outside the wanted range.
#[derive(Debug)]
pub struct SlotPool<E> {
    slots: Vec<Slot<E>>,
    tick: u64,
}

impl<E> Default for SlotPool<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SlotPool<E> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            tick: 0,
        }
    }

    /// Number of physical slots created so far. Never decreases.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently representing a logical index.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.assigned.is_some()).count()
    }

    pub fn slot(&self, id: usize) -> &Slot<E> {
        &self.slots[id]
    }

    pub fn for_each_slot(&self, mut f: impl FnMut(&Slot<E>)) {
        for slot in &self.slots {
            f(slot);
        }
    }

    /// Grows the pool to at least `wanted` slots by invoking the host factory
    /// for the missing count. Never shrinks.
    pub fn ensure_capacity(&mut self, wanted: usize, factory: impl FnOnce(usize) -> Vec<E>) {
        let cur = self.slots.len();
        if wanted <= cur {
            return;
        }
        let created = factory(wanted - cur);
        ptrace!(wanted, cur, created = created.len(), "pool grow");
        self.slots.reserve(created.len());
        for element in created {
            self.slots.push(Slot {
                element,
                assigned: None,
                hidden: true,
                tick: 0,
            });
        }
    }

    /// The slot already carrying `index`, if any.
    pub fn slot_for_index(&self, index: usize) -> Option<usize> {
        self.slots.iter().position(|s| s.assigned == Some(index))
    }

    /// Picks a slot that can be recycled for an index in `[first, last]`:
    /// a free slot if one exists, otherwise the least-recently-assigned slot
    /// whose index falls outside the range.
    pub fn reusable_slot(&self, first: usize, last: usize) -> Option<usize> {
        if let Some(id) = self.slots.iter().position(|s| s.assigned.is_none()) {
            return Some(id);
        }
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.assigned.is_some_and(|i| i < first || i > last))
            .min_by_key(|(_, s)| s.tick)
            .map(|(id, _)| id)
    }

    /// Assigns `index` to a slot and invokes the host's update callback.
    ///
    /// Bookkeeping is committed before the callback runs: a callback that
    /// panics leaves the slot assigned, so a later pass re-assigns it cleanly
    /// instead of leaking a live-but-contentless slot.
    pub fn assign(&mut self, id: usize, index: usize, update: impl FnOnce(&mut E, usize)) {
        self.tick += 1;
        let slot = &mut self.slots[id];
        slot.assigned = Some(index);
        slot.hidden = false;
        slot.tick = self.tick;
        update(&mut slot.element, index);
    }

    /// Refreshes the recency of a slot that keeps its current index.
    pub fn touch(&mut self, id: usize) {
        self.tick += 1;
        self.slots[id].tick = self.tick;
    }

    /// Marks a slot hidden and unassigned. The element stays attached.
    pub fn release(&mut self, id: usize) {
        let slot = &mut self.slots[id];
        slot.assigned = None;
        slot.hidden = true;
    }

    /// Releases every slot whose index falls outside `[first, last]`.
    pub fn release_outside(&mut self, first: usize, last: usize) {
        for slot in &mut self.slots {
            if slot.assigned.is_some_and(|i| i < first || i > last) {
                slot.assigned = None;
                slot.hidden = true;
            }
        }
    }

    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.assigned = None;
            slot.hidden = true;
        }
    }
}
