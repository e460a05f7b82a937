use alloc::vec::Vec;

/// Tracks the scroll-axis extent of every logical item and maps indices to
/// cumulative offsets.
///
/// Measured extents are authoritative; items that have never been realized
/// carry the running average of all measurements (or the configured default
/// before any item has been measured). Refining the estimate never moves an
/// already-measured item.
#[derive(Clone, Debug)]
pub struct GeometryModel {
    extents: Vec<u32>,
    measured: Vec<bool>,
    sums: PrefixTree,
    default_extent: u32,
    measured_sum: u64,
    measured_count: usize,
}

impl GeometryModel {
    pub fn new(size: usize, default_extent: u32) -> Self {
        let extents = alloc::vec![default_extent; size];
        let sums = PrefixTree::from_extents(&extents);
        Self {
            measured: alloc::vec![false; size],
            extents,
            sums,
            default_extent,
            measured_sum: 0,
            measured_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.extents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// The running average of all measured extents, rounded to the nearest
    /// unit, or the default before any measurement.
    pub fn estimate_extent(&self) -> u32 {
        if self.measured_count == 0 {
            return self.default_extent;
        }
        let n = self.measured_count as u64;
        ((self.measured_sum + n / 2) / n) as u32
    }

    /// Stores a measured extent for `index` and returns the signed change
    /// against the previously known extent (0 when unchanged or out of range).
    ///
    /// Cached cumulative offsets for indices >= `index` are invalidated by the
    /// prefix-tree update.
    pub fn record_extent(&mut self, index: usize, extent: u32) -> i64 {
        if index >= self.extents.len() {
            return 0;
        }
        let prev = self.extents[index];
        if self.measured[index] {
            self.measured_sum = self
                .measured_sum
                .saturating_sub(prev as u64)
                .saturating_add(extent as u64);
        } else {
            self.measured[index] = true;
            self.measured_count += 1;
            self.measured_sum = self.measured_sum.saturating_add(extent as u64);
        }
        if prev == extent {
            return 0;
        }
        self.extents[index] = extent;
        let delta = extent as i64 - prev as i64;
        self.sums.add(index, delta);
        delta
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    pub fn extent_of(&self, index: usize) -> Option<u32> {
        self.extents.get(index).copied()
    }

    /// Cumulative offset of the start of `index`; the sum of all extents
    /// before it. `index == len` yields the total extent; zero items yield 0.
    pub fn offset_of(&self, index: usize) -> u64 {
        self.sums.prefix(index)
    }

    pub fn total_extent(&self) -> u64 {
        self.sums.total()
    }

    /// The largest index whose start offset is <= `offset`, clamped to the
    /// last item. `None` when there are no items.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let n = self.extents.len();
        if n == 0 {
            return None;
        }
        Some(self.sums.rank(offset).min(n - 1))
    }

    /// Grows or shrinks the logical item count.
    ///
    /// Measured extents in the surviving prefix are preserved; new tail items
    /// take the current running estimate.
    pub fn set_size(&mut self, size: usize) {
        let cur = self.extents.len();
        if size == cur {
            return;
        }
        if size < cur {
            for i in size..cur {
                if self.measured[i] {
                    self.measured_count -= 1;
                    self.measured_sum = self.measured_sum.saturating_sub(self.extents[i] as u64);
                }
            }
            self.extents.truncate(size);
            self.measured.truncate(size);
        } else {
            let estimate = self.estimate_extent();
            self.extents.resize(size, estimate);
            self.measured.resize(size, false);
        }
        self.sums = PrefixTree::from_extents(&self.extents);
    }
}

/// Fenwick tree over item extents: O(log n) point update, prefix sum, and
/// offset -> index rank query.
#[derive(Clone, Debug)]
struct PrefixTree {
    tree: Vec<u64>, // 1-indexed
    total: u64,
    top_bit: usize,
}

impl PrefixTree {
    fn from_extents(extents: &[u32]) -> Self {
        let n = extents.len();
        let mut tree = alloc::vec![0u64; n + 1];
        let mut total = 0u64;
        for i in 1..=n {
            let v = extents[i - 1] as u64;
            total = total.saturating_add(v);
            tree[i] = tree[i].saturating_add(v);
            let parent = i + lowest_bit(i);
            if parent <= n {
                tree[parent] = tree[parent].saturating_add(tree[i]);
            }
        }
        Self {
            tree,
            total,
            top_bit: top_bit(n),
        }
    }

    fn len(&self) -> usize {
        self.tree.len() - 1
    }

    fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n {
            return;
        }
        if delta > 0 {
            self.total = self.total.saturating_add(delta as u64);
        } else {
            self.total = self.total.saturating_sub(delta.unsigned_abs());
        }
        let mut i = index + 1;
        while i <= n {
            let next = self.tree[i] as i128 + delta as i128;
            debug_assert!(next >= 0, "prefix tree underflow (i={i}, delta={delta})");
            self.tree[i] = next.clamp(0, u64::MAX as i128) as u64;
            i += lowest_bit(i);
        }
    }

    fn prefix(&self, count: usize) -> u64 {
        let mut i = count.min(self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    fn total(&self) -> u64 {
        self.total
    }

    /// Number of items whose cumulative end is <= `target`; equivalently the
    /// index of the item containing `target` (unclamped).
    fn rank(&self, mut target: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        let mut idx = 0usize;
        let mut bit = self.top_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lowest_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn top_bit(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
