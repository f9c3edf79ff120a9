// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::cv::{Blob, ScanStatus, SlotSet};

/// A fixed-capacity pool of blob accumulators with union-by-relabel merging
///
/// Every slot carries three lifecycle tags held as pool-wide bit-sets:
/// `used` (holds live data), `root` (canonical representative of its merge
/// group) and `touched` (received a pixel during the current row). The root
/// table maps each slot straight to its current root; merging rewrites the
/// whole table instead of compressing paths, so lookups never chase chains.
///
/// # Examples
///
/// ```
/// use speck_core::cv::SlotPool;
///
/// let mut pool = SlotPool::new(4);
///
/// let a = pool.allocate(0, 0, 1.0).unwrap();
/// let b = pool.allocate(5, 0, 1.0).unwrap();
/// pool.merge_into(a, b);
///
/// assert_eq!(pool.root_of(b), a);
/// assert_eq!(pool.blob(a).count, 2);
/// assert!(!pool.is_root(b));
/// ```
#[derive(Debug, Clone)]
pub struct SlotPool {
    blobs: Vec<Blob>,
    roots: Vec<usize>,
    used: SlotSet,
    root: SlotSet,
    touched: SlotSet,
    free_ready: SlotSet,
    output_ready: SlotSet,
}

impl SlotPool {
    /// A pool with `capacity` slots, all free
    pub fn new(capacity: usize) -> Self {
        SlotPool {
            blobs: vec![Blob::default(); capacity],
            roots: (0..capacity).collect(),
            used: SlotSet::with_capacity(capacity),
            root: SlotSet::with_capacity(capacity),
            touched: SlotSet::with_capacity(capacity),
            free_ready: SlotSet::with_capacity(capacity),
            output_ready: SlotSet::with_capacity(capacity),
        }
    }

    /// Release every slot
    pub fn reset(&mut self) {
        self.used.clear();
        self.root.clear();
        self.touched.clear();
        self.free_ready.clear();
        self.output_ready.clear();
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.blobs.len()
    }

    /// Number of slots currently holding live data
    pub fn open(&self) -> usize {
        self.used.len()
    }

    pub fn blob(&self, slot: usize) -> &Blob {
        &self.blobs[slot]
    }

    pub fn root_of(&self, slot: usize) -> usize {
        self.roots[slot]
    }

    pub fn is_used(&self, slot: usize) -> bool {
        self.used.contains(slot)
    }

    pub fn is_root(&self, slot: usize) -> bool {
        self.root.contains(slot)
    }

    pub fn is_touched(&self, slot: usize) -> bool {
        self.touched.contains(slot)
    }

    /// Claim the first free slot and seed it with one pixel
    ///
    /// The new slot is used, its own root, and touched for this row. Returns
    /// [`ScanStatus::TooManyOpenBlobs`] when every slot is in use.
    pub fn allocate(&mut self, x: u32, y: u32, intensity: f64) -> Result<usize, ScanStatus> {
        let slot = self
            .used
            .first_vacant()
            .ok_or(ScanStatus::TooManyOpenBlobs)?;

        self.blobs[slot] = Blob::seed(x, y, intensity);
        self.roots[slot] = slot;
        self.used.insert(slot);
        self.root.insert(slot);
        self.touched.insert(slot);

        Ok(slot)
    }

    /// Fold `absorbed` into `root` and relabel every slot that pointed at it
    ///
    /// The absorbed slot stays used but loses its root tag; it is reclaimed
    /// at the first row boundary where nothing touched it.
    pub fn merge_into(&mut self, root: usize, absorbed: usize) {
        if root == absorbed {
            return;
        }

        let other = self.blobs[absorbed];
        self.blobs[root].absorb(&other);
        self.root.remove(absorbed);
        self.touched.insert(root);

        for entry in self.roots.iter_mut() {
            if *entry == absorbed {
                *entry = root;
            }
        }
    }

    /// Extend `slot` by one pixel and mark it and its root touched
    pub fn add_pixel(&mut self, slot: usize, x: u32, y: u32, intensity: f64) {
        self.blobs[slot].push(x, y, intensity);
        self.touch(slot);
    }

    /// Mark `slot` and its current root as touched for this row
    pub fn touch(&mut self, slot: usize) {
        self.touched.insert(slot);
        self.touched.insert(self.roots[slot]);
    }

    /// Classify slots at a row boundary
    ///
    /// Ready-to-free slots are used, merged away, and untouched. Ready-to-output
    /// slots are used roots that were untouched. With `drain` the touched tag
    /// is ignored and the pool ends empty.
    fn classify(&mut self, drain: bool) {
        let (used, root, touched) = (&self.used, &self.root, &self.touched);
        let untouched = |i: usize| if drain { u64::MAX } else { !touched.word(i) };

        self.free_ready
            .assign_words(|i| used.word(i) & !root.word(i) & untouched(i));

        self.output_ready
            .assign_words(|i| used.word(i) & root.word(i) & untouched(i));
    }

    /// Release finished slots, handing every completed root to `emit`
    ///
    /// Stops at the first error returned by `emit`. The touched tags are
    /// cleared afterwards so the next row starts fresh.
    pub fn flush<F>(&mut self, drain: bool, mut emit: F) -> Result<(), ScanStatus>
    where
        F: FnMut(&Blob) -> Result<(), ScanStatus>,
    {
        self.classify(drain);

        for slot in self.free_ready.iter() {
            self.used.remove(slot);
        }

        for slot in self.output_ready.iter() {
            self.used.remove(slot);
            self.root.remove(slot);
            emit(&self.blobs[slot])?;
        }

        self.touched.clear();

        Ok(())
    }
}
