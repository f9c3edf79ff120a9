// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

/// A fixed-capacity set of slot ids backed by 64-bit words
///
/// Bulk queries over several sets are done word by word with
/// [`SlotSet::assign_words`], so a full pass costs `capacity / 64` steps.
///
/// # Examples
///
/// ```
/// use speck_core::cv::SlotSet;
///
/// let mut used = SlotSet::with_capacity(100);
/// used.insert(3);
/// used.insert(70);
///
/// assert!(used.contains(70));
/// assert_eq!(used.first_vacant(), Some(0));
/// assert_eq!(used.iter().collect::<Vec<_>>(), vec![3, 70]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSet {
    words: Vec<u64>,
    capacity: usize,
}

impl SlotSet {
    /// An empty set able to hold ids `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        SlotSet {
            words: vec![0u64; capacity.div_ceil(64)],
            capacity,
        }
    }

    /// Largest id plus one
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn insert(&mut self, slot: usize) {
        debug_assert!(slot < self.capacity);
        self.words[slot / 64] |= 1u64 << (slot % 64);
    }

    pub fn remove(&mut self, slot: usize) {
        self.words[slot / 64] &= !(1u64 << (slot % 64));
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < self.capacity && self.words[slot / 64] & (1u64 << (slot % 64)) != 0
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of ids in the set
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Smallest id not in the set
    pub fn first_vacant(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != u64::MAX)
            .map(|(i, w)| i * 64 + w.trailing_ones() as usize)
            .filter(|&slot| slot < self.capacity)
    }

    /// Raw word `index`
    pub fn word(&self, index: usize) -> u64 {
        self.words[index]
    }

    /// Number of backing words
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Overwrite every word with `f(index)`
    ///
    /// Bits past the capacity are masked off.
    pub fn assign_words<F>(&mut self, mut f: F)
    where
        F: FnMut(usize) -> u64,
    {
        for (i, w) in self.words.iter_mut().enumerate() {
            *w = f(i);
        }

        let tail = self.capacity % 64;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }

    /// Ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let bit = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(i * 64 + bit)
            })
        })
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_slot_set_vacancy() {
        let mut set = SlotSet::with_capacity(3);
        assert_eq!(set.first_vacant(), Some(0));

        set.insert(0);
        set.insert(1);
        assert_eq!(set.first_vacant(), Some(2));

        set.insert(2);
        assert_eq!(set.first_vacant(), None);

        set.remove(1);
        assert_eq!(set.first_vacant(), Some(1));
    }

    #[test]
    fn test_slot_set_full_word() {
        let mut set = SlotSet::with_capacity(64);
        (0..64).for_each(|i| set.insert(i));

        assert_eq!(set.len(), 64);
        assert_eq!(set.first_vacant(), None);
    }

    #[test]
    fn test_slot_set_spans_words() {
        let mut set = SlotSet::with_capacity(130);
        (0..128).for_each(|i| set.insert(i));

        assert_eq!(set.first_vacant(), Some(128));

        set.insert(129);
        assert_eq!(set.iter().last(), Some(129));
        assert_eq!(set.len(), 129);
    }

    #[test]
    fn test_slot_set_assign_masks_tail() {
        let mut set = SlotSet::with_capacity(5);
        set.assign_words(|_| u64::MAX);

        assert_eq!(set.len(), 5);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

        set.clear();
        assert!(set.is_empty());
    }
}
