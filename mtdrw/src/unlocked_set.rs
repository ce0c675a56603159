//! Membership set over device indices.

/// Records which device indices the unlock pass changed.
///
/// Backed by a word array sized at construction, so the device bound is a
/// configuration choice rather than a machine word width. Indices at or
/// past the domain are a caller bug and panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedSet {
    domain: usize,
    words: Vec<u64>,
}

impl UnlockedSet {
    /// Create an empty set over `0..domain`.
    pub fn new(domain: usize) -> Self {
        Self {
            domain,
            words: vec![0u64; domain.div_ceil(u64::BITS as usize)],
        }
    }

    /// Exclusive upper bound on member indices.
    pub fn domain(&self) -> usize {
        self.domain
    }

    /// Whether `index` is a member.
    pub fn contains(&self, index: usize) -> bool {
        assert!(index < self.domain);
        let (word, mask) = location(index);
        self.words[word] & mask != 0
    }

    /// Add `index`. Returns true if it was not already a member.
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.domain);
        let (word, mask) = location(index);
        let prev = self.words[word];
        self.words[word] = prev | mask;
        prev & mask == 0
    }

    /// Remove `index`. Returns true if it was a member.
    pub fn remove(&mut self, index: usize) -> bool {
        assert!(index < self.domain);
        let (word, mask) = location(index);
        let prev = self.words[word];
        self.words[word] = prev & !mask;
        prev & mask != 0
    }

    /// Whether no index is a member.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Number of member indices.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

fn location(index: usize) -> (usize, u64) {
    let word = index / u64::BITS as usize;
    let mask = 1u64 << (index % u64::BITS as usize);
    (word, mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut set = UnlockedSet::new(64);
        assert!(set.is_empty());
        assert!(!set.contains(3));

        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.contains(3));
        assert_eq!(set.len(), 1);

        assert!(set.remove(3));
        assert!(!set.remove(3));
        assert!(set.is_empty());
    }

    #[test]
    fn domain_not_tied_to_word_width() {
        let mut set = UnlockedSet::new(100);
        assert_eq!(set.domain(), 100);

        assert!(set.insert(0));
        assert!(set.insert(63));
        assert!(set.insert(64));
        assert!(set.insert(99));
        assert_eq!(set.len(), 4);
        assert!(set.contains(64));
        assert!(!set.contains(65));
    }

    #[test]
    #[should_panic]
    fn out_of_domain_index_panics() {
        let set = UnlockedSet::new(8);
        set.contains(8);
    }
}
