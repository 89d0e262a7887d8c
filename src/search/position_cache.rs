//! Bounded position cache keyed by the search Zobrist key.
//!
//! Direct indexing with depth-preferred replacement and generation aging. The
//! search clears it at the start of every top-level call, since scores from an
//! unrelated root are not comparable.

use crate::game_state::chess_types::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub lookups: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct PositionCache {
    entries: Vec<Option<CacheEntry>>,
    generations: Vec<u8>,
    current_generation: u8,
    stats: CacheStats,
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::with_entries(Self::DEFAULT_ENTRIES)
    }
}

impl PositionCache {
    pub const DEFAULT_ENTRIES: usize = 1 << 16;
    const AGE_REPLACE_THRESHOLD: u8 = 4;
    const DEPTH_REPLACE_MARGIN: u8 = 2;

    pub fn with_entries(count: usize) -> Self {
        let count = count.max(1);
        Self {
            entries: vec![None; count],
            generations: vec![0; count],
            current_generation: 0,
            stats: CacheStats::default(),
        }
    }

    /// Advance the generation (once per iterative-deepening iteration).
    #[inline]
    pub fn new_generation(&mut self) {
        self.current_generation = self.current_generation.wrapping_add(1);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.generations.fill(0);
        self.current_generation = 0;
        self.stats = CacheStats::default();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    pub fn lookup(&mut self, key: u64) -> Option<CacheEntry> {
        self.stats.lookups += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
            self.generations[idx] = self.current_generation;
        }
        hit
    }

    pub fn store(&mut self, entry: CacheEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        let replace = match self.entries[idx] {
            None => true,
            Some(existing) if existing.key == entry.key => entry.depth >= existing.depth,
            Some(existing) => {
                let age = self.current_generation.wrapping_sub(self.generations[idx]);
                age >= Self::AGE_REPLACE_THRESHOLD
                    || entry.depth.saturating_add(Self::DEPTH_REPLACE_MARGIN) >= existing.depth
            }
        };
        if replace {
            self.entries[idx] = Some(entry);
            self.generations[idx] = self.current_generation;
        }
    }
}
