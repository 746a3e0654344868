//! Transposition table: a 4-way bucketed cache mapping a position's Zobrist
//! hash to the best move, score, depth and bound kind found for it.
//!
//! Entries are packed into 8 bytes so that a bucket of 4 is exactly 32
//! bytes. The table is read and written without per-entry locks (§5):
//! a torn read just fails the `hash16` fingerprint check and is discarded,
//! and a stale best move is re-validated with `move_is_pseudo_legal` before
//! it is ever played.

use std::mem;

use crate::board::Move;

/// Ply at which the search stops recursing; also the window inside which a
/// score counts as "near mate" for `value_to_tt`/`value_from_tt`.
pub const MAX_HEIGHT: i32 = 128;
/// Score magnitude of an immediate checkmate.
pub const MATE: i32 = 32_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Bound {
    /// Exact score (PV node).
    Exact = 0,
    /// Score is a lower bound (fail-high / cut node).
    Lower = 1,
    /// Score is an upper bound (fail-low / all node).
    Upper = 2,
}

impl Bound {
    const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Bound::Exact,
            1 => Bound::Lower,
            _ => Bound::Upper,
        }
    }
}

/// Adjust a mate score from "distance from the root" to "distance from this
/// node" before storing it, so that a TT hit at a different ply still
/// reconstructs a correct mate distance.
#[inline]
#[must_use]
pub fn value_to_tt(value: i32, height: i32) -> i32 {
    if value >= MATE - MAX_HEIGHT {
        value + height
    } else if value <= -MATE + MAX_HEIGHT {
        value - height
    } else {
        value
    }
}

/// Inverse of [`value_to_tt`].
#[inline]
#[must_use]
pub fn value_from_tt(value: i32, height: i32) -> i32 {
    if value >= MATE - MAX_HEIGHT {
        value - height
    } else if value <= -MATE + MAX_HEIGHT {
        value + height
    } else {
        value
    }
}

/// One packed 8-byte transposition entry.
#[derive(Clone, Copy)]
#[repr(C)]
struct Entry {
    value: i16,
    depth: u8,
    /// bits 0-1: bound kind, bits 2-7: generation.
    info: u8,
    best_move: u16,
    hash16: u16,
}

const _: () = assert!(mem::size_of::<Entry>() == 8);

impl Entry {
    const EMPTY: Entry = Entry {
        value: 0,
        depth: 0,
        info: 0,
        best_move: 0,
        hash16: 0,
    };

    #[inline]
    fn is_empty(self) -> bool {
        self.hash16 == 0 && self.depth == 0 && self.best_move == 0 && self.value == 0
    }

    #[inline]
    fn generation(self) -> u8 {
        self.info >> 2
    }

    #[inline]
    fn bound(self) -> Bound {
        Bound::from_bits(self.info)
    }
}

/// A probed transposition entry, with the mate score already relative to
/// the querying ply.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    pub depth: u8,
    pub value: i32,
    pub bound: Bound,
    pub best_move: Move,
}

pub struct TranspositionTable {
    buckets: Vec<[Entry; 4]>,
    mask: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Build a table sized to the largest power-of-two bucket count that
    /// fits in `size_mb` megabytes. A zero or tiny budget is clamped to a
    /// minimum viable table rather than treated as an error (§7: allocation
    /// in safe Rust either succeeds or aborts on OOM, which already
    /// satisfies "fatal").
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bucket_size = mem::size_of::<[Entry; 4]>();
        let budget_bytes = size_mb.max(1) * 1024 * 1024;
        let mut num_buckets = (budget_bytes / bucket_size).next_power_of_two();
        if num_buckets == 0 {
            num_buckets = 1;
        }
        #[cfg(feature = "logging")]
        log::info!(
            "transposition table: {num_buckets} buckets ({} MB requested)",
            size_mb
        );
        TranspositionTable {
            buckets: vec![[Entry::EMPTY; 4]; num_buckets],
            mask: num_buckets - 1,
            generation: 0,
        }
    }

    #[inline]
    fn bucket_index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    #[inline]
    fn fingerprint(hash: u64) -> u16 {
        (hash >> 48) as u16
    }

    /// Age the table for a new root search. Generation wraps at 6 bits,
    /// matching the `info` byte's 6-bit generation field.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1) & 0x3F;
    }

    /// Zero every entry (position-reset / `ucinewgame` command).
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = [Entry::EMPTY; 4];
        }
        self.generation = 0;
    }

    /// Look up `hash`, adjusting any mate score to be relative to `height`.
    /// On hit, the entry's generation is refreshed so it is not reaped as
    /// stale by the next store into its bucket.
    pub fn probe(&mut self, hash: u64, height: i32) -> Option<Probe> {
        let fp = Self::fingerprint(hash);
        let idx = self.bucket_index(hash);
        let gen = self.generation;
        let bucket = &mut self.buckets[idx];
        for entry in bucket.iter_mut() {
            if !entry.is_empty() && entry.hash16 == fp {
                entry.info = (gen << 2) | (entry.info & 0x3);
                return Some(Probe {
                    depth: entry.depth,
                    value: value_from_tt(entry.value as i32, height),
                    bound: entry.bound(),
                    best_move: Move::from_u16(entry.best_move),
                });
            }
        }
        None
    }

    /// Store a search result. Replacement order: empty slot, then matching
    /// fingerprint, then the slot minimizing `depth - 2*(64 + gen -
    /// entryAge)` (oldest and shallowest first).
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        hash: u64,
        height: i32,
        depth: u8,
        value: i32,
        bound: Bound,
        best_move: Move,
    ) {
        let fp = Self::fingerprint(hash);
        let idx = self.bucket_index(hash);
        let gen = self.generation;
        let bucket = &mut self.buckets[idx];

        let mut replace = 0usize;
        let mut found_empty_or_match = false;
        let mut worst_priority = i32::MAX;

        for (i, entry) in bucket.iter().enumerate() {
            if entry.is_empty() || entry.hash16 == fp {
                replace = i;
                found_empty_or_match = true;
                break;
            }
            let age = (64u16 + gen as u16).wrapping_sub(entry.generation() as u16) as i32;
            let priority = entry.depth as i32 - 2 * age;
            if priority < worst_priority {
                worst_priority = priority;
                replace = i;
            }
        }
        let _ = found_empty_or_match;

        bucket[replace] = Entry {
            value: value_to_tt(value, height) as i16,
            depth,
            info: (gen << 2) | (bound as u8),
            best_move: best_move.as_u16(),
            hash16: fp,
        };
    }

    /// Per-mille occupancy, estimated from the first 1250 buckets only
    /// (matches the reference engine's `hashfull`, which is meant to be a
    /// cheap approximation reported every UCI `info` line, not an exact
    /// scan of a potentially huge table).
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sampled = self.buckets.len().min(1250);
        if sampled == 0 {
            return 0;
        }
        let filled: usize = self.buckets[..sampled]
            .iter()
            .flat_map(|b| b.iter())
            .filter(|e| !e.is_empty())
            .count();
        ((filled as u64 * 1000) / (sampled as u64 * 4)) as u32
    }

    #[must_use]
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }
}
