//! Magic bitboards for sliding-piece (bishop/rook/queen) attacks.
//!
//! Each square has a "relevant occupancy" mask (the squares a blocker on that
//! ray could actually occupy, excluding the board edge since an edge square
//! always blocks regardless of what's past it). Multiplying the occupied
//! bits within that mask by a precomputed 64-bit magic constant and shifting
//! down scrambles them into a dense, collision-free index into a per-square
//! attack table. The magics are found once at table-construction time by
//! trying random sparse candidates until one produces no collisions against
//! the brute-force ray-cast attacks, using a fixed-seed RNG so table
//! construction is deterministic across runs.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn sliding_mask(sq: usize, dirs: [(i32, i32); 4], edge_exclusive: bool) -> u64 {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut mask = 0u64;
    for (dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        loop {
            let (next_r, next_f) = (r + dr, f + df);
            let in_bounds = (0..8).contains(&r) && (0..8).contains(&f);
            if !in_bounds {
                break;
            }
            if edge_exclusive {
                // Stop before the last square along this ray: a blocker on
                // the final rank/file doesn't change where the ray stops
                // (there's nothing beyond the edge to disambiguate), so it
                // isn't part of the relevant-occupancy mask.
                let next_in_bounds = (0..8).contains(&next_r) && (0..8).contains(&next_f);
                if !next_in_bounds {
                    break;
                }
            }
            mask |= 1u64 << (r * 8 + f);
            r = next_r;
            f = next_f;
        }
    }
    mask
}

/// Brute-force ray-cast attacks for `sq` given the full board occupancy,
/// stopping at (and including) the first blocker in each direction.
fn slow_attacks(sq: usize, occupied: u64, dirs: [(i32, i32); 4]) -> u64 {
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut attacks = 0u64;
    for (dr, df) in dirs {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Enumerate the `index`-th subset of the bits set in `mask`.
fn occupancy_subset(index: usize, mask: u64) -> u64 {
    let mut subset = 0u64;
    let mut m = mask;
    let mut i = index;
    while m != 0 {
        let bit = m & m.wrapping_neg();
        if i & 1 != 0 {
            subset |= bit;
        }
        m &= m - 1;
        i >>= 1;
    }
    subset
}

struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    attacks: Vec<u64>,
}

impl MagicEntry {
    #[inline]
    fn index(&self, occupied: u64) -> usize {
        let relevant = occupied & self.mask;
        ((relevant.wrapping_mul(self.magic)) >> self.shift) as usize
    }
}

fn find_magic(sq: usize, mask: u64, dirs: [(i32, i32); 4], rng: &mut StdRng) -> (u64, Vec<u64>) {
    let bits = mask.count_ones();
    let size = 1usize << bits;
    let shift = 64 - bits;

    let mut occupancies = Vec::with_capacity(size);
    let mut references = Vec::with_capacity(size);
    for i in 0..size {
        let occ = occupancy_subset(i, mask);
        occupancies.push(occ);
        references.push(slow_attacks(sq, occ, dirs));
    }

    loop {
        // Sparse random candidate: AND of three random words tends to have
        // few set bits, which empirically yields valid magics quickly.
        let magic: u64 = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (magic.wrapping_mul(mask)) >> 56 < 6 {
            continue;
        }

        let mut attacks = vec![0u64; size];
        let mut used = vec![false; size];
        let mut ok = true;
        for i in 0..size {
            let idx = ((occupancies[i].wrapping_mul(magic)) >> shift) as usize;
            if !used[idx] {
                used[idx] = true;
                attacks[idx] = references[i];
            } else if attacks[idx] != references[i] {
                ok = false;
                break;
            }
        }
        if ok {
            return (magic, attacks);
        }
    }
}

fn build_table(dirs: [(i32, i32); 4]) -> Vec<MagicEntry> {
    let mut rng = StdRng::seed_from_u64(0xC0FF_EE00_1234_5678);
    (0..64)
        .map(|sq| {
            let mask = sliding_mask(sq, dirs, true);
            let shift = 64 - mask.count_ones();
            let (magic, attacks) = find_magic(sq, mask, dirs, &mut rng);
            MagicEntry {
                mask,
                magic,
                shift,
                attacks,
            }
        })
        .collect()
}

static ROOK_MAGICS: LazyLock<Vec<MagicEntry>> = LazyLock::new(|| build_table(ROOK_DIRS));
static BISHOP_MAGICS: LazyLock<Vec<MagicEntry>> = LazyLock::new(|| build_table(BISHOP_DIRS));

#[inline]
#[must_use]
pub(crate) fn rook_attacks(square: usize, occupancy: u64) -> u64 {
    let entry = &ROOK_MAGICS[square];
    entry.attacks[entry.index(occupancy)]
}

#[inline]
#[must_use]
pub(crate) fn bishop_attacks(square: usize, occupancy: u64) -> u64 {
    let entry = &BISHOP_MAGICS[square];
    entry.attacks[entry.index(occupancy)]
}

#[inline]
#[must_use]
pub(crate) fn queen_attacks(square: usize, occupancy: u64) -> u64 {
    rook_attacks(square, occupancy) | bishop_attacks(square, occupancy)
}
