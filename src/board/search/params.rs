#[derive(Clone, Debug)]
pub struct SearchParams {
    pub null_reduction: u32,
    pub null_min_depth: u32,
    pub null_verification_depth: u32,
    pub futility_margin: i32,
    /// Deepest ply at which move-loop futility pruning (§4.8 step 12) applies.
    pub futility_depth: u32,
    /// Deepest ply at which razoring (§4.8 step 7) is attempted.
    pub razor_depth: u32,
    pub razor_margin: i32,
    pub lmr_min_depth: u32,
    pub lmr_min_move: usize,
    pub lmr_reduction: u32,
    /// Deepest ply at which late-move pruning (§4.8 step 12) applies.
    pub lmp_depth: u32,
    /// Base quiet-move count for `lmp_count(depth)`; grows quadratically
    /// with depth so deeper nodes tolerate more quiets before pruning.
    pub lmp_move_limit: usize,
    pub iir_min_depth: u32,
    pub singular_margin: i32,
    pub rfp_margin: i32,
    pub static_null_margin: i32,
    pub delta_margin: i32,
}

impl SearchParams {
    /// `LMPCount[depth]` from §4.8 step 12: the quiet-move count a node may
    /// try before late-move pruning kicks in, growing quadratically with
    /// depth so deeper searches stay more forgiving.
    #[must_use]
    pub fn lmp_count(&self, depth: u32) -> usize {
        self.lmp_move_limit + (depth * depth) as usize
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            null_reduction: 2,
            null_min_depth: 3,
            null_verification_depth: 6,
            futility_margin: 150,
            futility_depth: 6,
            razor_depth: 3,
            razor_margin: 250,
            lmr_min_depth: 3,
            lmr_min_move: 3,
            lmr_reduction: 1,
            lmp_depth: 8,
            lmp_move_limit: 3,
            iir_min_depth: 6,
            singular_margin: 50,
            rfp_margin: 100,
            static_null_margin: 120,
            delta_margin: 200,
        }
    }
}
