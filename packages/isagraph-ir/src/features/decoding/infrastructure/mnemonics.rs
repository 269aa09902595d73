//! Recognised mnemonics per format family
//!
//! Membership is an exact list plus prefix families (`s_cmp_*`, `ds_*`,
//! `buffer_load_*`) with optional carve-outs. Sets of different families
//! must be disjoint; `MnemonicSet::overlap` finds a witness when they
//! are not.

/// Mnemonic membership of one family
#[derive(Debug, Clone, Copy)]
pub struct MnemonicSet {
    pub exact: &'static [&'static str],
    pub prefixes: &'static [&'static str],
    pub excluded_prefixes: &'static [&'static str],
}

impl MnemonicSet {
    pub const fn new(
        exact: &'static [&'static str],
        prefixes: &'static [&'static str],
        excluded_prefixes: &'static [&'static str],
    ) -> Self {
        Self {
            exact,
            prefixes,
            excluded_prefixes,
        }
    }

    /// `mnemonic` must already be lower-cased with its encoding suffix removed
    pub fn contains(&self, mnemonic: &str) -> bool {
        if self.exact.contains(&mnemonic) {
            return true;
        }
        self.prefixes.iter().any(|p| mnemonic.starts_with(p))
            && !self.excluded_prefixes.iter().any(|x| mnemonic.starts_with(x))
    }

    /// A mnemonic (or prefix family) recognised by both sets
    pub fn overlap(&self, other: &MnemonicSet) -> Option<&'static str> {
        self.exact
            .iter()
            .chain(self.prefixes)
            .chain(other.exact)
            .chain(other.prefixes)
            .copied()
            .find(|candidate| self.contains(candidate) && other.contains(candidate))
    }
}

pub const SCALAR_ALU1: MnemonicSet = MnemonicSet::new(
    &[
        "s_cmov_b32", "s_cmov_b64", "s_not_b32", "s_not_b64", "s_wqm_b32", "s_wqm_b64",
        "s_brev_b32", "s_brev_b64", "s_bcnt0_i32_b32", "s_bcnt0_i32_b64", "s_bcnt1_i32_b32",
        "s_bcnt1_i32_b64", "s_ff0_i32_b32", "s_ff0_i32_b64", "s_ff1_i32_b32", "s_ff1_i32_b64",
        "s_flbit_i32_b32", "s_flbit_i32_b64", "s_flbit_i32", "s_flbit_i32_i64", "s_sext_i32_i8",
        "s_sext_i32_i16", "s_bitset0_b32", "s_bitset0_b64", "s_bitset1_b32", "s_bitset1_b64",
        "s_getpc_b64", "s_setpc_b64", "s_swappc_b64", "s_rfe_b64", "s_quadmask_b32",
        "s_quadmask_b64", "s_movrels_b32", "s_movrels_b64", "s_movreld_b32", "s_movreld_b64",
        "s_abs_i32", "s_mov_fed_b32", "s_set_gpr_idx_idx", "s_bitreplicate_b64_b32",
        "s_and_saveexec_b32", "s_and_saveexec_b64", "s_or_saveexec_b32", "s_or_saveexec_b64",
        "s_xor_saveexec_b32", "s_xor_saveexec_b64", "s_andn2_saveexec_b32",
        "s_andn2_saveexec_b64", "s_orn2_saveexec_b32", "s_orn2_saveexec_b64",
        "s_nand_saveexec_b32", "s_nand_saveexec_b64", "s_nor_saveexec_b32",
        "s_nor_saveexec_b64", "s_xnor_saveexec_b32", "s_xnor_saveexec_b64",
        "s_andn1_saveexec_b32", "s_andn1_saveexec_b64", "s_orn1_saveexec_b32",
        "s_orn1_saveexec_b64", "s_andn1_wrexec_b32", "s_andn1_wrexec_b64",
        "s_andn2_wrexec_b32", "s_andn2_wrexec_b64",
    ],
    &[],
    &[],
);

pub const SCALAR_ALU2: MnemonicSet = MnemonicSet::new(
    &[
        "s_add_u32", "s_sub_u32", "s_add_i32", "s_sub_i32", "s_addc_u32", "s_subb_u32",
        "s_min_i32", "s_min_u32", "s_max_i32", "s_max_u32", "s_cselect_b32", "s_cselect_b64",
        "s_and_b32", "s_and_b64", "s_or_b32", "s_or_b64", "s_xor_b32", "s_xor_b64",
        "s_andn2_b32", "s_andn2_b64", "s_orn2_b32", "s_orn2_b64", "s_nand_b32", "s_nand_b64",
        "s_nor_b32", "s_nor_b64", "s_xnor_b32", "s_xnor_b64", "s_lshl_b32", "s_lshl_b64",
        "s_lshr_b32", "s_lshr_b64", "s_ashr_i32", "s_ashr_i64", "s_bfm_b32", "s_bfm_b64",
        "s_mul_i32", "s_bfe_u32", "s_bfe_i32", "s_bfe_u64", "s_bfe_i64", "s_absdiff_i32",
        "s_lshl1_add_u32", "s_lshl2_add_u32", "s_lshl3_add_u32", "s_lshl4_add_u32",
        "s_pack_ll_b32_b16", "s_pack_lh_b32_b16", "s_pack_hh_b32_b16", "s_mul_hi_u32",
        "s_mul_hi_i32", "s_rfe_restore_b64",
    ],
    &[],
    &[],
);

pub const SCALAR_COMPARE: MnemonicSet = MnemonicSet::new(
    &[
        "s_bitcmp0_b32", "s_bitcmp1_b32", "s_bitcmp0_b64", "s_bitcmp1_b64", "s_setvskip",
        "s_set_gpr_idx_on",
    ],
    &["s_cmp_"],
    &[],
);

/// SOPK forms plus the plain scalar moves
pub const SCALAR_IMMEDIATE: MnemonicSet = MnemonicSet::new(
    &[
        "s_mov_b32", "s_mov_b64", "s_movk_i32", "s_cmovk_i32", "s_addk_i32", "s_mulk_i32",
        "s_getreg_b32", "s_setreg_b32", "s_setreg_imm32_b32",
    ],
    &["s_cmpk_"],
    &[],
);

pub const SCALAR_PROGRAM_CONTROL: MnemonicSet = MnemonicSet::new(
    &[
        "s_nop", "s_endpgm", "s_endpgm_saved", "s_endpgm_ordered_ps_done", "s_branch",
        "s_wakeup", "s_barrier", "s_setkill", "s_waitcnt", "s_sethalt", "s_sleep", "s_setprio",
        "s_sendmsg", "s_sendmsghalt", "s_trap", "s_icache_inv", "s_incperflevel",
        "s_decperflevel", "s_ttracedata", "s_set_gpr_idx_off", "s_set_gpr_idx_mode",
        "s_call_b64", "s_code_end", "s_inst_prefetch", "s_clause", "s_round_mode",
        "s_denorm_mode", "s_waitcnt_vscnt", "s_waitcnt_vmcnt", "s_waitcnt_expcnt",
        "s_waitcnt_lgkmcnt", "s_waitcnt_depctr", "s_delay_alu",
    ],
    &["s_cbranch_"],
    &[],
);

pub const SCALAR_MEMORY: MnemonicSet = MnemonicSet::new(
    &[
        "s_dcache_inv", "s_dcache_wb", "s_dcache_inv_vol", "s_dcache_wb_vol", "s_memtime",
        "s_memrealtime", "s_gl1_inv",
    ],
    &["s_load_", "s_buffer_load_", "s_store_", "s_buffer_store_"],
    &[],
);

pub const BUFFER_UNTYPED: MnemonicSet = MnemonicSet::new(
    &[
        "buffer_wbinvl1", "buffer_wbinvl1_sc", "buffer_wbinvl1_vol", "buffer_gl0_inv",
        "buffer_gl1_inv",
    ],
    &["buffer_load_", "buffer_store_", "buffer_atomic_"],
    &[],
);

pub const BUFFER_TYPED: MnemonicSet =
    MnemonicSet::new(&[], &["tbuffer_load_", "tbuffer_store_"], &[]);

pub const IMAGE: MnemonicSet = MnemonicSet::new(&[], &["image_"], &[]);

pub const DATA_SHARE: MnemonicSet = MnemonicSet::new(&[], &["ds_"], &[]);

pub const EXPORT: MnemonicSet = MnemonicSet::new(&["exp", "export"], &[], &[]);

pub const VECTOR_INTERPOLATION: MnemonicSet = MnemonicSet::new(&[], &["v_interp_"], &[]);

/// Every other `v_*` opcode is vector ALU
pub const VECTOR_ALU: MnemonicSet = MnemonicSet::new(&[], &["v_"], &["v_interp_"]);
