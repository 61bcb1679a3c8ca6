//! Data hazard detection (stall-only, no forwarding).

use crate::pipeline::latches::{ExMem, IdEx};

/// Returns `true` if the instruction waiting in IF/ID must stall because
/// a producer ahead of it in ID/EX or EX/MEM has not yet written its
/// destination register.
///
/// `mem_read` on `id_ex` is accepted for parity with load-use hazard
/// interfaces elsewhere in this design space, but with no forwarding the
/// predicate is uniform across producer kinds: a pending write to a
/// register this instruction reads stalls it regardless of whether the
/// producer is a load or an ALU op.
pub fn detect_stall(id_ex: &IdEx, ex_mem: &ExMem, if_id_rs: u8, if_id_rt: u8) -> bool {
    let id_ex_hazard = id_ex.reg_write
        && id_ex.dest_reg != 0
        && (id_ex.dest_reg == if_id_rs || id_ex.dest_reg == if_id_rt);

    let ex_mem_hazard = ex_mem.reg_write
        && ex_mem.dest_reg != 0
        && (ex_mem.dest_reg == if_id_rs || ex_mem.dest_reg == if_id_rt);

    id_ex_hazard || ex_mem_hazard
}
