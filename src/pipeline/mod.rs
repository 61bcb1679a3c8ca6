//! The 5-stage pipeline engine.

pub mod latches;
pub mod stages;

use tracing::{debug, trace};

use crate::cpu::{CpuPolicy, RegisterFile};
use crate::memory::{DataMemory, InstructionMemory};
use latches::PipelineState;

/// Summary of a completed run, reported on the console per the
/// simulator's output contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunReport {
    pub cycles: u64,
    pub instructions_executed: u64,
}

/// Runs the pipeline to completion against `regs`/`data_mem`, fetching
/// from `instr_mem`, mutating all three in place.
///
/// Loop shape, cycle by cycle:
/// 1. WB commits `current.mem_wb` (if any) to the register file.
/// 2. Termination is checked against `current`: if fetching has been
///    disabled and every latch is a bubble, the run is done and this
///    iteration does not count as a cycle (the pipeline drained at the
///    end of the previous cycle; this check is just observing that).
/// 3. Otherwise the cycle counter advances and MEM, EX, ID, IF each
///    build their slice of `next` from `current`.
/// 4. The hazard detector inspects `current.id_ex`/`current.ex_mem`
///    against the instruction waiting in `current.if_id`. A detected
///    hazard discards the freshly fetched IF/ID and re-fetches the same
///    PC next cycle; a taken branch/jump instead flushes IF/ID and
///    ID/EX and redirects the PC. Neither condition can hold at once,
///    since a flush always clears IF/ID so there is nothing left for a
///    stall to re-fetch.
/// 5. `current` becomes `next`, and retirement is counted off the new
///    MEM/WB latch, excluding the all-zero sentinel word.
pub fn run(
    regs: &mut RegisterFile,
    instr_mem: &InstructionMemory,
    data_mem: &mut DataMemory,
    policy: CpuPolicy,
) -> RunReport {
    let mut current = PipelineState::default();
    let mut pc: u32 = 0;
    let mut fetch_enable = true;
    let mut cycle: u64 = 0;
    let mut instructions_executed: u64 = 0;

    loop {
        stages::write_back(&current, regs);

        if !fetch_enable && current.all_bubbles() {
            break;
        }
        cycle += 1;

        if policy.verbose {
            debug!(cycle, pc, "cycle start");
        }

        let mut next = PipelineState::default();

        stages::memory_access(&current, &mut next, data_mem);
        let branch = stages::execute(&current, &mut next);
        stages::instruction_decode(&current, &mut next, regs);
        stages::instruction_fetch(&mut next, instr_mem, pc, &mut fetch_enable);

        let stall = if current.if_id.valid {
            crate::hazard::detect_stall(
                &current.id_ex,
                &current.ex_mem,
                if_id_rs(&current),
                if_id_rt(&current),
            )
        } else {
            false
        };

        if branch.taken {
            trace!(target = branch.target, "branch/jump taken, flushing IF/ID and ID/EX");
            next.if_id = latches::IfId::default();
            next.id_ex = latches::IdEx::default();
            pc = branch.target;
        } else if stall {
            trace!(pc, "data hazard detected, stalling fetch");
            next.id_ex = latches::IdEx::default();
            next.if_id = current.if_id;
        } else {
            pc = pc.wrapping_add(4);
        }

        current = next;

        if current.mem_wb.valid && current.mem_wb.instr != 0 {
            instructions_executed += 1;
        }
    }

    RunReport { cycles: cycle, instructions_executed }
}

/// `current.if_id.instr`'s `rs` field, used for the hazard check against
/// the instruction still sitting in IF/ID (the decoder itself is only
/// run once the instruction actually advances into ID/EX).
fn if_id_rs(current: &PipelineState) -> u8 {
    ((current.if_id.instr >> 21) & 0x1F) as u8
}

fn if_id_rt(current: &PipelineState) -> u8 {
    ((current.if_id.instr >> 16) & 0x1F) as u8
}
