//! Per-stage transition functions. Each stage reads from `current` (the
//! latch state as of the start of the cycle) and writes into `next` (the
//! latch state being assembled for the following cycle); nothing here
//! mutates `current` in place, matching the snapshot discipline the
//! engine relies on to keep every stage's view of the cycle consistent.

use crate::alu;
use crate::cpu::RegisterFile;
use crate::instruction::decode as decode_instr;
use crate::memory::{DataMemory, InstructionMemory};
use crate::pipeline::latches::{Branch, ExMem, IdEx, IfId, Jump, MemWb, PipelineState};

/// WB: commits `current.mem_wb`'s result to the register file. Runs
/// first in the cycle so a same-cycle ID read of the same register sees
/// the freshly written value.
pub fn write_back(current: &PipelineState, regs: &mut RegisterFile) {
    if current.mem_wb.valid && current.mem_wb.reg_write {
        regs.write(current.mem_wb.dest_reg, current.mem_wb.write_val);
    }
}

/// MEM: services a load or store for `current.ex_mem`, producing the
/// next cycle's MEM/WB latch.
pub fn memory_access(current: &PipelineState, next: &mut PipelineState, data_mem: &mut DataMemory) {
    let ex_mem = &current.ex_mem;
    let mut mem_wb = MemWb {
        valid: ex_mem.valid,
        instr: ex_mem.instr,
        dest_reg: ex_mem.dest_reg,
        reg_write: ex_mem.reg_write,
        write_val: 0,
    };

    if ex_mem.valid {
        mem_wb.write_val = if ex_mem.mem_read {
            data_mem.read_word(ex_mem.alu_result as u32)
        } else {
            ex_mem.alu_result
        };

        if ex_mem.mem_write {
            data_mem.write_word(ex_mem.alu_result as u32, ex_mem.store_val);
        }
    }

    next.mem_wb = mem_wb;
}

/// Outcome of the EX stage's branch/jump resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchOutcome {
    pub taken: bool,
    pub target: u32,
}

/// EX: runs the ALU and resolves branches/jumps for `current.id_ex`,
/// producing the next cycle's EX/MEM latch.
pub fn execute(current: &PipelineState, next: &mut PipelineState) -> BranchOutcome {
    let id_ex = &current.id_ex;
    let mut ex_mem = ExMem {
        valid: id_ex.valid,
        instr: id_ex.instr,
        pc: id_ex.pc,
        dest_reg: id_ex.dest_reg,
        reg_write: id_ex.reg_write,
        mem_read: id_ex.mem_read,
        mem_write: id_ex.mem_write,
        alu_result: 0,
        store_val: 0,
    };

    let mut outcome = BranchOutcome::default();

    if id_ex.valid {
        match id_ex.jump {
            Jump::J => {
                outcome.taken = true;
                outcome.target = (id_ex.pc & 0xF000_0000) | ((id_ex.imm as u32) << 2);
            }
            Jump::Jr => {
                outcome.taken = true;
                outcome.target = id_ex.rs_val as u32;
            }
            Jump::None => {
                if id_ex.branch != Branch::None {
                    let target = id_ex.pc.wrapping_add(4).wrapping_add((id_ex.imm as u32) << 2);
                    let equal = id_ex.rs_val == id_ex.rt_val;
                    let taken = match id_ex.branch {
                        Branch::Beq => equal,
                        Branch::Bne => !equal,
                        Branch::None => false,
                    };
                    if taken {
                        outcome.taken = true;
                        outcome.target = target;
                    }
                }

                ex_mem.alu_result = alu::execute(id_ex.alu_op, id_ex.rs_val, id_ex.alu_operand_b());
            }
        }

        if id_ex.mem_write {
            ex_mem.store_val = id_ex.rt_val;
        }
    }

    next.ex_mem = ex_mem;
    outcome
}

/// ID: decodes `current.if_id`'s instruction and reads the register
/// file, producing the next cycle's ID/EX latch. The decoder never
/// reads registers itself; this stage is where the decoded control
/// record and the register reads come together.
pub fn instruction_decode(current: &PipelineState, next: &mut PipelineState, regs: &RegisterFile) {
    let if_id = &current.if_id;
    let mut id_ex = IdEx::default();

    if if_id.valid {
        let decoded = decode_instr(if_id.instr);

        let mut rs_val = regs.read(decoded.rs);
        let rt_val = regs.read(decoded.rt);
        if decoded.shift_operand_from_rt {
            rs_val = rt_val;
        }

        id_ex = IdEx {
            valid: true,
            instr: if_id.instr,
            pc: if_id.pc,
            rs: decoded.rs,
            rt: decoded.rt,
            rd: decoded.rd,
            rs_val,
            rt_val,
            imm: decoded.imm,
            dest_reg: decoded.dest_reg,
            reg_write: decoded.reg_write,
            mem_read: decoded.mem_read,
            mem_write: decoded.mem_write,
            alu_op: decoded.alu_op,
            alu_src: decoded.alu_src,
            branch: decoded.branch,
            jump: decoded.jump,
        };
    }

    next.id_ex = id_ex;
}

/// IF: fetches the next instruction word, if fetching is still enabled.
/// Clears `*fetch_enable` once the program counter runs past the last
/// loaded instruction.
pub fn instruction_fetch(
    next: &mut PipelineState,
    instr_mem: &InstructionMemory,
    pc: u32,
    fetch_enable: &mut bool,
) {
    let mut if_id = IfId { valid: false, instr: 0, pc };

    if *fetch_enable {
        let index = pc / 4;
        if (index as usize) < instr_mem.loaded_count() {
            if_id.instr = instr_mem.read(index);
            if_id.valid = true;
        } else {
            *fetch_enable = false;
        }
    }

    next.if_id = if_id;
}

impl IdEx {
    /// The ALU's second operand, selected per `alu_src` — except for
    /// shifts, whose shift amount lives in `imm` as an already-masked
    /// 5-bit value regardless of `alu_src`.
    fn alu_operand_b(&self) -> i32 {
        use crate::alu::AluOp;
        match self.alu_op {
            AluOp::Sll | AluOp::Srl => self.imm & 0x1F,
            _ => match self.alu_src {
                alu::AluSrc::Imm => self.imm,
                alu::AluSrc::Reg => self.rt_val,
            },
        }
    }
}
