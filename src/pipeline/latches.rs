//! The four pipeline latches.
//!
//! Each latch carries a `valid` flag; an invalid latch is a bubble and
//! performs no side effect in any stage that reads it. Latches are plain
//! records, not sum types, because every stage needs to read a fixed set
//! of fields regardless of validity (the `valid` flag is just one more
//! field), which keeps the per-cycle "build next from current" code a
//! flat struct literal rather than a match.

use crate::alu::{AluOp, AluSrc};

/// Branch condition carried by an ID/EX latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Branch {
    #[default]
    None,
    Beq,
    Bne,
}

/// Jump kind carried by an ID/EX latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Jump {
    #[default]
    None,
    J,
    Jr,
}

/// IF/ID latch: holds a freshly fetched instruction word and its PC.
#[derive(Clone, Copy, Debug, Default)]
pub struct IfId {
    pub valid: bool,
    pub instr: u32,
    pub pc: u32,
}

/// ID/EX latch: the decoded control record plus the register values and
/// PC the EX stage needs.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdEx {
    pub valid: bool,
    pub instr: u32,
    pub pc: u32,

    pub rs: u8,
    pub rt: u8,
    pub rd: u8,

    /// ALU operand A. For everything but SLL/SRL this is the `rs`
    /// register's value; for shifts the decoder redirects it to `rt`'s
    /// value (see `Decoded::shift_operand_from_rt`).
    pub rs_val: i32,
    pub rt_val: i32,

    /// Sign-extended 16-bit immediate, shift amount, or 26-bit jump
    /// address, depending on the instruction.
    pub imm: i32,

    pub dest_reg: u8,
    pub reg_write: bool,
    pub mem_read: bool,
    pub mem_write: bool,
    pub alu_op: AluOp,
    pub alu_src: AluSrc,
    pub branch: Branch,
    pub jump: Jump,
}

/// EX/MEM latch: the ALU result and the control bits the MEM stage and
/// WB stage still need.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExMem {
    pub valid: bool,
    pub instr: u32,
    pub pc: u32,

    pub alu_result: i32,
    pub store_val: i32,

    pub dest_reg: u8,
    pub reg_write: bool,
    pub mem_read: bool,
    pub mem_write: bool,
}

/// MEM/WB latch: the value about to be committed to the register file.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemWb {
    pub valid: bool,
    pub instr: u32,

    pub write_val: i32,
    pub dest_reg: u8,
    pub reg_write: bool,
}

/// The four pipeline latches as they stand at a cycle boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineState {
    pub if_id: IfId,
    pub id_ex: IdEx,
    pub ex_mem: ExMem,
    pub mem_wb: MemWb,
}

impl PipelineState {
    /// True once every latch is a bubble, used for the drain-termination
    /// check: no in-flight work remains anywhere in the pipeline.
    pub fn all_bubbles(&self) -> bool {
        !self.if_id.valid && !self.id_ex.valid && !self.ex_mem.valid && !self.mem_wb.valid
    }
}
