use super::memory::Memory;
use super::registers::Registers;
use crate::lang::{LookupError, Machine, MemoryError, Word};
use thiserror::Error;
use tracing::trace;

/// Program run when no image is given. Counts `t0` from 1 to 5, storing
/// each value at `0x80001000`, then traps with `a0 = 0`.
pub const BUILTIN_IMAGE: [u32; 8] = [
    0x0000_0293, // addi t0, zero, 0
    0x8000_1337, // lui  t1, 0x80001
    0x0012_8293, // addi t0, t0, 1
    0x0053_2023, // sw   t0, 0(t1)
    0x0050_0393, // addi t2, zero, 5
    0xfe72_9ae3, // bne  t0, t2, -12
    0x0000_0513, // addi a0, zero, 0
    0x0010_0073, // ebreak
];

#[derive(Debug, Error)]
pub enum CpuError {
    #[error("invalid opcode {inst:#010x} at pc = {pc:#010x}")]
    InvalidInstruction { pc: Word, inst: Word },
    #[error("memory fault at pc = {pc:#010x}: {source}")]
    Memory { pc: Word, source: MemoryError },
}

/// Result of executing one instruction.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Step {
    Next,
    /// `ebreak` with the exit code from `a0`.
    Halt(Word),
}

/// ## A minimal RV32I core
///
/// Implements LUI, AUIPC, JAL, JALR, BEQ, BNE, LW, SW, ADDI, ADD, SUB and
/// EBREAK, which is enough to drive the debugger.
#[derive(Default)]
pub struct Cpu {
    regs: Registers,
    memory: Memory,
}

impl Cpu {
    pub fn builtin() -> Cpu {
        let image: Vec<u8> = BUILTIN_IMAGE.iter().flat_map(|w| w.to_le_bytes()).collect();
        let mut cpu = Cpu::default();
        // The built-in image is a few words long and always fits.
        let loaded = cpu.memory.load(&image);
        debug_assert!(loaded.is_ok());
        cpu
    }

    pub fn with_image(image: &[u8]) -> Result<Cpu, MemoryError> {
        let mut cpu = Cpu::default();
        cpu.memory.load(image)?;
        Ok(cpu)
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn pc(&self) -> Word {
        self.regs.pc
    }

    pub fn step(&mut self) -> Result<Step, CpuError> {
        let pc = self.regs.pc;
        let inst = self.load(pc, pc)?;
        trace!("exec {:#010x}: {:#010x}", pc, inst);
        let mut next_pc = pc.wrapping_add(4);

        let opcode = inst & 0x7f;
        let rd = ((inst >> 7) & 0x1f) as usize;
        let funct3 = (inst >> 12) & 0x7;
        let rs1 = ((inst >> 15) & 0x1f) as usize;
        let rs2 = ((inst >> 20) & 0x1f) as usize;
        let funct7 = inst >> 25;
        let src1 = self.regs.get(rs1);
        let src2 = self.regs.get(rs2);
        let invalid = CpuError::InvalidInstruction { pc, inst };

        match (opcode, funct3) {
            (0x37, _) => self.regs.set(rd, imm_u(inst)),
            (0x17, _) => self.regs.set(rd, pc.wrapping_add(imm_u(inst))),
            (0x6f, _) => {
                self.regs.set(rd, next_pc);
                next_pc = pc.wrapping_add(imm_j(inst));
            }
            (0x67, 0) => {
                next_pc = src1.wrapping_add(imm_i(inst)) & !1;
                self.regs.set(rd, pc.wrapping_add(4));
            }
            (0x63, 0) | (0x63, 1) => {
                if (src1 == src2) == (funct3 == 0) {
                    next_pc = pc.wrapping_add(imm_b(inst));
                }
            }
            (0x03, 2) => {
                let value = self.load(pc, src1.wrapping_add(imm_i(inst)))?;
                self.regs.set(rd, value);
            }
            (0x23, 2) => {
                let addr = src1.wrapping_add(imm_s(inst));
                self.memory
                    .write(addr, 4, src2)
                    .map_err(|source| CpuError::Memory { pc, source })?;
            }
            (0x13, 0) => self.regs.set(rd, src1.wrapping_add(imm_i(inst))),
            (0x33, 0) => match funct7 {
                0x00 => self.regs.set(rd, src1.wrapping_add(src2)),
                0x20 => self.regs.set(rd, src1.wrapping_sub(src2)),
                _ => return Err(invalid),
            },
            (0x73, 0) if inst == 0x0010_0073 => return Ok(Step::Halt(self.regs.get(10))),
            _ => return Err(invalid),
        }
        self.regs.pc = next_pc;
        Ok(Step::Next)
    }

    fn load(&self, pc: Word, addr: Word) -> Result<Word, CpuError> {
        self.memory
            .read(addr, 4)
            .map_err(|source| CpuError::Memory { pc, source })
    }
}

impl Machine for Cpu {
    fn read_memory(&self, addr: Word, width: usize) -> Result<Word, MemoryError> {
        self.memory.read(addr, width)
    }

    fn resolve_register(&self, name: &str) -> Result<Word, LookupError> {
        self.regs.lookup(name)
    }
}

fn imm_i(inst: Word) -> Word {
    ((inst as i32) >> 20) as Word
}

fn imm_s(inst: Word) -> Word {
    ((((inst as i32) >> 25) << 5) as Word) | ((inst >> 7) & 0x1f)
}

fn imm_b(inst: Word) -> Word {
    ((((inst as i32) >> 31) << 12) as Word)
        | (((inst >> 7) & 0x1) << 11)
        | (((inst >> 25) & 0x3f) << 5)
        | (((inst >> 8) & 0xf) << 1)
}

fn imm_u(inst: Word) -> Word {
    inst & 0xffff_f000
}

fn imm_j(inst: Word) -> Word {
    ((((inst as i32) >> 31) << 20) as Word)
        | (inst & 0x000f_f000)
        | (((inst >> 20) & 0x1) << 11)
        | (((inst >> 21) & 0x3ff) << 1)
}
