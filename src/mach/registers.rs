use super::memory::PMEM_BASE;
use crate::lang::{LookupError, Word};

/// ABI names of the general purpose registers, by index.
pub const NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

pub struct Registers {
    gpr: [Word; 32],
    pub pc: Word,
}

impl Default for Registers {
    fn default() -> Registers {
        Registers {
            gpr: [0; 32],
            pc: PMEM_BASE,
        }
    }
}

impl Registers {
    pub fn get(&self, index: usize) -> Word {
        self.gpr[index]
    }

    /// Writes to `zero` are dropped.
    pub fn set(&mut self, index: usize, value: Word) {
        if index != 0 {
            self.gpr[index] = value;
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Word, LookupError> {
        if name == "pc" {
            return Ok(self.pc);
        }
        match NAMES.iter().position(|&n| n == name) {
            Some(index) => Ok(self.gpr[index]),
            None => Err(LookupError::UnknownRegister(name.to_string())),
        }
    }
}

impl std::fmt::Display for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (name, value) in NAMES.iter().zip(self.gpr.iter()) {
            writeln!(f, "{:<4} {:#010x} {}", name, value, value)?;
        }
        write!(f, "{:<4} {:#010x} {}", "pc", self.pc, self.pc)
    }
}
