use super::{LookupError, Machine, MemoryError, Word};
use std::cell::Cell;
use std::collections::HashMap;


#[derive(Default)]
struct Fake {
    regs: HashMap<&'static str, Word>,
    words: HashMap<Word, Word>,
    reads: Cell<usize>,
}

impl Fake {
    fn new() -> Fake {
        let mut fake = Fake::default();
        fake.regs.insert("sp", 0x8000_1000);
        fake.regs.insert("a0", 7);
        fake.regs.insert("pc", 0x8000_0000);
        fake.words.insert(0x8000_1000, 0xdead_beef);
        fake.words.insert(0x8000_1004, 0x8000_1000);
        fake
    }
}

impl Machine for Fake {
    fn read_memory(&self, addr: Word, width: usize) -> Result<Word, MemoryError> {
        assert_eq!(width, 4);
        self.reads.set(self.reads.get() + 1);
        match self.words.get(&addr) {
            Some(w) => Ok(*w),
            None => Err(MemoryError::OutOfBounds { addr, width }),
        }
    }

    fn resolve_register(&self, name: &str) -> Result<Word, LookupError> {
        match self.regs.get(name) {
            Some(v) => Ok(*v),
            None => Err(LookupError::UnknownRegister(name.to_string())),
        }
    }
}
