use crate::lang::{MemoryError, Word};

type Result<T> = std::result::Result<T, MemoryError>;

/// Guest address of the first byte of physical memory.
pub const PMEM_BASE: Word = 0x8000_0000;
pub const PMEM_SIZE: usize = 0x10_0000;

/// ## Guest physical memory
///
/// Little-endian, byte addressed, `PMEM_SIZE` bytes starting at `PMEM_BASE`.
/// Accesses are 1, 2 or 4 bytes wide.
pub struct Memory {
    bytes: Vec<u8>,
}

impl Default for Memory {
    fn default() -> Memory {
        Memory {
            bytes: vec![0; PMEM_SIZE],
        }
    }
}

impl Memory {
    /// Copies `image` to the start of memory.
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > self.bytes.len() {
            return Err(MemoryError::OutOfBounds {
                addr: PMEM_BASE,
                width: image.len(),
            });
        }
        self.bytes[..image.len()].copy_from_slice(image);
        Ok(())
    }

    pub fn read(&self, addr: Word, width: usize) -> Result<Word> {
        let offset = self.offset(addr, width)?;
        Ok(self.bytes[offset..offset + width]
            .iter()
            .rev()
            .fold(0, |word, &b| (word << 8) | Word::from(b)))
    }

    pub fn write(&mut self, addr: Word, width: usize, data: Word) -> Result<()> {
        let offset = self.offset(addr, width)?;
        for (i, b) in self.bytes[offset..offset + width].iter_mut().enumerate() {
            *b = (data >> (8 * i)) as u8;
        }
        Ok(())
    }

    fn offset(&self, addr: Word, width: usize) -> Result<usize> {
        if !matches!(width, 1 | 2 | 4) {
            return Err(MemoryError::BadWidth(width));
        }
        let out_of_bounds = MemoryError::OutOfBounds { addr, width };
        let offset = match addr.checked_sub(PMEM_BASE) {
            Some(offset) => offset as usize,
            None => return Err(out_of_bounds),
        };
        if offset + width > self.bytes.len() {
            return Err(out_of_bounds);
        }
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian() {
        let mut m = Memory::default();
        m.write(PMEM_BASE + 8, 4, 0x1234_5678).unwrap();
        assert_eq!(m.read(PMEM_BASE + 8, 1), Ok(0x78));
        assert_eq!(m.read(PMEM_BASE + 9, 2), Ok(0x3456));
        assert_eq!(m.read(PMEM_BASE + 8, 4), Ok(0x1234_5678));
    }

    #[test]
    fn test_bounds() {
        let m = Memory::default();
        assert!(m.read(0, 4).is_err());
        let last = PMEM_BASE + PMEM_SIZE as Word - 4;
        assert_eq!(m.read(last, 4), Ok(0));
        assert_eq!(
            m.read(last + 1, 4),
            Err(MemoryError::OutOfBounds {
                addr: last + 1,
                width: 4
            })
        );
        assert_eq!(m.read(PMEM_BASE, 3), Err(MemoryError::BadWidth(3)));
    }

    #[test]
    fn test_load() {
        let mut m = Memory::default();
        m.load(&[0x93, 0x02, 0x00, 0x00]).unwrap();
        assert_eq!(m.read(PMEM_BASE, 4), Ok(0x293));
        assert!(m.load(&vec![0; PMEM_SIZE + 1]).is_err());
    }
}
