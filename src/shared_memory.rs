use core::ops::{Index, IndexMut};
use log::trace;

use crate::consts::IMAGE_LEN;

/// Byte image of the display data RAM, laid out at the addresses the 6507
/// kernel expects.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedMemory {
    data: Vec<u8>,
}

impl SharedMemory {
    #[must_use]
    pub fn new(len: usize, fill_with: u8) -> Self {
        Self {
            data: vec![fill_with; len],
        }
    }

    pub fn fill(&mut self, v: u8) {
        self.data.fill(v);
    }

    pub fn fill_range(&mut self, dest: u16, len: u16, v: u8) {
        let d = dest as usize;
        self.data[d..(d + len as usize)].fill(v);
    }

    pub fn copy(&mut self, dest: u16, buf: &[u8]) {
        trace!("image copy 0x{:04x}..0x{:04x}", dest, dest as usize + buf.len());
        let d = dest as usize;
        self.data[d..(d + buf.len())].copy_from_slice(buf);
    }

    #[must_use]
    pub fn get(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    pub fn set(&mut self, addr: u16, v: u8) {
        self.data[addr as usize] = v;
    }

    #[must_use]
    pub fn slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.data[a..a + len]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for SharedMemory {
    fn default() -> Self {
        SharedMemory::new(IMAGE_LEN, 0)
    }
}

impl Index<usize> for SharedMemory {
    type Output = u8;
    fn index(&self, i: usize) -> &u8 {
        &self.data[i]
    }
}

impl IndexMut<usize> for SharedMemory {
    fn index_mut(&mut self, i: usize) -> &mut u8 {
        &mut self.data[i]
    }
}

impl core::fmt::Debug for SharedMemory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (row, chunk) in self.data.chunks(16).enumerate() {
            write!(f, "{:04x}:", row * 16)?;
            for b in chunk {
                write!(f, " {b:02x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
