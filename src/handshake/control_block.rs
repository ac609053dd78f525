use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::consts::{
    CONTROL_BLOCK_LEN, COPROC_READY_ADDR, HOST_REQUEST_ADDR, INPT4_ADDR, INPT5_ADDR, MODE_ADDR,
    OS_TIME_ADDR, RUN_FUNC_ADDR, SWCHA_ADDR, SWCHB_ADDR, VB_TIME_ADDR,
};
use crate::input::InputState;

/// Cells only the host stores to.
pub const HOST_OWNED: [u16; 7] = [
    SWCHA_ADDR,
    SWCHB_ADDR,
    INPT4_ADDR,
    INPT5_ADDR,
    VB_TIME_ADDR,
    OS_TIME_ADDR,
    HOST_REQUEST_ADDR,
];

/// Cells only the coprocessor stores to.
pub const COPROC_OWNED: [u16; 3] = [RUN_FUNC_ADDR, MODE_ADDR, COPROC_READY_ADDR];

/// The first 16 bytes of display data, one atomic cell per byte.
/// Cloning shares the same cells.
pub struct ControlBlock {
    cells: Arc<[AtomicU8; CONTROL_BLOCK_LEN]>,
}

impl ControlBlock {
    #[must_use]
    pub fn new() -> Self {
        let slf = Self {
            cells: Arc::new(core::array::from_fn(|_| AtomicU8::new(0))),
        };
        let idle = InputState::idle();
        slf.store(SWCHA_ADDR, idle.swcha, Ordering::Relaxed);
        slf.store(SWCHB_ADDR, idle.swchb, Ordering::Relaxed);
        slf.store(INPT4_ADDR, idle.inpt4, Ordering::Relaxed);
        slf.store(INPT5_ADDR, idle.inpt5, Ordering::Relaxed);
        slf
    }

    #[inline]
    pub(crate) fn load(&self, addr: u16, order: Ordering) -> u8 {
        self.cells[addr as usize].load(order)
    }

    #[inline]
    pub(crate) fn store(&self, addr: u16, v: u8, order: Ordering) {
        self.cells[addr as usize].store(v, order);
    }

    /// Relaxed copy of every cell, for inspection only.
    #[must_use]
    pub fn snapshot(&self) -> [u8; CONTROL_BLOCK_LEN] {
        core::array::from_fn(|i| self.cells[i].load(Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) fn corrupt(&self, addr: u16, v: u8) {
        self.store(addr, v, Ordering::SeqCst);
    }
}

impl Default for ControlBlock {
    fn default() -> Self {
        ControlBlock::new()
    }
}

impl Clone for ControlBlock {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
        }
    }
}

impl core::fmt::Debug for ControlBlock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ControlBlock {:02x?}", self.snapshot())
    }
}
