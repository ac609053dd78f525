pub mod frame;

use log::{trace, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

pub use frame::{Frame, ScalarState};

/// Two physical instances of a payload and the designation of which one is
/// the front. The host reads only the front, the coprocessor writes only
/// the back; `flip` swaps the designation without moving any data.
pub struct DoubleBuffer<T> {
    instances: [Mutex<T>; 2],
    front: AtomicU8,
}

impl<T> DoubleBuffer<T> {
    #[must_use]
    pub fn new(front: T, back: T) -> Self {
        Self {
            instances: [Mutex::new(front), Mutex::new(back)],
            front: AtomicU8::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn front_index(&self) -> usize {
        self.front.load(Ordering::Acquire) as usize
    }

    #[inline]
    #[must_use]
    pub fn back_index(&self) -> usize {
        1 - self.front_index()
    }

    /// Makes the back instance the front one. Returns the new front index.
    pub(crate) fn flip(&self) -> usize {
        let back = 1 - self.front.load(Ordering::Relaxed);
        self.front.store(back, Ordering::Release);
        trace!("buffer flip, front is now #{back}");
        back as usize
    }

    pub(crate) fn read_front<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.instances[self.front_index()].lock();
        f(&guard)
    }

    pub(crate) fn write_back<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let back = self.back_index();
        let mut guard = match self.instances[back].try_lock() {
            Some(g) => g,
            None => {
                warn!("back instance #{back} is being read, waiting");
                self.instances[back].lock()
            }
        };
        f(&mut guard)
    }

    /// Writes both instances with the same content. Only valid while the host
    /// is not drawing, i.e. during a blank-phase pass.
    pub(crate) fn write_both(&self, f: impl Fn(&mut T)) {
        for instance in &self.instances {
            f(&mut instance.lock());
        }
    }

    #[cfg(test)]
    pub(crate) fn instance<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> R {
        f(&self.instances[index].lock())
    }
}

impl<T: Default> Default for DoubleBuffer<T> {
    fn default() -> Self {
        DoubleBuffer::new(T::default(), T::default())
    }
}
