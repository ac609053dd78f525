use ::shared_memory::{Shmem, ShmemConf, ShmemError};

use crate::consts::IMAGE_LEN;
use crate::shared_memory::SharedMemory;

pub const DEFAULT_FLINK: &str = "cdfj-image";

/// Display data image mirrored into a named OS shared memory segment, for
/// debuggers and frontends running in another process.
pub struct ImageExport {
    shmem: Shmem,
}

impl ImageExport {
    /// Creates the segment behind `flink`, or attaches to it if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment can neither be created nor opened, or
    /// if an existing one is too small for the image.
    pub fn new(flink: &str) -> Result<Self, String> {
        let shmem = match ShmemConf::new().size(IMAGE_LEN).flink(flink).create() {
            Ok(m) => m,
            Err(ShmemError::LinkExists) => match ShmemConf::new().flink(flink).open() {
                Ok(s) => s,
                Err(_) => match ShmemConf::new()
                    .size(IMAGE_LEN)
                    .flink(flink)
                    .force_create_flink()
                    .create()
                {
                    Ok(m) => m,
                    Err(e) => {
                        return Err(format!(
                            "Unable to create or open shmem flink '{flink}' : {e}"
                        ))
                    }
                },
            },
            Err(e) => {
                return Err(format!(
                    "Unable to create or open shmem flink '{flink}' : {e}"
                ))
            }
        };
        if shmem.len() < IMAGE_LEN {
            return Err(format!(
                "shmem flink '{flink}' is {} bytes, {IMAGE_LEN} needed",
                shmem.len()
            ));
        }
        Ok(ImageExport { shmem })
    }

    pub fn publish(&mut self, image: &SharedMemory) {
        let len = image.len().min(self.shmem.len());
        unsafe {
            core::ptr::copy_nonoverlapping(image.as_slice().as_ptr(), self.shmem.as_ptr(), len);
        }
    }

    #[must_use]
    pub fn read(&self) -> SharedMemory {
        let mut image = SharedMemory::default();
        let len = image.len().min(self.shmem.len());
        unsafe {
            image.copy(0, core::slice::from_raw_parts(self.shmem.as_ptr(), len));
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_image_is_readable() {
        let flink = format!("{}-{}", DEFAULT_FLINK, std::process::id());
        let mut export = ImageExport::new(&flink).unwrap();
        let mut image = SharedMemory::default();
        image.set(0x0007, 2);
        image.set(0x033b, 0x48);
        export.publish(&image);
        assert_eq!(export.read(), image);
    }
}
