//! Common utilities for tests
#![allow(unused)]

use std::sync::{Arc, Mutex};

use pion::*;

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

/// Routes the crate's `log` output through env_logger, so RUST_LOG=warn
/// shows what the core complains about while a test runs.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
pub struct RamDisk {
    inner: Arc<Mutex<Vec<u8>>>,
    num_blocks: usize,
}

impl RamDisk {
    /// Creates a new RamDisk with the specified number of blocks.
    /// Each block is BLOCK_SIZE bytes, zero-filled from the start, so
    /// never-written blocks read back as zeros with no extra bookkeeping.
    pub fn new(num_blocks: usize) -> Self {
        let size = num_blocks * BLOCK_SIZE;
        let inner = Arc::new(Mutex::new(vec![0u8; size]));
        RamDisk { inner, num_blocks }
    }
}

impl BlockDevice for RamDisk {
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: u32, buf: &mut [u8]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let data = self.inner.lock().unwrap();
        buf.copy_from_slice(&data[start..start + BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_id: u32, buf: &[u8]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let mut data = self.inner.lock().unwrap();
        data[start..start + BLOCK_SIZE].copy_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // In a RAM disk, flushing is a no-op since data is already in memory.
        Ok(())
    }
}

/// Creates `name`, writes `data` at offset 0, and closes it again, asserting
/// every step.
pub fn write_file<D: BlockDevice>(fs: &mut FileSystem<D>, name: &str, data: &[u8]) {
    let fd = fs.open(name, OPEN_CREATE_MODE);
    assert_ne!(fd, 0, "failed to open/create {name}");
    assert_eq!(fs.write(fd, data, 0), data.len() as u32, "short write to {name}");
    assert_eq!(fs.close(fd), 0, "failed to close {name}");
}

/// Opens `name` and asserts its first `data.len()` bytes equal `data`.
pub fn assert_file_eq<D: BlockDevice>(fs: &mut FileSystem<D>, name: &str, data: &[u8]) {
    let fd = fs.open(name, OPEN_MODE);
    assert_ne!(fd, 0, "failed to open {name}");
    let mut buf = vec![0u8; data.len()];
    assert_eq!(fs.read(fd, &mut buf, 0), data.len() as u32, "short read from {name}");
    assert_eq!(fs.close(fd), 0, "failed to close {name}");
    assert_eq!(buf, data, "contents of {name} differ");
}

/// Byte pattern for multi-block payloads; period 251 keeps block boundaries
/// and pattern boundaries from lining up.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
