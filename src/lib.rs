//! Pion is a minimal flat file system for the boot and data partitions of
//! CafOS. The OS, the installer, and the bootloader all link against this
//! crate to read and write named byte-stream files on one partition.
//!
//! On-partition layout:
//! - Directory page: blocks [0, DIR_BLOCKS), holding a signature, a file
//!   count, and one packed record per file. Resident in memory and written
//!   back after every mutation.
//! - File area: blocks [DIR_BLOCKS, partition_num_blocks), one contiguous
//!   run of blocks per file, laid out in creation order. Allocation is
//!   append-only and nothing is ever reclaimed.
//!
//! Pion's layers (from bottom to top):
//! 1. Block Device: whole-block access to the partition.       | User implemented (hardware-specific)
//! 2. Block I/O: byte-granular transfers, short-count errors.  | Fs implemented
//! 3. Directory: the resident, persistent file records.        | Fs implemented
//! 4. Allocation: append-only contiguous block ranges.         | Fs implemented
//! 5. FileSystem: open/read/write/close over small handles.    | Fs implemented
//!
//! There is no hierarchy, no rename, no delete, and no permissions; files
//! only ever grow, and a partition belongs to one process at a time.

//#![no_std]

// Users of this crate must enable the `alloc` feature for heap allocations.
extern crate alloc;

mod bitmap;
mod blkio;
mod block_dev;
mod config;
mod directory;
mod error;
mod expand;
mod file;
mod fs;
mod structs;

pub use block_dev::BlockDevice;
pub use config::*;
pub use error::FsError as Error;
pub use error::Result;
pub use fs::FileSystem;
pub use structs::FileEntry;
