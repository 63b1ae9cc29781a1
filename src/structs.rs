use alloc::string::String;

use crate::config::*;

/// One known file. Entries come into being at create-open time or are
/// recovered from the directory page at init, and live until the file
/// system is dropped; there is no delete.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub filename: String,
    /// First payload block in the partition, or 0 while the file has never
    /// been written to.
    pub start_block: u32,
    /// Contiguous blocks currently allocated to the file.
    pub num_blocks: u32,
    /// Logical length in bytes. Never larger than num_blocks * BLOCK_SIZE.
    pub size: u32,
    /// Byte position of this file's record in the directory page. Records
    /// never move, so this is stamped once at creation or recovery.
    pub dir_offset: usize,
    /// At most one handle per file; this gates the second open.
    pub opened: bool,
}

impl FileEntry {
    pub fn new(filename: &str) -> Self {
        FileEntry {
            filename: filename.into(),
            start_block: 0,
            num_blocks: 0,
            size: 0,
            dir_offset: 0,
            opened: false,
        }
    }

    /// Bytes this entry's record occupies in the directory page. Fixed for
    /// the life of the entry because the filename is immutable.
    pub fn record_len(&self) -> usize {
        self.filename.len() + RECORD_OVERHEAD
    }
}
