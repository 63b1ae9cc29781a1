use crate::error::FsError;

pub trait BlockDevice: Send + Sync {
    /// Returns the number of blocks in the partition.
    fn num_blocks(&self) -> usize;

    /// Reads one block of data from the device.
    /// buf.len() must be equal to block_size().
    /// A block that has never been written must read back zero-filled.
    fn read_block(&self, block_id: u32, buf: &mut [u8]) -> Result<(), FsError>;

    /// Writes one block of data to the device.
    /// buf.len() must be equal to block_size().
    fn write_block(&self, block_id: u32, buf: &[u8]) -> Result<(), FsError>;

    /// Flushes any buffered data to stable storage.
    fn flush(&self) -> Result<(), FsError>;

    /// Returns the size of each block in bytes.
    fn block_size(&self) -> usize {
        crate::config::BLOCK_SIZE
    }
}
