//! The block-walking read and write loops.

use crate::blkio;
use crate::config::BLOCK_SIZE;
use crate::structs::FileEntry;
use crate::BlockDevice;

/// Writes `data` into `entry`'s blocks starting at byte `offset`. The caller
/// has already clipped `data` to the file's size; this walks the affected
/// blocks and stops at the first short transfer.
/// Returns the number of bytes written.
pub fn fwrite<D: BlockDevice>(device: &D, entry: &FileEntry, data: &[u8], offset: u32) -> usize {
    let mut block_num = offset as usize / BLOCK_SIZE;
    let mut block_off = offset as usize % BLOCK_SIZE;
    let mut written = 0;

    while written < data.len() {
        let next = (BLOCK_SIZE - block_off).min(data.len() - written);
        let ret = blkio::write_to_block(
            device,
            &data[written..written + next],
            entry.start_block + block_num as u32,
            block_off,
            next,
        );
        written += ret;
        if ret != next {
            break;
        }
        block_num += 1;
        block_off = 0;
    }

    written
}

/// Reads from `entry`'s blocks starting at byte `offset` until `out` is
/// full. The caller has already clipped `out` to the file's size.
/// Returns the number of bytes read.
pub fn fread<D: BlockDevice>(device: &D, entry: &FileEntry, out: &mut [u8], offset: u32) -> usize {
    let mut block_num = offset as usize / BLOCK_SIZE;
    let mut block_off = offset as usize % BLOCK_SIZE;
    let mut read = 0;

    while read < out.len() {
        let next = (BLOCK_SIZE - block_off).min(out.len() - read);
        let ret = blkio::read_from_block(
            device,
            &mut out[read..read + next],
            entry.start_block + block_num as u32,
            block_off,
            next,
        );
        read += ret;
        if ret != next {
            break;
        }
        block_num += 1;
        block_off = 0;
    }

    read
}
