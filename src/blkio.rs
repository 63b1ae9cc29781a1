//! Byte-granular i/o on top of whole-block devices.
//!
//! Nothing in this layer returns an error: every transfer reports the number
//! of bytes actually moved, and callers compare that against what they asked
//! for. A short count means the device cut the transfer off.

use crate::config::BLOCK_SIZE;
use crate::BlockDevice;

/// Reads `num_blocks` consecutive blocks starting at `start_block` into
/// `buf`, which must hold at least `num_blocks * BLOCK_SIZE` bytes.
pub fn read_blocks<D: BlockDevice>(
    device: &D,
    buf: &mut [u8],
    start_block: u32,
    num_blocks: u32,
) -> usize {
    let mut read = 0;
    for i in 0..num_blocks as usize {
        let chunk = &mut buf[i * BLOCK_SIZE..(i + 1) * BLOCK_SIZE];
        if device.read_block(start_block + i as u32, chunk).is_err() {
            return read;
        }
        read += BLOCK_SIZE;
    }
    read
}

/// Writes `num_blocks` consecutive blocks starting at `start_block` from
/// `buf`.
pub fn write_blocks<D: BlockDevice>(
    device: &D,
    buf: &[u8],
    start_block: u32,
    num_blocks: u32,
) -> usize {
    let mut written = 0;
    for i in 0..num_blocks as usize {
        let chunk = &buf[i * BLOCK_SIZE..(i + 1) * BLOCK_SIZE];
        if device.write_block(start_block + i as u32, chunk).is_err() {
            return written;
        }
        written += BLOCK_SIZE;
    }
    written
}

/// Copies `len` bytes out of one block, starting `block_off` bytes in.
/// Requires `block_off + len <= BLOCK_SIZE`.
pub fn read_from_block<D: BlockDevice>(
    device: &D,
    dst: &mut [u8],
    block_id: u32,
    block_off: usize,
    len: usize,
) -> usize {
    if block_off + len > BLOCK_SIZE {
        return 0;
    }

    let mut buf = [0u8; BLOCK_SIZE];
    if read_blocks(device, &mut buf, block_id, 1) != BLOCK_SIZE {
        return 0;
    }

    dst[..len].copy_from_slice(&buf[block_off..block_off + len]);
    len
}

/// Splices `len` bytes into one block at `block_off`. A partial write first
/// reads the block back so the surrounding bytes survive.
/// Requires `block_off + len <= BLOCK_SIZE`.
pub fn write_to_block<D: BlockDevice>(
    device: &D,
    src: &[u8],
    block_id: u32,
    block_off: usize,
    len: usize,
) -> usize {
    if block_off + len > BLOCK_SIZE {
        return 0;
    }

    let mut buf = [0u8; BLOCK_SIZE];
    if !(block_off == 0 && len == BLOCK_SIZE)
        && read_blocks(device, &mut buf, block_id, 1) != BLOCK_SIZE
    {
        return 0;
    }

    buf[block_off..block_off + len].copy_from_slice(&src[..len]);

    let written = write_blocks(device, &buf, block_id, 1);
    if written >= len {
        len
    } else {
        written
    }
}
