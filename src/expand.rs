//! Append-only allocation of contiguous block ranges.
//!
//! Nothing is ever freed (there is no delete), so new space always comes
//! from past the high-water mark of allocated blocks, and a file can grow
//! in place only while the blocks straight after its run are unclaimed. A
//! file that cannot grow where it sits cannot grow at all.

use log::warn;

use crate::blkio;
use crate::config::{BLOCK_SIZE, DIR_BLOCKS};
use crate::directory::Directory;
use crate::error::{FsError, Result};
use crate::structs::FileEntry;
use crate::BlockDevice;

/// Zero-fills `count` blocks starting at `start` so unwritten file bytes
/// read back as zero.
fn zero_blocks<D: BlockDevice>(device: &D, start: u32, count: u32) {
    let zeros = [0u8; BLOCK_SIZE];
    for i in 0..count {
        if blkio::write_blocks(device, &zeros, start + i, 1) != BLOCK_SIZE {
            warn!("short write while zeroing block {}", start + i);
        }
    }
}

/// Gives a never-written file its first run of blocks, placed right after
/// the highest allocated block in the partition.
fn expand_empty_file<D: BlockDevice>(
    device: &D,
    files: &mut [FileEntry],
    idx: usize,
    partition_num_blocks: u32,
    needed_blocks: u32,
) -> Result<()> {
    let mut start_block = DIR_BLOCKS as u32;
    for file in files.iter() {
        if file.start_block >= start_block {
            start_block = file.start_block + file.num_blocks;
        }
    }

    if start_block as u64 + needed_blocks as u64 >= partition_num_blocks as u64 {
        return Err(FsError::OutOfSpace);
    }

    zero_blocks(device, start_block, needed_blocks);
    files[idx].start_block = start_block;
    files[idx].num_blocks = needed_blocks;

    Ok(())
}

/// Extends an already-placed file in place. Refuses when another file
/// starts inside the blocks the extension would claim.
fn expand_existing_file<D: BlockDevice>(
    device: &D,
    files: &mut [FileEntry],
    idx: usize,
    partition_num_blocks: u32,
    needed_blocks: u32,
) -> Result<()> {
    let run_end = files[idx].start_block + files[idx].num_blocks;
    for file in files.iter() {
        if file.start_block >= run_end
            && (file.start_block as u64) < run_end as u64 + needed_blocks as u64
        {
            return Err(FsError::OutOfSpace);
        }
    }
    if run_end as u64 + needed_blocks as u64 >= partition_num_blocks as u64 {
        return Err(FsError::OutOfSpace);
    }

    zero_blocks(device, run_end, needed_blocks);
    files[idx].num_blocks += needed_blocks;

    Ok(())
}

/// Grows `files[idx]` so it can hold `new_size` bytes. Slack in the current
/// last block is used up before any blocks are allocated; a file ending
/// exactly on a block boundary has no slack. On success the new size is
/// recorded in the directory page and flushed.
pub fn expand_file_size<D: BlockDevice>(
    device: &D,
    dir: &mut Directory,
    files: &mut [FileEntry],
    idx: usize,
    partition_num_blocks: u32,
    new_size: u32,
) -> Result<()> {
    let size = files[idx].size;
    if size >= new_size {
        return Ok(());
    }

    let empty = size == 0;
    let needed_size = new_size - size;

    let leftover = (BLOCK_SIZE - size as usize % BLOCK_SIZE) as u32;
    if leftover == BLOCK_SIZE as u32 || leftover < needed_size {
        let needed_blocks = needed_size.div_ceil(BLOCK_SIZE as u32);
        if empty {
            expand_empty_file(device, files, idx, partition_num_blocks, needed_blocks)?;
        } else {
            expand_existing_file(device, files, idx, partition_num_blocks, needed_blocks)?;
        }
    }

    files[idx].size = new_size;
    if let Err(err) = dir.update_file(&files[idx]) {
        // The in-memory entry and the on-disk record disagree from here on.
        warn!(
            "directory record for {:?} not updated: {err}",
            files[idx].filename
        );
    }
    dir.flush(device);

    Ok(())
}

/// Blocks are never reclaimed: delete is unsupported and the allocator never
/// revisits space. Kept as the single place a future delete would hook into.
pub fn release_file_blocks(_entry: &FileEntry) {}
