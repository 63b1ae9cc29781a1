//! The resident directory page.
//!
//! Blocks [0, DIR_BLOCKS) of the partition hold the only persistent
//! metadata: a four-byte signature, a little-endian u16 file count, and one
//! packed record per file. The whole page stays resident and is written back
//! after every mutation, which is what lets it survive without a journal:
//! records are append-only and in-place rewrites never change a record's
//! length.
//!
//! Record layout, starting at byte 6:
//! - u16 filename length
//! - filename bytes + NUL
//! - u32 start_block
//! - u32 num_blocks
//! - u32 size

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use log::warn;

use crate::blkio;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::structs::FileEntry;
use crate::BlockDevice;

fn read_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

#[derive(Debug)]
pub struct Directory {
    data: Vec<u8>,
    /// Append cursor: the first free byte after the last record.
    ptr: usize,
}

impl Directory {
    /// Reads the directory blocks into a fresh page. A short read leaves the
    /// rest of the page zeroed, which then fails the signature check and
    /// routes init to a reformat.
    pub fn load<D: BlockDevice>(device: &D) -> Self {
        let mut data = vec![0u8; DIR_DATA_SIZE];
        let read = blkio::read_blocks(device, &mut data, 0, DIR_BLOCKS as u32);
        if read != DIR_DATA_SIZE {
            warn!("short directory read: {read} of {DIR_DATA_SIZE} bytes");
        }
        Directory {
            data,
            ptr: DIR_HEADER_SIZE,
        }
    }

    pub fn has_signature(&self) -> bool {
        self.data[..4] == DIR_SIGNATURE
    }

    /// Stamps a fresh page: signature, zero files, cursor at the first
    /// record position.
    pub fn format(&mut self) {
        self.data.fill(0);
        self.data[..4].copy_from_slice(&DIR_SIGNATURE);
        self.ptr = DIR_HEADER_SIZE;
    }

    /// Writes the whole page back to the front of the partition.
    pub fn flush<D: BlockDevice>(&self, device: &D) {
        let written = blkio::write_blocks(device, &self.data, 0, DIR_BLOCKS as u32);
        if written != DIR_DATA_SIZE {
            warn!("short directory flush: {written} of {DIR_DATA_SIZE} bytes");
        }
    }

    pub fn file_count(&self) -> u16 {
        u16::from_le_bytes([self.data[4], self.data[5]])
    }

    fn set_file_count(&mut self, count: u16) {
        self.data[4..6].copy_from_slice(&count.to_le_bytes());
    }

    /// Serializes `entry`'s record at its `dir_offset`, in place. Filenames
    /// are immutable, so the rewrite never moves a neighboring record.
    /// Accepts names up to the recovery bound of MAX_FILENAME_SIZE bytes;
    /// the stricter open-time limit lives in `FileSystem::open`.
    pub fn update_file(&mut self, entry: &FileEntry) -> Result<()> {
        let name = entry.filename.as_bytes();
        if name.len() > MAX_FILENAME_SIZE {
            return Err(FsError::InvalidFileName);
        }
        if entry.dir_offset + name.len() + RECORD_OVERHEAD > DIR_DATA_SIZE {
            return Err(FsError::DirectoryFull);
        }

        let mut off = entry.dir_offset;
        self.data[off..off + 2].copy_from_slice(&(name.len() as u16).to_le_bytes());
        off += 2;
        self.data[off..off + name.len()].copy_from_slice(name);
        self.data[off + name.len()] = 0;
        off += name.len() + 1;
        self.data[off..off + 4].copy_from_slice(&entry.start_block.to_le_bytes());
        off += 4;
        self.data[off..off + 4].copy_from_slice(&entry.num_blocks.to_le_bytes());
        off += 4;
        self.data[off..off + 4].copy_from_slice(&entry.size.to_le_bytes());

        Ok(())
    }

    /// Appends a record for a newly created file, bumps the file count, and
    /// persists the page. Fails when the page has no room for the record.
    pub fn add_file<D: BlockDevice>(&mut self, device: &D, entry: &mut FileEntry) -> Result<()> {
        entry.dir_offset = self.ptr;
        self.update_file(entry)?;

        self.ptr += entry.record_len();
        let count = self.file_count() + 1;
        self.set_file_count(count);
        self.flush(device);

        Ok(())
    }

    /// Decodes the records a previous session left behind and positions the
    /// append cursor after them. Stops at the first record that fails a
    /// bounds check; everything after it stays lost.
    pub fn recover_files(&mut self) -> Vec<FileEntry> {
        let count = self.file_count();
        let mut files = Vec::new();
        self.ptr = DIR_HEADER_SIZE;

        for _ in 0..count {
            let record_start = self.ptr;
            if self.ptr + 2 > DIR_DATA_SIZE {
                break;
            }
            let name_len = u16::from_le_bytes([self.data[self.ptr], self.data[self.ptr + 1]]) as usize;
            if self.ptr + name_len + RECORD_OVERHEAD > DIR_DATA_SIZE {
                break;
            }
            self.ptr += 2;
            if name_len > MAX_FILENAME_SIZE {
                break;
            }

            let name = String::from_utf8_lossy(&self.data[self.ptr..self.ptr + name_len]).into_owned();
            self.ptr += name_len + 1;

            let start_block = read_u32(&self.data, self.ptr);
            self.ptr += 4;
            let num_blocks = read_u32(&self.data, self.ptr);
            self.ptr += 4;
            let size = read_u32(&self.data, self.ptr);
            self.ptr += 4;

            files.push(FileEntry {
                filename: name,
                start_block,
                num_blocks,
                size,
                dir_offset: record_start,
                opened: false,
            });
        }

        if files.len() < count as usize {
            warn!(
                "directory recovery stopped early: {} of {count} records decoded",
                files.len()
            );
        }

        files
    }
}
