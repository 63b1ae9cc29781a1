use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::warn;

use crate::bitmap::FdBitmap;
use crate::config::*;
use crate::directory::Directory;
use crate::expand::{expand_file_size, release_file_blocks};
use crate::file::{fread, fwrite};
use crate::structs::FileEntry;
use crate::BlockDevice;

/// A mounted flat-namespace partition: the file registry, the resident
/// directory page, and the open-handle table.
///
/// The value is owned by the caller and is not re-entrant; wrap a lock
/// around it if several tasks share one partition.
#[derive(Debug)]
pub struct FileSystem<D: BlockDevice> {
    device: Arc<D>,
    partition_num_blocks: u32,
    directory: Directory,
    /// All known files in creation order. Entries are never removed, so an
    /// index into this is a stable file id.
    files: Vec<FileEntry>,
    /// Maps an open handle to its index in `files`.
    handles: [Option<usize>; MAX_FD],
    fd_bitmap: FdBitmap,
}

impl<D: BlockDevice> FileSystem<D> {
    /// Mounts the partition. A page carrying the directory signature has its
    /// file records recovered; anything else is treated as blank media and
    /// formatted in place. A partition size beyond what the device reports
    /// is clamped to the device, so allocation can never run off its end.
    pub fn init(device: Arc<D>, partition_num_blocks: u32) -> Self {
        let device_blocks = device.num_blocks();
        let partition_num_blocks = if partition_num_blocks as usize > device_blocks {
            warn!(
                "partition of {partition_num_blocks} blocks on a {device_blocks}-block device; clamping"
            );
            device_blocks as u32
        } else {
            partition_num_blocks
        };

        let mut directory = Directory::load(&*device);
        let files = if directory.has_signature() {
            directory.recover_files()
        } else {
            directory.format();
            directory.flush(&*device);
            Vec::new()
        };

        FileSystem {
            device,
            partition_num_blocks,
            directory,
            files,
            handles: [None; MAX_FD],
            fd_bitmap: FdBitmap::new(),
        }
    }

    /// Opens `filename` and returns a handle in [1, MAX_FD), or 0 on any
    /// failure: an unknown mode, a file that is already open, an unknown
    /// name without OPEN_CREATE_MODE, a full directory page, or no free
    /// handle.
    pub fn open(&mut self, filename: &str, mode: u32) -> u32 {
        if mode != OPEN_MODE && mode != OPEN_CREATE_MODE {
            warn!("open {filename:?}: invalid mode {mode}");
            return 0;
        }

        let mut target = None;
        if let Some(idx) = self.files.iter().position(|f| f.filename == filename) {
            if self.files[idx].opened {
                return 0;
            }
            target = Some(idx);
        }

        if target.is_none() && mode == OPEN_CREATE_MODE {
            if filename.is_empty() || filename.len() >= MAX_FILENAME_SIZE {
                warn!(
                    "open: name must be between 1 and {} bytes",
                    MAX_FILENAME_SIZE - 1
                );
                return 0;
            }

            let mut entry = FileEntry::new(filename);
            if let Err(err) = self.directory.add_file(&*self.device, &mut entry) {
                warn!("open {filename:?}: {err}");
                release_file_blocks(&entry);
                return 0;
            }
            self.files.push(entry);
            target = Some(self.files.len() - 1);
        }

        let Some(idx) = target else {
            return 0;
        };

        let fd = match self.fd_bitmap.alloc() {
            Ok(fd) => fd,
            Err(err) => {
                warn!("open {filename:?}: {err}");
                return 0;
            }
        };
        debug_assert!(fd > 0 && (fd as usize) < MAX_FD);
        debug_assert!(self.handles[fd as usize].is_none());

        self.handles[fd as usize] = Some(idx);
        self.files[idx].opened = true;
        fd
    }

    /// Writes `data` at byte `offset`, growing the file first when the write
    /// runs past its current end. Returns the bytes actually written, which
    /// comes up short of `data.len()` when growth is refused or the device
    /// cuts the transfer off; writing anywhere past the end yields 0.
    pub fn write(&mut self, fd: u32, data: &[u8], offset: u32) -> u32 {
        let Some(idx) = self.lookup_handle(fd) else {
            return 0;
        };

        let wanted = offset as u64 + data.len() as u64;
        if (self.files[idx].size as u64) < wanted {
            if offset > self.files[idx].size {
                warn!(
                    "write to {:?}: offset {offset} past end of file ({} bytes)",
                    self.files[idx].filename, self.files[idx].size
                );
                return 0;
            }
            // Grow as far as the partition allows; a refusal just means the
            // write comes up short below.
            if let Ok(new_size) = u32::try_from(wanted) {
                if let Err(err) = expand_file_size(
                    &*self.device,
                    &mut self.directory,
                    &mut self.files,
                    idx,
                    self.partition_num_blocks,
                    new_size,
                ) {
                    warn!(
                        "could not grow {:?} to {new_size} bytes: {err}",
                        self.files[idx].filename
                    );
                }
            }
        }

        let entry = &self.files[idx];
        if offset >= entry.size {
            return 0;
        }
        let len = data.len().min((entry.size - offset) as usize);
        fwrite(&*self.device, entry, &data[..len], offset) as u32
    }

    /// Reads up to `out.len()` bytes at byte `offset`. The transfer is
    /// clipped to the end of the file; 0 means the offset is at or past it.
    pub fn read(&self, fd: u32, out: &mut [u8], offset: u32) -> u32 {
        let Some(idx) = self.lookup_handle(fd) else {
            return 0;
        };

        let entry = &self.files[idx];
        if offset >= entry.size {
            return 0;
        }
        let len = out.len().min((entry.size - offset) as usize);
        fread(&*self.device, entry, &mut out[..len], offset) as u32
    }

    /// Releases a handle. Returns 0, or ERR_INVALID for a handle that is not
    /// currently open.
    pub fn close(&mut self, fd: u32) -> i32 {
        let Some(idx) = self.lookup_handle(fd) else {
            return ERR_INVALID;
        };

        self.files[idx].opened = false;
        self.handles[fd as usize] = None;
        self.fd_bitmap.release(fd);
        0
    }

    /// Flushes the directory page and releases the partition. Every mutation
    /// already flushes, so calling this is a formality before dropping the
    /// manager; the same device can be handed to `init` again afterwards.
    pub fn close_fs(self) {
        self.directory.flush(&*self.device);
        if let Err(err) = self.device.flush() {
            warn!("device flush failed: {err}");
        }
    }

    /// One line per known file, for debugging and test narration.
    pub fn dump(&self) -> String {
        use core::fmt::Write;

        let mut out = String::new();
        let _ = write!(
            out,
            "{} blocks, {} files",
            self.partition_num_blocks,
            self.files.len()
        );
        for file in &self.files {
            let _ = write!(
                out,
                "\n  {:?}: start_block={} num_blocks={} size={}{}",
                file.filename,
                file.start_block,
                file.num_blocks,
                file.size,
                if file.opened { " (open)" } else { "" },
            );
        }
        out
    }

    fn lookup_handle(&self, fd: u32) -> Option<usize> {
        if fd == 0 || fd as usize >= MAX_FD {
            warn!("invalid handle {fd}");
            return None;
        }
        let Some(idx) = self.handles[fd as usize] else {
            warn!("handle {fd} is not open");
            return None;
        };
        if !self.files[idx].opened {
            warn!("handle {fd} refers to a closed file");
            return None;
        }
        Some(idx)
    }
}
