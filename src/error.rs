use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    #[error("block {0} is out of range for the device")]
    InvalidBlockId(u32),
    #[error("block device i/o failed")]
    IoError,
    #[error("file name must be between 1 and 255 bytes")]
    InvalidFileName,
    #[error("directory page has no room for another record")]
    DirectoryFull,
    #[error("all file handles are in use")]
    OutOfHandles,
    #[error("not enough free blocks past the allocation high-water mark")]
    OutOfSpace,
}

pub type Result<T> = core::result::Result<T, FsError>;
