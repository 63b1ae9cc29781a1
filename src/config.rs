pub const BLOCK_SIZE: usize = 512; // One partition block, in bytes
pub const DIR_BLOCKS: usize = 2; // Blocks at the front of the partition holding the directory
pub const DIR_DATA_SIZE: usize = BLOCK_SIZE * DIR_BLOCKS;

pub const DIR_SIGNATURE: [u8; 4] = *b"$%^&"; // Marks a formatted directory
pub const DIR_HEADER_SIZE: usize = 6; // Signature (4) + file count (2); first record starts here
pub const RECORD_OVERHEAD: usize = 15; // Length prefix (2) + NUL (1) + start/num/size (12)

pub const MAX_FD: usize = 64; // Handle namespace bound; must stay divisible by 8
pub const MAX_FILENAME_SIZE: usize = 256;

pub const OPEN_MODE: u32 = 0; // Open an existing file
pub const OPEN_CREATE_MODE: u32 = 1; // Open, creating the file first if the name is unknown

// Error sentinels. The public operations collapse every failure to 0 (open,
// read, write) or ERR_INVALID (close); the rest are kept for callers that
// grew up comparing against them.
pub const ERR_INVALID: i32 = -2;
pub const ERR_EXIST: i32 = -5;
pub const ERR_MEMORY: i32 = -6;
pub const ERR_FOUND: i32 = -7;
