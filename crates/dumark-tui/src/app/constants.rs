//! Application constants.

/// Number of rows to move when pressing Page Up/Down.
pub const PAGE_SIZE: usize = 10;

/// Capacity of the command queue between input and session.
pub const COMMAND_CHANNEL_SIZE: usize = 32;

/// Minimum interval between two progress lines while walking.
pub const PROGRESS_INTERVAL_MS: u64 = 50;
