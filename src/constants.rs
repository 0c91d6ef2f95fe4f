// Board geometry constants
pub const BOARD_SIZE: usize = 15;
pub const CELL_SIZE: f64 = 40.0;
pub const BOARD_MARGIN: f64 = 20.0;
/// Clicks further than this fraction of a cell from the nearest intersection are ignored.
pub const CLICK_TOLERANCE: f64 = 0.3;

// Search constants
pub const DEFAULT_AI_DEPTH: u32 = 3;
pub const MAX_AI_DEPTH: u32 = 7;
pub const TRANSPOSITION_CAPACITY: usize = 1_000_000;
pub const AI_THINK_DELAY_MS: u64 = 500;

// Multiplayer constants
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const INVITE_CODE_LENGTH: usize = 6;
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_BASE_DELAY_MS: u64 = 500;
pub const RECONNECT_MAX_DELAY_MS: u64 = 30_000;
