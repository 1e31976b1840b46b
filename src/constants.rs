//! Constants for board geometry, direction offsets, and engine defaults.
//!
//! The board uses a 1D array with a one-cell wall border on every side, so a
//! line walk in any of the eight directions always stops on a wall before it
//! can leave the array.

// =============================================================================
// Board Geometry
// =============================================================================

/// Playable board size (NxN).
pub const N: usize = 8;

/// Board width including the wall column on each side.
pub const W: usize = N + 2;

/// Total board array size including the wall border.
pub const BOARDSIZE: usize = W * W;

/// First playable index (row 1, column 1).
pub const BOARD_IMIN: usize = W + 1;

/// Last playable index (row N, column N).
pub const BOARD_IMAX: usize = N * W + N;

// =============================================================================
// Directions
// =============================================================================

/// Number of compass directions.
pub const NUM_DIRECTIONS: usize = 8;

/// Offsets to neighboring cells in the 1D board array.
/// Order: North, NE, East, SE, South, SW, West, NW
pub const DELTA: [isize; NUM_DIRECTIONS] = [
    -(W as isize),     // North (up one row)
    -(W as isize) + 1, // NE
    1,                 // East
    W as isize + 1,    // SE
    W as isize,        // South (down one row)
    W as isize - 1,    // SW
    -1,                // West
    -(W as isize) - 1, // NW
];

// =============================================================================
// Search Parameters
// =============================================================================

/// Default AI lookahead in plies.
pub const DEFAULT_LOOKAHEAD: usize = 2;

/// Largest lookahead accepted from the command line or the text protocol.
pub const MAX_LOOKAHEAD: usize = 6;

/// Sentinel id of the root search node (not a playable point).
pub const ROOT_ID: usize = 0;
