//! Relframe: relational-frame puzzle engine
//!
//! Generates premise chains with a derivable query across five frames
//! (magnitude, identity, containment, 2D space, 3D space), layers the
//! perspective, movement, cipher, night and interference modifiers on top,
//! and drives rounds through an adaptive session state machine.

pub mod core;
pub mod types;

// =============================================================================
// SCORING [C]
// =============================================================================

/// Points per premise for a correct answer (score += depth * this)
pub const SCORE_PER_DEPTH: u32 = 10;

/// Points removed for a wrong answer or a timeout (floored at zero)
pub const WRONG_ANSWER_PENALTY: u32 = 20;

// =============================================================================
// ADAPTIVE DIFFICULTY [C]
// =============================================================================

/// Lowest depth (premise count) a session can reach
pub const MIN_DEPTH: usize = 2;

/// Consecutive correct answers needed for depth + 1
pub const PROGRESS_STREAK_TARGET: u32 = 3;

/// Consecutive misses (above the floor) needed for depth - 1
pub const MISTAKE_STREAK_TARGET: u32 = 2;

// =============================================================================
// GENERATION [C]
// =============================================================================

/// Chance of a fresh cipher key on any round after the first
pub const CIPHER_REKEY_PROBABILITY: f64 = 0.15;

/// Chance a round runs in night mode when the modifier is enabled
pub const NIGHT_MODE_PROBABILITY: f64 = 0.5;

/// Chance a query asks about a true relation
pub const TRUE_QUERY_PROBABILITY: f64 = 0.5;

/// Attempts to find a movement target not under the walker's feet
pub const MOVEMENT_REROLL_LIMIT: usize = 50;

/// Movement instructions per round (inclusive range)
pub const MOVEMENT_MIN_STEPS: usize = 2;
pub const MOVEMENT_MAX_STEPS: usize = 3;

// =============================================================================
// TIMERS [C]
// =============================================================================

/// Period of the session and question countdown ticks (milliseconds)
pub const COUNTDOWN_TICK_MS: u64 = 1000;

/// Period of the interference palette tick (milliseconds)
pub const INTERFERENCE_TICK_MS: u64 = 500;

// =============================================================================
// POOLS [C]
// =============================================================================

/// Nonsense codes a cipher draws from. 24 codes for 20 keywords.
pub const CIPHER_TOKEN_POOL: [&str; 24] = [
    "ZUP", "KEV", "MOR", "TAL", "VEX", "JIB", "QOR", "NAF",
    "LUD", "SEB", "WIX", "POG", "DAK", "FUN", "HOV", "RIZ",
    "YAL", "GEM", "BOK", "CIV", "TEP", "NUX", "SOM", "KAZ",
];

/// Emoji symbols available to the emoji style
pub const EMOJI_POOL: [&str; 32] = [
    "🍎", "🐙", "🚀", "🌵", "🎲", "🦊", "🍄", "🔔",
    "🐢", "🎈", "🌙", "🧲", "🍋", "🦉", "⚓", "🎻",
    "🐝", "🍩", "🔑", "🌻", "🦀", "🧊", "🎯", "🪁",
    "🐳", "🍇", "🕯", "🦋", "🧭", "🍒", "🪨", "🐌",
];

/// Palette the interference task cycles through
pub const INTERFERENCE_PALETTE: [&str; 4] = ["RED", "GREEN", "BLUE", "YELLOW"];

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
