//! Project-wide constants.

use std::time::Duration;

/// Time between frame advances when none is configured.
pub const DEFAULT_FRAME_RATE: Duration = Duration::from_millis(250);

/// Glyphs cycled through when none are configured.
pub const DEFAULT_FRAMES: &[char] = &['-', '\\', '|', '/'];

/// Erases the glyph just drawn.
pub const BACKSPACE: u8 = 0x08;
