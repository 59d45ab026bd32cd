//! Spinner configuration.

use std::time::Duration;

use crate::consts::{DEFAULT_FRAME_RATE, DEFAULT_FRAMES};

/// Animation settings, fixed once a [`Spinner`](crate::spinner::Spinner) is built.
///
/// Override single fields with struct update syntax:
///
/// ```
/// use std::time::Duration;
/// use whirl::config::Config;
///
/// let config = Config {
///     frame_rate: Duration::from_millis(100),
///     ..Config::default()
/// };
/// assert_eq!(config.frames.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Time each glyph stays on screen. Zero means the default.
    pub frame_rate: Duration,
    /// Glyphs drawn in order, wrapping around. Empty means the default set.
    pub frames: Vec<char>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            frames: DEFAULT_FRAMES.to_vec(),
        }
    }
}

impl Config {
    /// Replace unset values with their defaults.
    pub(crate) fn resolved(mut self) -> Self {
        if self.frame_rate.is_zero() {
            self.frame_rate = DEFAULT_FRAME_RATE;
        }
        if self.frames.is_empty() {
            self.frames = DEFAULT_FRAMES.to_vec();
        }
        self
    }
}
