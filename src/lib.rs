//! An indeterminate terminal spinner.
//!
//! ```no_run
//! use whirl::config::Config;
//! use whirl::spinner::Spinner;
//!
//! let spinner = Spinner::new(Config::default());
//! spinner.start();
//! // ... long-running work ...
//! spinner.stop();
//! ```

pub mod config;
pub mod consts;
pub mod spinner;
