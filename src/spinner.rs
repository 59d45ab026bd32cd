//! A start/stop terminal spinner driven by a background thread.
//!
//! Each visible frame is one glyph followed, one interval later, by a single
//! backspace byte. [`Spinner::stop`] returns only after the glyph on screen
//! has been erased, so callers can print right after it.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::Config;
use crate::consts::BACKSPACE;

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Whether an animation loop is alive for this spinner.
enum State {
    Idle,
    Running(Run),
}

/// Handles to the one live animation loop.
struct Run {
    /// Flipped to `true` to ask the loop to stop.
    cancel: watch::Sender<bool>,
    /// Flipped to `true` by the loop once its last glyph is erased.
    done: watch::Receiver<bool>,
}

/// An indeterminate busy indicator.
///
/// Call [`Spinner::start`] to begin, then [`Spinner::stop`] when done.
/// Both are idempotent and may be called from any thread. Dropping the
/// spinner stops it.
pub struct Spinner {
    sink: Sink,
    frame_rate: Duration,
    frames: Arc<[char]>,
    state: RwLock<State>,
}

impl Spinner {
    /// Create a spinner that draws on stderr.
    pub fn new(config: Config) -> Self {
        Self::with_writer(config, io::stderr())
    }

    /// Create a spinner that draws on `writer`.
    pub fn with_writer(config: Config, writer: impl Write + Send + 'static) -> Self {
        let config = config.resolved();
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            frame_rate: config.frame_rate,
            frames: config.frames.into(),
            state: RwLock::new(State::Idle),
        }
    }

    /// True between a `start` and the matching `stop` returning.
    pub fn is_running(&self) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        matches!(*state, State::Running(_))
    }

    /// Begin animating from the first glyph. Returns immediately.
    ///
    /// Does nothing if the spinner is already running.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have started us between the two locks.
        if matches!(*state, State::Running(_)) {
            return;
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(false);

        let sink = Arc::clone(&self.sink);
        let frames = Arc::clone(&self.frames);
        let frame_rate = self.frame_rate;

        let spawned = thread::Builder::new()
            .name("whirl-spinner".to_string())
            .spawn(move || {
                // If the runtime can't be built, dropping `done_tx` still
                // releases whoever waits in `stop`.
                let Ok(runtime) = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                else {
                    return;
                };
                runtime.block_on(animate(&sink, &frames, frame_rate, cancel_rx));
                let _ = done_tx.send(true);
            });

        if spawned.is_ok() {
            *state = State::Running(Run {
                cancel: cancel_tx,
                done: done_rx,
            });
        }
    }

    /// Stop animating and block until the last glyph has been erased.
    ///
    /// Does nothing if the spinner isn't running.
    pub fn stop(&self) {
        let mut done = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            let State::Running(run) = &*state else {
                return;
            };
            run.cancel.send_replace(true);
            run.done.clone()
        };

        // Waiting happens outside the lock. A closed channel means the loop
        // thread is already gone, which is just as final.
        let _ = futures::executor::block_on(done.wait_for(|finished| *finished));

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent stop/start pair may already have replaced our run.
        if matches!(&*state, State::Running(run) if run.done.same_channel(&done)) {
            *state = State::Idle;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Spinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spinner")
            .field("frame_rate", &self.frame_rate)
            .field("frames", &self.frames)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Cycle through `frames` until `cancel` flips, erasing each glyph before
/// moving on. The glyph on screen is always erased before returning.
async fn animate(
    sink: &Sink,
    frames: &[char],
    frame_rate: Duration,
    mut cancel: watch::Receiver<bool>,
) {
    let mut ticker = time::interval_at(Instant::now() + frame_rate, frame_rate);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    for frame in frames.iter().cycle() {
        draw(sink, frame.encode_utf8(&mut [0; 4]).as_bytes());

        let cancelled = tokio::select! {
            biased;
            // A dropped sender counts as cancellation too.
            _ = cancel.changed() => true,
            _ = ticker.tick() => false,
        };

        draw(sink, &[BACKSPACE]);
        if cancelled {
            return;
        }
    }
}

/// Write to the sink, ignoring failures. The display is cosmetic.
fn draw(sink: &Sink, bytes: &[u8]) {
    let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
    let _ = sink.write_all(bytes);
    let _ = sink.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory sink that stays readable after being handed to a spinner.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn spinner(buf: &Buffer, frame_rate: Duration) -> Spinner {
        let config = Config {
            frame_rate,
            ..Config::default()
        };
        Spinner::with_writer(config, buf.clone())
    }

    #[test]
    fn new_spinner_is_idle() {
        let spinner = Spinner::new(Config::default());
        assert!(!spinner.is_running());
    }

    #[test]
    fn start_marks_running_and_stop_clears_it() {
        let buf = Buffer::default();
        let spinner = spinner(&buf, Duration::from_millis(20));

        spinner.start();
        assert!(spinner.is_running());

        spinner.stop();
        assert!(!spinner.is_running());
    }

    #[test]
    fn immediate_stop_erases_first_glyph() {
        let buf = Buffer::default();
        let spinner = spinner(&buf, Duration::from_millis(20));

        spinner.start();
        spinner.stop();

        assert_eq!(buf.contents(), "-\x08");
    }

    #[test]
    fn stop_without_start_writes_nothing() {
        let buf = Buffer::default();
        let spinner = spinner(&buf, Duration::from_millis(5));

        spinner.stop();
        spinner.stop();

        assert!(buf.contents().is_empty());
    }

    #[test]
    fn multibyte_glyph_is_erased_with_one_backspace() {
        let buf = Buffer::default();
        let config = Config {
            frame_rate: Duration::from_millis(20),
            frames: vec!['⠋'],
        };
        let spinner = Spinner::with_writer(config, buf.clone());

        spinner.start();
        spinner.stop();

        assert_eq!(buf.contents(), "⠋\x08");
    }

    #[test]
    fn debug_shows_running_state() {
        let spinner = Spinner::with_writer(Config::default(), io::sink());
        let debug = format!("{spinner:?}");
        assert!(debug.contains("running: false"));
        assert!(debug.contains("250ms"));
    }
}
