use std::time::Duration;

use clap::Parser;

use whirl::config::Config;
use whirl::consts::DEFAULT_FRAMES;
use whirl::spinner::Spinner;

#[derive(Parser)]
#[command(name = "whirl", version, about = "Spin for a while, then clean up.")]
struct Cli {
    /// Milliseconds each frame stays on screen
    #[arg(short, long, default_value_t = 250)]
    frame_rate: u64,

    /// Seconds to spin before stopping (Ctrl+C stops early)
    #[arg(short, long, default_value_t = 5)]
    duration: u64,

    /// Glyphs to cycle through, e.g. ".oO"
    #[arg(long)]
    frames: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    anyhow::ensure!(cli.frame_rate > 0, "--frame-rate must be positive");

    let frames = match cli.frames {
        Some(glyphs) => {
            anyhow::ensure!(!glyphs.is_empty(), "--frames must not be empty");
            glyphs.chars().collect()
        }
        None => DEFAULT_FRAMES.to_vec(),
    };

    let spinner = Spinner::new(Config {
        frame_rate: Duration::from_millis(cli.frame_rate),
        frames,
    });

    println!("starting spinner");
    spinner.start();

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(cli.duration)) => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    // stop blocks until the last glyph is erased
    tokio::task::spawn_blocking(move || spinner.stop()).await?;

    println!("spinner stopped");
    Ok(())
}
