use std::{fs, process};

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use crazy_text::{
    config::PlayerConfig,
    engine::RevealEngine,
    player::{Player, record_frames, script::Script},
};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const SAY_USAGE: &str = "crazy-text say <text>";
const PLAY_USAGE: &str = "crazy-text play <script.json>";
const DUMP_USAGE: &str = "crazy-text dump <text>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = PlayerConfig::load();

    match args.next().as_deref() {
        Some("say") => {
            let text = args.next().context(SAY_USAGE)?;
            Player::new(Script::single(&text), config).play()
        }
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(&path, config)
        }
        Some("dump") => {
            let text = args.next().context(DUMP_USAGE)?;
            dump(&text, &config)
        }
        _ => bail!(
            "crazy-text: animated text reveals for the terminal\n\nUsage:\n  {SAY_USAGE}\n  {PLAY_USAGE}\n  {DUMP_USAGE}"
        ),
    }
}

fn play(path: &str, config: PlayerConfig) -> Result<()> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let script: Script =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))?;

    let mut player = Player::new(script, config);
    player.play()
}

fn dump(text: &str, config: &PlayerConfig) -> Result<()> {
    let mut engine = RevealEngine::new();
    let frames = record_frames(&mut engine, text, config.chars_per_second, config.max_frames);
    for frame in &frames {
        println!("{frame}");
    }
    eprintln!("Recorded {} frames", frames.len());
    Ok(())
}
