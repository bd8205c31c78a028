use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clipwatch_clipboard::{ClipboardSource, DefaultClipboard};
use clipwatch_core::ObserverSettings;
use clipwatch_observer::{ClipboardObserver, ObserverConfig};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the system clipboard and log every change
    Watch(WatchArgs),
    /// Read the clipboard once and print what is on it
    Once,
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// Settings file (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Polling interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,
    /// Watch text (the default)
    #[arg(long, overrides_with = "no_text")]
    text: bool,
    /// Do not watch text
    #[arg(long, overrides_with = "text")]
    no_text: bool,
    /// Also watch images
    #[arg(long, overrides_with = "no_image")]
    image: bool,
    /// Do not watch images
    #[arg(long, overrides_with = "image")]
    no_image: bool,
}

impl WatchArgs {
    fn settings(&self) -> Result<ObserverSettings> {
        let mut settings = match &self.config {
            Some(path) => ObserverSettings::load(path)?,
            None => ObserverSettings::default(),
        };
        if let Some(ms) = self.interval {
            settings.interval_ms = ms;
        }
        if self.text {
            settings.watch_text = true;
        }
        if self.no_text {
            settings.watch_text = false;
        }
        if self.image {
            settings.watch_image = true;
        }
        if self.no_image {
            settings.watch_image = false;
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch(args) => run_watch(args.settings()?).await,
        Commands::Once => run_once(),
    }
}

async fn run_watch(settings: ObserverSettings) -> Result<()> {
    let interval = settings.interval()?;
    let mut config = ObserverConfig::from_settings(&settings);
    if settings.watch_text {
        config = config.on_text_change(|new, previous| {
            info!(
                "Text changed: {:?} (was {:?})",
                preview(new),
                previous.map(preview)
            );
        });
    }
    if settings.watch_image {
        config = config.on_image_change(|new, previous| {
            info!(
                "Image changed: {}x{} (was {})",
                new.width(),
                new.height(),
                previous
                    .filter(|image| !image.is_empty())
                    .map(|image| format!("{}x{}", image.width(), image.height()))
                    .unwrap_or_else(|| "empty".to_string())
            );
        });
    }

    if !config.has_callbacks() {
        error!("Nothing to watch: enable text or image");
        return Ok(());
    }

    let observer = ClipboardObserver::new(DefaultClipboard::new(), config)?;
    info!("Watching clipboard every {:?}. Press Ctrl-C to stop.", interval);

    tokio::signal::ctrl_c().await?;
    observer.stop();
    info!("Stopped");
    Ok(())
}

fn run_once() -> Result<()> {
    let clipboard = DefaultClipboard::new();

    match clipboard.read_text() {
        Ok(text) if text.is_empty() => println!("text: <none>"),
        Ok(text) => println!("text: {:?}", preview(&text)),
        Err(e) => error!("Failed to read text: {}", e),
    }

    match clipboard.read_image() {
        Ok(image) if image.is_empty() => println!("image: <none>"),
        Ok(image) => println!(
            "image: {}x{} ({} byte data URL)",
            image.width(),
            image.height(),
            image.comparable_form().map(str::len).unwrap_or(0)
        ),
        Err(e) => error!("Failed to read image: {}", e),
    }
    Ok(())
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    if text.chars().count() > MAX_CHARS {
        format!("{}...", text.chars().take(MAX_CHARS).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch_settings(args: &[&str]) -> ObserverSettings {
        let cli = Cli::try_parse_from(["clipwatch", "watch"].into_iter().chain(args.iter().copied())).unwrap();
        match cli.command {
            Commands::Watch(args) => args.settings().unwrap(),
            Commands::Once => panic!("expected watch"),
        }
    }

    #[test]
    fn watch_defaults_to_text_only() {
        assert_eq!(watch_settings(&[]), ObserverSettings::default());
    }

    #[test]
    fn text_flags_toggle_text_and_last_one_wins() {
        assert!(!watch_settings(&["--no-text"]).watch_text);
        assert!(watch_settings(&["--text"]).watch_text);
        assert!(watch_settings(&["--no-text", "--text"]).watch_text);
        assert!(!watch_settings(&["--text", "--no-text"]).watch_text);
    }

    #[test]
    fn image_and_interval_flags() {
        let settings = watch_settings(&["--image", "--interval", "250"]);
        assert!(settings.watch_image);
        assert_eq!(settings.interval_ms, 250);
        assert!(!watch_settings(&["--image", "--no-image"]).watch_image);
    }

    #[test]
    fn flags_override_settings_file() {
        let path = std::env::temp_dir().join(format!("clipwatch-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "interval_ms": 900, "watch_text": false }"#).unwrap();

        let settings = watch_settings(&["--config", path.to_str().unwrap(), "--text"]);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.interval_ms, 900);
        assert!(settings.watch_text);
    }
}
