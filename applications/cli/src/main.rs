/// Tilawa - verse-by-verse Quran recitation player
use clap::{Parser, Subcommand, ValueEnum};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tilawa_cli::{App, CliConfig, CliError};
use tilawa_core::{
    ArabicNumeralTitles, EnglishTitles, PageNumber, Reciter, RepeatMode, StaticVerseIndex,
    TitleFormatter, VerseRef,
};
use tilawa_playback::PlayOutcome;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tilawa")]
#[command(about = "Verse-by-verse Quran recitation player", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./tilawa.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Render verse numbers in titles with Eastern Arabic digits
    #[arg(long, global = true)]
    arabic_numerals: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recite verses in order, e.g. `tilawa play 1:1 1:2 1:3`
    Play {
        /// Verse keys ("sura:ayah")
        #[arg(required = true)]
        verses: Vec<VerseRef>,
    },
    /// Recite every verse on a mushaf page
    PlayPage {
        /// Page number (1-604)
        page: u16,
        /// JSON page map: {"1": ["1:1", "1:2", ...], ...}
        #[arg(long)]
        pages: PathBuf,
    },
    /// Show or change playback preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the effective preferences and the stored values
    Show,
    /// Select the reciter
    SetReciter {
        /// Reciter id as used in audio URLs
        id: String,
        /// Display name
        name: String,
    },
    /// Select the repeat mode
    SetRepeat {
        #[arg(value_enum)]
        mode: RepeatArg,
        /// Times each verse (or the whole selection) is heard, 1-10
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
    },
    /// Select the playback rate (0.5-2.0)
    SetSpeed { speed: f32 },
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    Off,
    One,
    All,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::One => RepeatMode::One,
            RepeatArg::All => RepeatMode::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tilawa=info,tilawa_cli=info,tilawa_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let titles: Arc<dyn TitleFormatter> = if cli.arabic_numerals {
        Arc::new(ArabicNumeralTitles)
    } else {
        Arc::new(EnglishTitles)
    };

    match cli.command {
        Commands::Play { verses } => {
            play(&config, titles, verses).await?;
        }
        Commands::PlayPage { page, pages } => {
            play_page(&config, titles, page, &pages).await?;
        }
        Commands::Settings { command } => {
            settings(&config, titles, command).await?;
        }
    }

    Ok(())
}

async fn play(
    config: &CliConfig,
    titles: Arc<dyn TitleFormatter>,
    verses: Vec<VerseRef>,
) -> anyhow::Result<()> {
    let app = App::open(config, StaticVerseIndex::new(), titles).await?;
    let outcome = app.player.play_verses(verses, None).await?;
    follow(&app, outcome).await?;
    app.shutdown().await;
    Ok(())
}

async fn play_page(
    config: &CliConfig,
    titles: Arc<dyn TitleFormatter>,
    page: u16,
    pages: &Path,
) -> anyhow::Result<()> {
    let page = PageNumber::new(page)?;
    let json = tokio::fs::read_to_string(pages).await?;
    let index = StaticVerseIndex::from_json(&json)?;
    if index.is_empty() {
        return Err(CliError::InvalidInput(format!("{} has no pages", pages.display())).into());
    }

    let app = App::open(config, index, titles).await?;
    let outcome = app.player.play_page(page, None).await?;
    follow(&app, outcome).await?;
    app.shutdown().await;
    Ok(())
}

/// Print progress until the recitation finishes
async fn follow(app: &App, outcome: PlayOutcome) -> anyhow::Result<()> {
    match outcome {
        PlayOutcome::Started {
            verse,
            tracks,
            queue_len,
        } => {
            println!("Reciting {tracks} verse(s) from {verse} ({queue_len} queue entries)");
        }
        PlayOutcome::NothingToPlay => {
            println!("No recitation audio found for the selection");
            return Ok(());
        }
        PlayOutcome::Superseded => {
            println!("Replaced by a newer request");
            return Ok(());
        }
    }

    let queue = app.player.queue().await?;
    let mut last = None;
    app.wait_until_idle(|session| {
        if last != Some(session.current_index) {
            last = Some(session.current_index);
            if let Some(track) = queue.get(session.current_index) {
                println!("  {} ({})", track.title, track.artist);
            }
        }
    })
    .await?;

    println!("Done");
    Ok(())
}

async fn settings(
    config: &CliConfig,
    titles: Arc<dyn TitleFormatter>,
    command: SettingsCommand,
) -> anyhow::Result<()> {
    let app = App::open(config, StaticVerseIndex::new(), titles).await?;

    match command {
        SettingsCommand::Show => {
            let session = app.player.session().await?;
            println!("Reciter: {} ({})", session.reciter_name(), session.reciter.id);
            println!(
                "Repeat:  {:?} x{}",
                session.repeat.mode,
                session.repeat.count()
            );
            println!("Speed:   {}x", session.speed);

            let stored = app.store.entries().await?;
            if !stored.is_empty() {
                println!();
                println!("Stored values:");
                for setting in stored {
                    println!("  {} = {}", setting.key, setting.value);
                }
            }
        }
        SettingsCommand::SetReciter { id, name } => {
            app.player
                .set_selected_reciter(Reciter::new(id, name))
                .await?;
            let session = app.player.session().await?;
            println!("Reciter: {} ({})", session.reciter_name(), session.reciter.id);
        }
        SettingsCommand::SetRepeat { mode, count } => {
            let mut repeat = app.player.set_repeat_mode(mode.into()).await?;
            if let Some(count) = count {
                repeat = app.player.set_repeat_count(count).await?;
            }
            println!("Repeat: {:?} x{}", repeat.mode, repeat.count());
        }
        SettingsCommand::SetSpeed { speed } => {
            let applied = app.player.set_playback_speed(speed).await?;
            println!("Speed: {applied}x");
        }
    }

    app.shutdown().await;
    Ok(())
}
