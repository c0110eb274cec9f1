//! End-to-end tests: real player, simulated engine, SQLite settings

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tilawa_cli::{App, CliConfig};
use tilawa_core::{EnglishTitles, PageNumber, Reciter, RepeatMode, StaticVerseIndex, VerseRef};
use tilawa_playback::{PlayOutcome, SessionState};

// ===== Test Helpers =====

fn test_config(dir: &TempDir) -> CliConfig {
    let mut config = CliConfig::default();
    config.storage.database_url = format!("sqlite://{}", dir.path().join("tilawa.db").display());
    config.resolver.url_template = "https://cdn.example/{reciter}/{sura}{ayah}.mp3".to_string();
    config.engine.simulated_track_ms = 200;
    config
}

async fn open(config: &CliConfig, index: StaticVerseIndex) -> App {
    App::open(config, index, Arc::new(EnglishTitles))
        .await
        .expect("Failed to open app")
}

fn verses(keys: &[&str]) -> Vec<VerseRef> {
    keys.iter().map(|k| k.parse().unwrap()).collect()
}

/// Follow playback to the end, collecting the verse of every position visited
async fn recited(app: &App) -> Vec<String> {
    let mut seen: Vec<(usize, String)> = Vec::new();
    tokio::time::timeout(
        Duration::from_secs(10),
        app.wait_until_idle(|session| {
            let entry = (session.current_index, session.current_verse.key());
            if seen.last() != Some(&entry) {
                seen.push(entry);
            }
        }),
    )
    .await
    .expect("Playback did not finish")
    .expect("Playback failed");

    seen.into_iter().map(|(_, key)| key).collect()
}

// ===== Playback =====

#[tokio::test]
async fn test_plays_selection_to_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let app = open(&test_config(&dir), StaticVerseIndex::new()).await;

    let outcome = app
        .player
        .play_verses(verses(&["112:1", "112:2", "112:3"]), None)
        .await
        .unwrap();
    assert!(matches!(outcome, PlayOutcome::Started { tracks: 3, .. }));

    let queue = app.player.queue().await.unwrap();
    assert_eq!(
        queue[0].audio_url,
        "https://cdn.example/Alafasy_128kbps/112001.mp3"
    );
    assert_eq!(queue[0].title, "Al-Ikhlas 112:1");

    assert_eq!(recited(&app).await, vec!["112:1", "112:2", "112:3"]);

    let session = app.player.session().await.unwrap();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(app.engine.queue_is_empty());

    app.shutdown().await;
}

#[tokio::test]
async fn test_repeat_one_recites_each_verse_twice() {
    let dir = tempfile::tempdir().unwrap();
    let app = open(&test_config(&dir), StaticVerseIndex::new()).await;
    app.player.set_repeat_mode(RepeatMode::One).await.unwrap();
    app.player.set_repeat_count(2).await.unwrap();

    app.player
        .play_verses(verses(&["103:1", "103:2"]), None)
        .await
        .unwrap();

    assert_eq!(
        recited(&app).await,
        vec!["103:1", "103:1", "103:2", "103:2"]
    );
    app.shutdown().await;
}

#[tokio::test]
async fn test_play_page_from_index() {
    let dir = tempfile::tempdir().unwrap();
    let index = StaticVerseIndex::from_json(r#"{"604": ["114:1", "114:2"]}"#).unwrap();
    let app = open(&test_config(&dir), index).await;

    let outcome = app
        .player
        .play_page(PageNumber::new(604).unwrap(), None)
        .await
        .unwrap();

    assert!(matches!(outcome, PlayOutcome::Started { tracks: 2, .. }));
    assert_eq!(recited(&app).await, vec!["114:1", "114:2"]);
    app.shutdown().await;
}

#[tokio::test]
async fn test_unknown_page_is_nothing_to_play() {
    let dir = tempfile::tempdir().unwrap();
    let app = open(&test_config(&dir), StaticVerseIndex::new()).await;

    let outcome = app
        .player
        .play_page(PageNumber::new(2).unwrap(), None)
        .await
        .unwrap();

    assert_eq!(outcome, PlayOutcome::NothingToPlay);
    app.shutdown().await;
}

// ===== Settings =====

#[tokio::test]
async fn test_settings_persist_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);

    let first = open(&config, StaticVerseIndex::new()).await;
    first
        .player
        .set_selected_reciter(Reciter::new("Husary_64kbps", "Mahmoud Khalil Al-Husary"))
        .await
        .unwrap();
    first.player.set_repeat_mode(RepeatMode::All).await.unwrap();
    first.player.set_repeat_count(3).await.unwrap();
    first.player.set_playback_speed(1.5).await.unwrap();
    first.shutdown().await;

    let second = open(&config, StaticVerseIndex::new()).await;
    let session = second.player.session().await.unwrap();

    assert_eq!(session.reciter.id, "Husary_64kbps");
    assert_eq!(session.reciter_name(), "Mahmoud Khalil Al-Husary");
    assert_eq!(session.repeat.mode, RepeatMode::All);
    assert_eq!(session.repeat.count(), 3);
    assert_eq!(session.speed, 1.5);

    let stored = second.store.entries().await.unwrap();
    assert_eq!(stored.len(), 5);
    second.shutdown().await;
}

#[tokio::test]
async fn test_default_reciter_comes_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.playback.default_reciter_id = "Minshawy_Murattal_128kbps".to_string();
    config.playback.default_reciter_name = "Mohamed Siddiq al-Minshawi".to_string();

    let app = open(&config, StaticVerseIndex::new()).await;

    assert_eq!(app.player.snapshot().reciter.id, "Minshawy_Murattal_128kbps");
    app.shutdown().await;
}
