//! Player wiring for the command line
//!
//! Opens the settings database, starts a [`RecitationPlayer`] over the
//! simulated engine and the URL template resolver, and routes the engine's
//! events back into the player.

use crate::config::CliConfig;
use crate::engine::SimulatedEngine;
use crate::error::Result;
use crate::resolver::UrlTemplateResolver;
use std::sync::Arc;
use std::time::Duration;
use tilawa_core::{StaticVerseIndex, TitleFormatter};
use tilawa_playback::{Collaborators, PlaybackSession, RecitationPlayer};
use tilawa_storage::SqliteStore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct App {
    pub player: RecitationPlayer,
    pub engine: SimulatedEngine,
    pub store: SqliteStore,
    task: JoinHandle<()>,
}

impl App {
    pub async fn open(
        config: &CliConfig,
        verse_index: StaticVerseIndex,
        titles: Arc<dyn TitleFormatter>,
    ) -> Result<Self> {
        let store = SqliteStore::connect(&config.storage.database_url).await?;
        let engine = SimulatedEngine::new(Duration::from_millis(config.engine.simulated_track_ms));

        let (player, task) = RecitationPlayer::start(
            config.playback_config(),
            Collaborators {
                engine: Arc::new(engine.clone()),
                resolver: Arc::new(UrlTemplateResolver::new(config.resolver.url_template.clone())),
                verse_index: Arc::new(verse_index),
                titles,
                store: Arc::new(store.clone()),
            },
        )
        .await;
        engine.attach(player.event_sink());

        debug!(database_url = %config.storage.database_url, "Player ready");
        Ok(Self {
            player,
            engine,
            store,
            task,
        })
    }

    /// Follow playback until the player is hidden again
    ///
    /// `on_change` sees every published session while something is loaded.
    /// Ctrl-C stops playback.
    pub async fn wait_until_idle(&self, mut on_change: impl FnMut(&PlaybackSession)) -> Result<()> {
        let mut updates = self.player.subscribe();

        loop {
            let session = updates.borrow_and_update().clone();
            if !session.is_visible {
                return Ok(());
            }
            on_change(&session);

            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    info!("Interrupted, stopping recitation");
                    self.player.stop().await?;
                    return Ok(());
                }
            }
        }
    }

    /// Stop the player task and wait for it to finish
    pub async fn shutdown(self) {
        self.engine.detach();
        drop(self.player);
        if let Err(e) = self.task.await {
            debug!(error = %e, "Player task ended abnormally");
        }
    }
}
