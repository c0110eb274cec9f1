//! Recitation player - core orchestration
//!
//! One task owns the [`PlaybackSession`], the audio engine, and the settings
//! store. User actions (through [`RecitationPlayer`]) and engine events
//! (through [`EngineEventSink`]) are messages on a single channel, handled one
//! at a time in arrival order, so an optimistic local update can never race an
//! engine report.
//!
//! ```text
//! RecitationPlayer ──┐
//!                    ├──> mpsc ──> PlayerActor ──> AudioEngine
//! EngineEventSink ───┘                 │
//!                                      └──> watch<PlaybackSession> ──> UI
//! ```
//!
//! Track building awaits the resolver once per verse, so it runs in its own
//! task and reports back with a `BuildFinished` message. A newer play request
//! (or a stop) cancels the build in flight; its caller gets
//! [`PlayOutcome::Superseded`] and its tracks never reach the engine.

use crate::builder::TrackBuilder;
use crate::error::{PlaybackError, Result};
use crate::navigator;
use crate::repeat;
use crate::session::PlaybackSession;
use crate::settings::SettingsStore;
use crate::types::{clamp_speed, PlayOutcome, PlaybackConfig, Selection};
use std::sync::Arc;
use std::time::Duration;
use tilawa_core::{
    AudioEngine, EngineEvent, KeyValueStore, LogicalTrack, PageNumber, RecitationResolver,
    Reciter, RepeatConfig, RepeatMode, TilawaError, TitleFormatter, VerseIndex, VerseRef,
};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// External collaborators the player drives
pub struct Collaborators {
    /// Platform audio engine
    pub engine: Arc<dyn AudioEngine>,

    /// Remote verse audio lookup
    pub resolver: Arc<dyn RecitationResolver>,

    /// Page-to-verse table
    pub verse_index: Arc<dyn VerseIndex>,

    /// Track title formatting
    pub titles: Arc<dyn TitleFormatter>,

    /// Durable storage for preferences
    pub store: Arc<dyn KeyValueStore>,
}

type Reply<T> = oneshot::Sender<Result<T>>;

enum Message {
    Play {
        selection: Selection,
        reciter: Option<Reciter>,
        reply: Reply<PlayOutcome>,
    },
    BuildFinished {
        generation: u64,
        tracks: Result<Vec<LogicalTrack>>,
    },
    TogglePlayPause(Reply<bool>),
    SkipToNext(Reply<Option<usize>>),
    SkipToPrevious(Reply<Option<usize>>),
    Stop(Reply<()>),
    SetReciter(Reciter, Reply<()>),
    SetRepeatMode(RepeatMode, Reply<RepeatConfig>),
    SetRepeatCount(i64, Reply<RepeatConfig>),
    SetSpeed(f32, Reply<f32>),
    Engine(EngineEvent),
    Session(Reply<PlaybackSession>),
    Queue(Reply<Vec<LogicalTrack>>),
}

/// Handle to a running recitation player
///
/// Cheap to clone; every clone talks to the same player task. The task stops
/// once every handle and event sink has been dropped.
#[derive(Clone)]
pub struct RecitationPlayer {
    tx: mpsc::Sender<Message>,
    snapshot: watch::Receiver<PlaybackSession>,
}

impl RecitationPlayer {
    /// Load persisted settings and start the player task
    pub async fn start(
        config: PlaybackConfig,
        collaborators: Collaborators,
    ) -> (Self, JoinHandle<()>) {
        let Collaborators {
            engine,
            resolver,
            verse_index,
            titles,
            store,
        } = collaborators;

        let settings = SettingsStore::new(store);
        let mut session = PlaybackSession::new(&config);
        let persisted = settings.load(session.settings()).await;
        session.apply_settings(persisted);

        let (tx, rx) = mpsc::channel(config.command_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(session.clone());

        let actor = PlayerActor {
            session,
            engine,
            builder: Arc::new(TrackBuilder::new(resolver, verse_index, titles)),
            settings,
            rx,
            tx: tx.downgrade(),
            snapshot: snapshot_tx,
            generation: 0,
            pending: None,
        };

        info!("Recitation player started");
        let task = tokio::spawn(actor.run());

        (
            Self {
                tx,
                snapshot: snapshot_rx,
            },
            task,
        )
    }

    /// Play every verse on a mushaf page
    pub async fn play_page(&self, page: PageNumber, reciter: Option<Reciter>) -> Result<PlayOutcome> {
        self.play(Selection::Page(page), reciter).await
    }

    /// Play an ordered list of verses
    pub async fn play_verses(&self, verses: Vec<VerseRef>, reciter: Option<Reciter>) -> Result<PlayOutcome> {
        self.play(Selection::Verses(verses), reciter).await
    }

    /// Play a single verse
    pub async fn play_single(&self, verse: VerseRef, reciter: Option<Reciter>) -> Result<PlayOutcome> {
        self.play(Selection::Single(verse), reciter).await
    }

    /// Build, expand, and load a selection, replacing whatever was playing
    ///
    /// `reciter` overrides the selected reciter for this request only.
    pub async fn play(&self, selection: Selection, reciter: Option<Reciter>) -> Result<PlayOutcome> {
        self.request(|reply| Message::Play {
            selection,
            reciter,
            reply,
        })
        .await
    }

    /// Flip between playing and paused; returns the new playing flag
    ///
    /// Does nothing while idle.
    pub async fn toggle_play_pause(&self) -> Result<bool> {
        self.request(Message::TogglePlayPause).await
    }

    /// Jump to the next verse group; `None` when already on the last verse
    pub async fn skip_to_next(&self) -> Result<Option<usize>> {
        self.request(Message::SkipToNext).await
    }

    /// Jump to the previous verse group
    ///
    /// On the first verse this restarts the current group from the top.
    pub async fn skip_to_previous(&self) -> Result<Option<usize>> {
        self.request(Message::SkipToPrevious).await
    }

    /// Empty the engine queue and hide the player
    pub async fn stop(&self) -> Result<()> {
        self.request(Message::Stop).await
    }

    /// Select and persist the reciter for future play requests
    pub async fn set_selected_reciter(&self, reciter: Reciter) -> Result<()> {
        self.request(|reply| Message::SetReciter(reciter, reply)).await
    }

    /// Select and persist the repeat mode
    pub async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<RepeatConfig> {
        self.request(|reply| Message::SetRepeatMode(mode, reply)).await
    }

    /// Select and persist the repeat count (clamped to `1..=10`)
    pub async fn set_repeat_count(&self, count: i64) -> Result<RepeatConfig> {
        self.request(|reply| Message::SetRepeatCount(count, reply)).await
    }

    /// Select, persist, and apply the playback rate (clamped to `[0.5, 2.0]`)
    pub async fn set_playback_speed(&self, speed: f32) -> Result<f32> {
        self.request(|reply| Message::SetSpeed(speed, reply)).await
    }

    /// Session state after every message sent so far has been handled
    pub async fn session(&self) -> Result<PlaybackSession> {
        self.request(Message::Session).await
    }

    /// The engine's live physical queue
    pub async fn queue(&self) -> Result<Vec<LogicalTrack>> {
        self.request(Message::Queue).await
    }

    /// Latest published session state, without waiting on the player
    pub fn snapshot(&self) -> PlaybackSession {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to session changes (for rendering a mini-player)
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSession> {
        self.snapshot.clone()
    }

    /// Entry point for the audio engine's events
    pub fn event_sink(&self) -> EngineEventSink {
        EngineEventSink {
            tx: self.tx.clone(),
        }
    }

    async fn request<T>(&self, message: impl FnOnce(Reply<T>) -> Message) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(message(reply))
            .await
            .map_err(|_| PlaybackError::PlayerClosed)?;
        response.await.map_err(|_| PlaybackError::PlayerClosed)?
    }
}

/// Forwards audio engine events into the player, in emission order
#[derive(Clone)]
pub struct EngineEventSink {
    tx: mpsc::Sender<Message>,
}

impl EngineEventSink {
    /// Deliver an event, waiting for queue space
    pub async fn send(&self, event: EngineEvent) -> Result<()> {
        self.tx
            .send(Message::Engine(event))
            .await
            .map_err(|_| PlaybackError::PlayerClosed)
    }

    /// Deliver an event from a synchronous callback
    pub fn try_send(&self, event: EngineEvent) -> Result<()> {
        self.tx
            .try_send(Message::Engine(event))
            .map_err(|e| match e {
                TrySendError::Full(_) => PlaybackError::Busy,
                TrySendError::Closed(_) => PlaybackError::PlayerClosed,
            })
    }
}

struct PendingPlay {
    generation: u64,
    reply: Reply<PlayOutcome>,
    task: JoinHandle<()>,
}

struct PlayerActor {
    session: PlaybackSession,
    engine: Arc<dyn AudioEngine>,
    builder: Arc<TrackBuilder>,
    settings: SettingsStore,
    rx: mpsc::Receiver<Message>,
    tx: mpsc::WeakSender<Message>,
    snapshot: watch::Sender<PlaybackSession>,
    generation: u64,
    pending: Option<PendingPlay>,
}

fn engine_error(op: &'static str) -> impl FnOnce(TilawaError) -> PlaybackError {
    move |e| {
        warn!(op, error = %e, "Audio engine command failed");
        PlaybackError::Core(e)
    }
}

impl PlayerActor {
    async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            self.handle(message).await;
        }

        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
        debug!("Recitation player stopped");
    }

    async fn handle(&mut self, message: Message) {
        // A dropped reply receiver only means the caller stopped waiting.
        match message {
            Message::Play {
                selection,
                reciter,
                reply,
            } => self.begin_play(selection, reciter, reply),
            Message::BuildFinished { generation, tracks } => {
                self.finish_play(generation, tracks).await;
            }
            Message::TogglePlayPause(reply) => {
                let _ = reply.send(self.toggle_play_pause().await);
            }
            Message::SkipToNext(reply) => {
                let _ = reply.send(self.skip_to_next().await);
            }
            Message::SkipToPrevious(reply) => {
                let _ = reply.send(self.skip_to_previous().await);
            }
            Message::Stop(reply) => {
                self.cancel_pending();
                let _ = reply.send(self.stop().await);
            }
            Message::SetReciter(reciter, reply) => {
                self.set_reciter(reciter).await;
                let _ = reply.send(Ok(()));
            }
            Message::SetRepeatMode(mode, reply) => {
                let repeat = self.session.repeat.with_mode(mode);
                let _ = reply.send(Ok(self.set_repeat(repeat).await));
            }
            Message::SetRepeatCount(count, reply) => {
                let repeat = self.session.repeat.with_count(count);
                let _ = reply.send(Ok(self.set_repeat(repeat).await));
            }
            Message::SetSpeed(speed, reply) => {
                let _ = reply.send(Ok(self.set_speed(speed).await));
            }
            Message::Engine(event) => self.on_engine_event(event).await,
            Message::Session(reply) => {
                let _ = reply.send(Ok(self.session.clone()));
            }
            Message::Queue(reply) => {
                let queue = self.engine.queue().await.map_err(engine_error("queue"));
                let _ = reply.send(queue);
            }
        }
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.session.clone());
    }

    fn begin_play(&mut self, selection: Selection, reciter: Option<Reciter>, reply: Reply<PlayOutcome>) {
        self.cancel_pending();

        let Some(tx) = self.tx.upgrade() else {
            let _ = reply.send(Err(PlaybackError::PlayerClosed));
            return;
        };

        self.generation += 1;
        let generation = self.generation;
        let reciter = reciter.unwrap_or_else(|| self.session.reciter.clone());
        let builder = Arc::clone(&self.builder);

        debug!(generation, ?selection, reciter = %reciter.id, "Building recitation queue");

        let task = tokio::spawn(async move {
            let tracks = builder.build(&selection, &reciter).await;
            let _ = tx.send(Message::BuildFinished { generation, tracks }).await;
        });

        self.pending = Some(PendingPlay {
            generation,
            reply,
            task,
        });
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
            debug!(generation = pending.generation, "Cancelled superseded recitation build");
            let _ = pending.reply.send(Ok(PlayOutcome::Superseded));
        }
    }

    async fn finish_play(&mut self, generation: u64, tracks: Result<Vec<LogicalTrack>>) {
        let pending = match self.pending.take() {
            Some(pending) if pending.generation == generation => pending,
            other => {
                self.pending = other;
                debug!(generation, "Discarding stale recitation build");
                return;
            }
        };

        let outcome = match tracks {
            Ok(tracks) => self.load(tracks).await,
            Err(e) => {
                warn!(error = %e, "Failed to build recitation queue");
                Err(e)
            }
        };
        let _ = pending.reply.send(outcome);
    }

    async fn load(&mut self, tracks: Vec<LogicalTrack>) -> Result<PlayOutcome> {
        let Some(first) = tracks.first() else {
            info!("No recitation audio resolved, nothing to play");
            return Ok(PlayOutcome::NothingToPlay);
        };
        let verse = first.verse()?;
        let logical = tracks.len();

        let queue = repeat::expand(tracks, self.session.repeat);
        let queue_len = queue.len();

        self.engine.reset().await.map_err(engine_error("reset"))?;
        self.engine.add(queue).await.map_err(engine_error("add"))?;
        self.engine
            .set_rate(self.session.speed)
            .await
            .map_err(engine_error("set_rate"))?;
        self.engine.play().await.map_err(engine_error("play"))?;

        self.session.on_loaded(verse);
        self.publish();

        info!(
            verse = %verse,
            tracks = logical,
            queue_len,
            repeat_mode = ?self.session.repeat.mode,
            repeat_count = self.session.repeat.count(),
            "Recitation started"
        );
        Ok(PlayOutcome::Started {
            verse,
            tracks: logical,
            queue_len,
        })
    }

    async fn toggle_play_pause(&mut self) -> Result<bool> {
        if !self.session.is_visible {
            debug!("Nothing loaded, ignoring play/pause");
            return Ok(false);
        }

        // Flip first; a rejected command restores the previous flag, and a
        // later StateChanged event still overrides either.
        let playing = !self.session.is_playing;
        self.session.is_playing = playing;
        self.publish();

        let result = if playing {
            self.engine.play().await.map_err(engine_error("play"))
        } else {
            self.engine.pause().await.map_err(engine_error("pause"))
        };

        if let Err(e) = result {
            self.session.is_playing = !playing;
            self.publish();
            return Err(e);
        }
        Ok(playing)
    }

    /// Live queue plus the session's position clamped into it
    async fn live_queue(&self) -> Result<(Vec<LogicalTrack>, usize)> {
        let queue = self.engine.queue().await.map_err(engine_error("queue"))?;
        let index = self.session.current_index.min(queue.len().saturating_sub(1));
        Ok((queue, index))
    }

    async fn skip_to_next(&mut self) -> Result<Option<usize>> {
        if !self.session.is_visible {
            return Ok(None);
        }

        let (queue, index) = self.live_queue().await?;
        let Some(target) = navigator::next_group(&queue, index) else {
            debug!(index, "Already on the last verse");
            return Ok(None);
        };

        self.engine.skip(target).await.map_err(engine_error("skip"))?;
        self.session.on_active_track(target, queue[target].verse()?);
        self.publish();
        Ok(Some(target))
    }

    async fn skip_to_previous(&mut self) -> Result<Option<usize>> {
        if !self.session.is_visible {
            return Ok(None);
        }

        let (queue, index) = self.live_queue().await?;
        if queue.is_empty() {
            return Ok(None);
        }

        let target = if let Some(target) = navigator::previous_group(&queue, index) {
            self.engine.skip(target).await.map_err(engine_error("skip"))?;
            target
        } else {
            let start = navigator::group_start(&queue, index);
            debug!(start, "On the first verse, restarting it");
            self.engine.skip(start).await.map_err(engine_error("skip"))?;
            self.engine
                .seek_to(Duration::ZERO)
                .await
                .map_err(engine_error("seek_to"))?;
            self.engine.play().await.map_err(engine_error("play"))?;
            self.session.is_playing = true;
            start
        };

        self.session.on_active_track(target, queue[target].verse()?);
        self.publish();
        Ok(Some(target))
    }

    async fn stop(&mut self) -> Result<()> {
        self.engine.reset().await.map_err(engine_error("reset"))?;

        if self.session.is_visible {
            info!("Recitation stopped");
        }
        self.session.reset();
        self.publish();
        Ok(())
    }

    async fn set_reciter(&mut self, reciter: Reciter) {
        debug!(reciter = %reciter.id, "Selected reciter");
        self.settings.save_reciter(&reciter).await;
        self.session.reciter = reciter;
        self.publish();
    }

    async fn set_repeat(&mut self, repeat: RepeatConfig) -> RepeatConfig {
        debug!(mode = ?repeat.mode, count = repeat.count(), "Updated repeat");
        self.settings.save_repeat(repeat).await;
        self.session.repeat = repeat;

        // Repetition lives in the queue layout; the engine must never loop too.
        if let Err(e) = self.engine.disable_repeat().await {
            warn!(error = %e, "Failed to disable engine repeat");
        }

        self.publish();
        repeat
    }

    async fn set_speed(&mut self, speed: f32) -> f32 {
        let Some(speed) = clamp_speed(speed) else {
            warn!(speed, "Ignoring invalid playback speed");
            return self.session.speed;
        };

        self.settings.save_speed(speed).await;
        self.session.speed = speed;

        if self.session.is_visible {
            if let Err(e) = self.engine.set_rate(speed).await {
                warn!(speed, error = %e, "Failed to apply playback speed");
            }
        }

        self.publish();
        speed
    }

    async fn on_engine_event(&mut self, event: EngineEvent) {
        debug!(?event, "Engine event");

        match event {
            EngineEvent::StateChanged(state) => {
                if !self.session.on_engine_state(state) {
                    debug!(?state, "Ignoring engine state while idle");
                }
            }
            EngineEvent::ActiveTrackChanged(index) => match self.engine.queue().await {
                Ok(queue) => match queue.get(index).map(LogicalTrack::verse) {
                    Some(Ok(verse)) => self.session.on_active_track(index, verse),
                    Some(Err(e)) => warn!(index, error = %e, "Active track has an invalid verse key"),
                    None => warn!(index, queue_len = queue.len(), "Active track is outside the queue"),
                },
                Err(e) => warn!(index, error = %e, "Could not read engine queue for active track"),
            },
            EngineEvent::QueueEnded => {
                info!("Recitation queue ended");
                // The engine has nothing left to play, so the session goes
                // idle even when the reset is rejected.
                if let Err(e) = self.engine.reset().await {
                    warn!(error = %e, "Failed to reset engine after queue end");
                }
                self.session.reset();
            }
        }

        self.publish();
    }
}
