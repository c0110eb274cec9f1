//! Simulated audio engine
//!
//! Stands in for a platform player: it keeps the queue, logs each command,
//! and "plays" every entry for a fixed time (scaled by the rate) before moving
//! on. Position changes and the end of the queue are reported through the
//! attached [`EngineEventSink`], exactly as a real engine's callbacks would.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tilawa_core::{AudioEngine, EngineEvent, EngineState, LogicalTrack, Result, TilawaError};
use tilawa_playback::EngineEventSink;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Default)]
struct Inner {
    queue: Vec<LogicalTrack>,
    index: usize,
    playing: bool,
    rate: f32,
    ticker: Option<JoinHandle<()>>,
    sink: Option<EngineEventSink>,
}

impl Inner {
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn emit(&self, event: EngineEvent) {
        let Some(sink) = &self.sink else {
            debug!(?event, "No event sink attached, dropping event");
            return;
        };
        // Commands arrive from inside the player, so never wait on its queue here.
        if let Err(e) = sink.try_send(event) {
            warn!(?event, error = %e, "Failed to deliver engine event");
        }
    }
}

/// Timer-driven [`AudioEngine`] for the command line
#[derive(Clone)]
pub struct SimulatedEngine {
    inner: Arc<Mutex<Inner>>,
    track_duration: Duration,
}

impl SimulatedEngine {
    /// Each queue entry lasts `track_duration` at 1x
    pub fn new(track_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                rate: 1.0,
                ..Inner::default()
            })),
            track_duration,
        }
    }

    /// Route engine events into a player
    pub fn attach(&self, sink: EngineEventSink) {
        self.lock().sink = Some(sink);
    }

    /// Stop delivering events, releasing the player's channel
    pub fn detach(&self) {
        self.lock().sink = None;
    }

    /// Physical position currently "playing"
    pub fn current_index(&self) -> usize {
        self.lock().index
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    pub fn queue_is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn restart_ticker(&self, inner: &mut Inner) {
        inner.stop_ticker();
        if inner.playing && !inner.queue.is_empty() {
            let engine = self.clone();
            inner.ticker = Some(tokio::spawn(async move { engine.tick().await }));
        }
    }

    async fn tick(self) {
        loop {
            let rate = self.lock().rate;
            tokio::time::sleep(self.track_duration.div_f32(rate)).await;

            let (event, sink) = {
                let mut inner = self.lock();
                let next = inner.index + 1;
                let event = if next < inner.queue.len() {
                    inner.index = next;
                    EngineEvent::ActiveTrackChanged(next)
                } else {
                    inner.playing = false;
                    inner.ticker = None;
                    EngineEvent::QueueEnded
                };
                (event, inner.sink.clone())
            };

            debug!(?event, "Simulated playback advanced");
            if let Some(sink) = sink {
                if sink.send(event).await.is_err() {
                    debug!("Player gone, stopping simulated playback");
                    return;
                }
            }
            if event == EngineEvent::QueueEnded {
                return;
            }
        }
    }
}

#[async_trait]
impl AudioEngine for SimulatedEngine {
    async fn reset(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.stop_ticker();
        inner.queue.clear();
        inner.index = 0;
        inner.playing = false;
        debug!("engine: reset");
        Ok(())
    }

    async fn add(&self, tracks: Vec<LogicalTrack>) -> Result<()> {
        let mut inner = self.lock();
        debug!(added = tracks.len(), queue_len = inner.queue.len() + tracks.len(), "engine: add");
        inner.queue.extend(tracks);
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.queue.is_empty() {
            return Err(TilawaError::engine("nothing queued"));
        }
        if let Some(track) = inner.queue.get(inner.index) {
            info!(index = inner.index, title = %track.title, url = %track.audio_url, "engine: play");
        }
        inner.playing = true;
        self.restart_ticker(&mut inner);
        inner.emit(EngineEvent::StateChanged(EngineState::Playing));
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.playing = false;
        inner.stop_ticker();
        info!(index = inner.index, "engine: pause");
        inner.emit(EngineEvent::StateChanged(EngineState::Paused));
        Ok(())
    }

    async fn seek_to(&self, position: Duration) -> Result<()> {
        let mut inner = self.lock();
        debug!(?position, index = inner.index, "engine: seek");
        // Positions are not modelled; a seek restarts the current entry.
        self.restart_ticker(&mut inner);
        Ok(())
    }

    async fn set_rate(&self, rate: f32) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(TilawaError::engine(format!("invalid rate {rate}")));
        }
        let mut inner = self.lock();
        inner.rate = rate;
        debug!(rate, "engine: set rate");
        Ok(())
    }

    async fn skip(&self, index: usize) -> Result<()> {
        let mut inner = self.lock();
        if index >= inner.queue.len() {
            return Err(TilawaError::engine(format!(
                "skip to {index} outside queue of {}",
                inner.queue.len()
            )));
        }
        inner.index = index;
        if let Some(track) = inner.queue.get(index) {
            info!(index, title = %track.title, "engine: skip");
        }
        self.restart_ticker(&mut inner);
        inner.emit(EngineEvent::ActiveTrackChanged(index));
        Ok(())
    }

    async fn disable_repeat(&self) -> Result<()> {
        debug!("engine: repeat off");
        Ok(())
    }

    async fn queue(&self) -> Result<Vec<LogicalTrack>> {
        Ok(self.lock().queue.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilawa_core::VerseRef;

    fn tracks(keys: &[&str]) -> Vec<LogicalTrack> {
        keys.iter()
            .map(|key| {
                let verse: VerseRef = key.parse().unwrap();
                LogicalTrack::new(verse, format!("https://cdn/{key}.mp3"), *key, "Reciter")
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reset_clears_queue() {
        let engine = SimulatedEngine::new(Duration::from_secs(60));
        engine.add(tracks(&["1:1", "1:2"])).await.unwrap();
        engine.play().await.unwrap();

        engine.reset().await.unwrap();

        assert!(engine.queue().await.unwrap().is_empty());
        assert!(!engine.is_playing());
        assert_eq!(engine.current_index(), 0);
    }

    #[tokio::test]
    async fn test_play_on_empty_queue_fails() {
        let engine = SimulatedEngine::new(Duration::from_secs(60));
        assert!(engine.play().await.is_err());
    }

    #[tokio::test]
    async fn test_skip_outside_queue_fails() {
        let engine = SimulatedEngine::new(Duration::from_secs(60));
        engine.add(tracks(&["1:1", "1:2"])).await.unwrap();

        assert!(engine.skip(2).await.is_err());
        engine.skip(1).await.unwrap();
        assert_eq!(engine.current_index(), 1);
    }

    #[tokio::test]
    async fn test_invalid_rate_is_rejected() {
        let engine = SimulatedEngine::new(Duration::from_secs(60));
        assert!(engine.set_rate(0.0).await.is_err());
        assert!(engine.set_rate(f32::NAN).await.is_err());
        engine.set_rate(1.5).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_advances_and_ends() {
        let engine = SimulatedEngine::new(Duration::from_millis(100));
        engine.add(tracks(&["1:1", "1:2", "1:3"])).await.unwrap();
        engine.play().await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(engine.current_index(), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(engine.current_index(), 2);
        assert!(engine.is_playing());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!engine.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_the_clock() {
        let engine = SimulatedEngine::new(Duration::from_millis(100));
        engine.add(tracks(&["1:1", "1:2"])).await.unwrap();
        engine.play().await.unwrap();
        engine.pause().await.unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(engine.current_index(), 0);
        assert!(!engine.is_playing());
    }
}
