// src/audio/player.rs
//! Rodio-backed media resource.
//!
//! The output stream is not `Send`, so an audio thread owns it together with
//! the sink and is driven over a command channel. Completions and progress
//! notifications travel back over a second channel, each tagged with the
//! number of seeks the audio thread had applied when it produced it.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, warn};

use super::metadata::load_track_info;
use super::resource::{MediaError, MediaEvent, MediaResource, TrackInfo};

/// Commands sent to the audio thread.
#[derive(Debug)]
enum PlayerCommand {
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    Shutdown,
}

/// An event and the seek count it was produced under.
type Tagged = (u64, MediaEvent);

/// A single audio file played through the default output device.
pub struct RodioMedia {
    cmd_tx: Sender<PlayerCommand>,
    event_rx: Receiver<Tagged>,
    /// Failures detected on this side of the channel, delivered before backend events
    local_events: VecDeque<MediaEvent>,
    /// Seeks sent so far; positions tagged lower predate the latest seek
    seeks_sent: u64,
    audio_thread: Option<JoinHandle<()>>,
}

impl RodioMedia {
    /// Spawn the audio thread for `path` and start probing its metadata.
    ///
    /// Nothing plays until [`MediaResource::request_play`] is called.
    pub fn open(path: impl Into<PathBuf>, time_update: Duration, volume: f32) -> Self {
        let path = path.into();
        let (cmd_tx, cmd_rx) = mpsc::channel::<PlayerCommand>();
        let (event_tx, event_rx) = mpsc::channel::<Tagged>();

        // Metadata is probed off the audio thread so a slow probe never delays play
        let meta_tx = event_tx.clone();
        let meta_path = path.clone();
        thread::spawn(move || {
            let info = probe_track_info(&meta_path);
            let _ = meta_tx.send((0, MediaEvent::MetadataLoaded(info)));
        });

        let audio_thread = thread::spawn(move || {
            audio_loop(path, cmd_rx, event_tx, time_update, volume);
        });

        Self::from_parts(cmd_tx, event_rx, Some(audio_thread))
    }

    /// Wrap the channel ends of an already running audio thread.
    fn from_parts(
        cmd_tx: Sender<PlayerCommand>,
        event_rx: Receiver<Tagged>,
        audio_thread: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            cmd_tx,
            event_rx,
            local_events: VecDeque::new(),
            seeks_sent: 0,
            audio_thread,
        }
    }

    fn send(&mut self, cmd: PlayerCommand) {
        let failed = match &cmd {
            PlayerCommand::Play => Some(MediaEvent::PlayResolved(Err(MediaError::Disconnected))),
            PlayerCommand::Pause => Some(MediaEvent::PauseResolved(Err(MediaError::Disconnected))),
            _ => None,
        };
        if self.cmd_tx.send(cmd).is_err() {
            warn!("audio thread is gone, dropping command");
            // Requests still have to resolve, otherwise the caller waits forever
            if let Some(event) = failed {
                self.local_events.push_back(event);
            }
        }
    }
}

impl MediaResource for RodioMedia {
    fn request_play(&mut self) {
        self.send(PlayerCommand::Play);
    }

    fn request_pause(&mut self) {
        self.send(PlayerCommand::Pause);
    }

    fn set_position(&mut self, secs: f64) {
        let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
        self.seeks_sent += 1;
        self.send(PlayerCommand::Seek(Duration::from_secs_f64(secs)));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(PlayerCommand::SetVolume(level));
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        if let Some(event) = self.local_events.pop_front() {
            return Some(event);
        }
        while let Ok((seeks, event)) = self.event_rx.try_recv() {
            // A position sampled before the latest seek would undo the optimistic jump
            if matches!(event, MediaEvent::TimeUpdate(_)) && seeks < self.seeks_sent {
                continue;
            }
            return Some(event);
        }
        None
    }
}

impl Drop for RodioMedia {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(PlayerCommand::Shutdown);
        if let Some(handle) = self.audio_thread.take() {
            if handle.join().is_err() {
                warn!("audio thread panicked");
            }
        }
    }
}

/// Tags first, then the decoder's own idea of the length.
fn probe_track_info(path: &Path) -> TrackInfo {
    match load_track_info(path) {
        Ok(info) if info.duration_secs.is_some() => info,
        Ok(info) => TrackInfo {
            duration_secs: decoder_duration(path),
            ..info
        },
        Err(err) => {
            warn!("metadata probe failed: {err:#}");
            TrackInfo {
                duration_secs: decoder_duration(path),
                ..TrackInfo::default()
            }
        }
    }
}

fn decoder_duration(path: &Path) -> Option<f64> {
    let file = File::open(path).ok()?;
    let decoder = Decoder::new(BufReader::new(file)).ok()?;
    decoder.total_duration().map(|d| d.as_secs_f64())
}

fn audio_loop(
    path: PathBuf,
    rx: Receiver<PlayerCommand>,
    tx: Sender<Tagged>,
    time_update: Duration,
    volume: f32,
) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(err) => {
            warn!("no audio output: {err}");
            answer_without_device(&rx, &tx, &err.to_string());
            return;
        }
    };

    let mut deck = Deck {
        path,
        handle,
        sink: None,
        volume,
        playing: false,
        start_at: None,
        seeks: 0,
    };

    let mut clock = ReportClock::new(time_update, Instant::now());
    loop {
        match rx.recv_timeout(clock.wait(Instant::now())) {
            Ok(PlayerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(cmd) => deck.handle(cmd, &tx),
            Err(RecvTimeoutError::Timeout) => {}
        }
        if clock.fire(Instant::now()) {
            deck.report_progress(&tx);
        }
    }

    if let Some(sink) = deck.sink.take() {
        sink.stop();
    }
    debug!("audio thread exiting");
    // Keep stream alive until the sink is stopped
    drop(stream);
}

/// Keep answering requests so the panel never waits on a dead device.
fn answer_without_device(rx: &Receiver<PlayerCommand>, tx: &Sender<Tagged>, reason: &str) {
    while let Ok(cmd) = rx.recv() {
        let event = match cmd {
            PlayerCommand::Play => MediaEvent::PlayResolved(Err(MediaError::Output(reason.into()))),
            PlayerCommand::Pause => {
                MediaEvent::PauseResolved(Err(MediaError::Output(reason.into())))
            }
            PlayerCommand::Shutdown => break,
            _ => continue,
        };
        let _ = tx.send((0, event));
    }
}

/// Progress cadence. Reports go out on a fixed period however many
/// commands arrive in between.
#[derive(Debug)]
struct ReportClock {
    period: Duration,
    next: Instant,
}

impl ReportClock {
    fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now + period,
        }
    }

    /// How long the audio thread may block on the command channel.
    fn wait(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// True once per period; re-arms from `now`.
    fn fire(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next = now + self.period;
        true
    }
}

/// Audio-thread side state.
struct Deck {
    path: PathBuf,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: f32,
    playing: bool,
    /// Position requested while no source was queued
    start_at: Option<Duration>,
    /// Seeks applied so far, stamped on every event
    seeks: u64,
}

impl Deck {
    fn handle(&mut self, cmd: PlayerCommand, tx: &Sender<Tagged>) {
        match cmd {
            PlayerCommand::Play => {
                let result = self.play();
                if let Err(err) = &result {
                    debug!("play failed: {err}");
                }
                let _ = tx.send((self.seeks, MediaEvent::PlayResolved(result)));
            }
            PlayerCommand::Pause => {
                let result = match &self.sink {
                    Some(sink) => {
                        sink.pause();
                        self.playing = false;
                        Ok(())
                    }
                    None => Err(MediaError::NotLoaded),
                };
                let _ = tx.send((self.seeks, MediaEvent::PauseResolved(result)));
            }
            PlayerCommand::Seek(pos) => {
                self.seeks += 1;
                match self.sink.as_ref().filter(|s| !s.empty()) {
                    Some(sink) => {
                        if let Err(err) = sink.try_seek(pos) {
                            warn!("seek to {:.1}s failed: {err}", pos.as_secs_f64());
                        }
                    }
                    None => self.start_at = Some(pos),
                }
            }
            PlayerCommand::SetVolume(level) => {
                self.volume = level;
                if let Some(sink) = &self.sink {
                    sink.set_volume(level);
                }
            }
            PlayerCommand::Shutdown => {}
        }
    }

    fn play(&mut self) -> Result<(), MediaError> {
        let needs_source = self.sink.as_ref().is_none_or(|s| s.empty());
        if needs_source {
            self.sink = Some(self.load()?);
        }
        if let Some(sink) = &self.sink {
            sink.play();
            self.playing = true;
        }
        Ok(())
    }

    /// Build a paused sink with the source queued, honouring any pending seek.
    fn load(&mut self) -> Result<Sink, MediaError> {
        let file = File::open(&self.path).map_err(|e| MediaError::Open(e.to_string()))?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode(e.to_string()))?;
        let sink = Sink::try_new(&self.handle).map_err(|e| MediaError::Output(e.to_string()))?;

        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);
        if let Some(pos) = self.start_at.take() {
            if let Err(err) = sink.try_seek(pos) {
                warn!("initial seek to {:.1}s failed: {err}", pos.as_secs_f64());
            }
        }
        info!("loaded {}", self.path.display());
        Ok(sink)
    }

    fn report_progress(&mut self, tx: &Sender<Tagged>) {
        if !self.playing {
            return;
        }
        let Some(sink) = &self.sink else {
            return;
        };
        if sink.empty() {
            self.playing = false;
            let _ = tx.send((self.seeks, MediaEvent::Ended));
        } else {
            let position = sink.get_pos().as_secs_f64();
            let _ = tx.send((self.seeks, MediaEvent::TimeUpdate(position)));
        }
    }
}
