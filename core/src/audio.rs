//! Audio playback through rodio
//!
//! Songs and samples are read into memory once at startup and decoded on
//! every play. Missing files leave their slot empty; playing an empty slot
//! does nothing.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::assets::GamePaths;
use crate::console::{AUDIO_SLOTS, Audio, Channel, SAMPLE_CHANNELS};

type Clip = Arc<[u8]>;

/// Read each slot path; absent or unreadable files become `None`
fn load_slots(paths: impl Iterator<Item = PathBuf>, kind: &str) -> Vec<Option<Clip>> {
    paths
        .enumerate()
        .map(|(slot, path)| match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!("Loaded {} {} from {}", kind, slot, path.display());
                Some(Clip::from(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {} {}: {}", kind, path.display(), e);
                None
            }
        })
        .collect()
}

/// Resolve a channel selector against the busy state of each channel
fn pick_channel(channel: Channel, is_busy: impl Fn(usize) -> bool) -> Option<usize> {
    match channel {
        Channel::Index(index) if index < SAMPLE_CHANNELS => Some(index),
        Channel::Index(_) => None,
        Channel::Any => (0..SAMPLE_CHANNELS).find(|&index| !is_busy(index)),
    }
}

/// Song and sample clips for one game
pub struct AudioBank {
    songs: Vec<Option<Clip>>,
    samples: Vec<Option<Clip>>,
}

impl AudioBank {
    pub fn load(paths: &GamePaths) -> Self {
        let songs = load_slots((0..AUDIO_SLOTS).map(|n| paths.song(n)), "song");
        let samples = load_slots((0..AUDIO_SLOTS).map(|n| paths.sample(n)), "sample");
        tracing::info!(
            "Audio: {} songs, {} samples",
            songs.iter().flatten().count(),
            samples.iter().flatten().count()
        );
        Self { songs, samples }
    }

    fn song(&self, id: usize) -> Option<&Clip> {
        self.songs.get(id).and_then(Option::as_ref)
    }

    fn sample(&self, id: usize) -> Option<&Clip> {
        self.samples.get(id).and_then(Option::as_ref)
    }
}

/// Audio backend on the default output device
pub struct RodioAudio {
    /// Keeps the device open; dropping it silences every sink
    _stream: OutputStream,
    handle: OutputStreamHandle,
    bank: AudioBank,
    music: Option<Sink>,
    channels: Vec<Option<Sink>>,
    volume: f32,
}

impl RodioAudio {
    pub fn new(bank: AudioBank, volume: f32) -> Result<Self, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            bank,
            music: None,
            channels: (0..SAMPLE_CHANNELS).map(|_| None).collect(),
            volume: volume.clamp(0.0, 1.0),
        })
    }

    /// Decode `clip` into a fresh sink, or `None` if anything fails
    fn start(&self, clip: &Clip, looping: bool) -> Option<Sink> {
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!("Failed to create audio sink: {}", e);
                return None;
            }
        };
        let cursor = Cursor::new(clip.clone());
        let appended = if looping {
            Decoder::new_looped(cursor).map(|source| sink.append(source))
        } else {
            Decoder::new(cursor).map(|source| sink.append(source))
        };
        if let Err(e) = appended {
            tracing::warn!("Failed to decode audio clip: {}", e);
            return None;
        }
        sink.set_volume(self.volume);
        Some(sink)
    }
}

impl Audio for RodioAudio {
    fn play_song(&mut self, id: usize, looping: bool) {
        self.stop_song();
        let Some(clip) = self.bank.song(id) else {
            tracing::debug!("Song {} is not loaded", id);
            return;
        };
        self.music = self.start(clip, looping);
    }

    fn stop_song(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }

    fn play_sample(&mut self, id: usize, channel: Channel, looping: bool) {
        let Some(clip) = self.bank.sample(id) else {
            tracing::debug!("Sample {} is not loaded", id);
            return;
        };
        let channels = &self.channels;
        let is_busy = |index: usize| channels[index].as_ref().is_some_and(|s| !s.empty());
        let Some(index) = pick_channel(channel, is_busy) else {
            tracing::debug!("No free channel for sample {}", id);
            return;
        };

        if let Some(old) = self.channels[index].take() {
            old.stop();
        }
        self.channels[index] = self.start(clip, looping);
    }

    fn stop_sample(&mut self, channel: Channel) {
        match channel {
            Channel::Any => {
                for sink in self.channels.iter_mut().filter_map(Option::take) {
                    sink.stop();
                }
            }
            Channel::Index(index) => {
                if let Some(sink) = self.channels.get_mut(index).and_then(Option::take) {
                    sink.stop();
                }
            }
        }
    }
}
