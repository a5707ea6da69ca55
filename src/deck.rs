//! Deck — the audio graph controller.
//!
//! Holds the decoded track, the per-play voice (a looping buffer source
//! and its low-pass filter) and the long-lived band-pass scratch filter.
//!
//! ```text
//!   not scratching:  source ──▶ low-pass (fixed cutoff) ──▶ output
//!   scratching:      source ──▶ band-pass (moves with |delta|) ──▶ output
//! ```
//!
//! State machine: `Idle` until an asset is installed, `Loaded` once it
//! is, then `Playing` / `Stopped` as the toggle flips.

use crate::backend::{AudioBackend, FilterSpec};
use crate::config::PlayerConfig;
use crate::error::VinylError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckState {
    /// No buffer decoded (yet, or ever if the load failed).
    Idle,
    /// Buffer decoded, nothing connected.
    Loaded,
    Playing,
    Stopped,
}

/// What the host button shows and toggles between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Maps a scratch gesture's angular delta onto audio parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchMapping {
    pub rate_per_radian: f64,
    pub base_hz: f64,
    pub hz_per_radian: f64,
    /// Scratch filter frequency while the finger holds the record still.
    pub grab_hz: f64,
}

impl Default for ScratchMapping {
    fn default() -> Self {
        ScratchMapping::from_config(&PlayerConfig::default())
    }
}

impl ScratchMapping {
    pub fn from_config(config: &PlayerConfig) -> Self {
        ScratchMapping {
            rate_per_radian: config.rate_per_radian,
            base_hz: config.scratch_base_hz,
            hz_per_radian: config.scratch_hz_per_radian,
            grab_hz: config.grab_hz,
        }
    }

    /// Signed and unclamped: a backwards drag plays backwards, a fast
    /// one plays faster than normal.
    pub fn playback_rate(&self, delta: f64) -> f64 {
        delta * self.rate_per_radian
    }

    pub fn filter_frequency(&self, delta: f64) -> f64 {
        self.base_hz + delta.abs() * self.hz_per_radian
    }
}

struct Voice<S, F> {
    source: S,
    lowpass: F,
}

pub struct Deck<B: AudioBackend> {
    backend: B,
    mapping: ScratchMapping,
    lowpass_cutoff: f64,
    buffer: Option<B::Buffer>,
    voice: Option<Voice<B::Source, B::Filter>>,
    scratch_filter: B::Filter,
    scratching: bool,
    state: DeckState,
}

impl<B: AudioBackend> Deck<B> {
    /// Build the deck and its scratch filter, wired to the output.
    pub fn new(mut backend: B, config: &PlayerConfig) -> Result<Self, VinylError> {
        let mapping = ScratchMapping::from_config(config);
        let scratch_filter =
            backend.create_filter(FilterSpec::bandpass(mapping.base_hz, config.scratch_q))?;
        backend.connect_to_output(&scratch_filter)?;

        Ok(Deck {
            backend,
            mapping,
            lowpass_cutoff: config.lowpass_cutoff_hz,
            buffer: None,
            voice: None,
            scratch_filter,
            scratching: false,
            state: DeckState::Idle,
        })
    }

    pub fn state(&self) -> DeckState {
        self.state
    }

    pub fn playback(&self) -> PlaybackState {
        if self.state == DeckState::Playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == DeckState::Playing
    }

    pub fn is_scratching(&self) -> bool {
        self.scratching
    }

    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The source of the current voice, while one exists.
    pub fn source(&self) -> Option<&B::Source> {
        self.voice.as_ref().map(|v| &v.source)
    }

    pub fn lowpass(&self) -> Option<&B::Filter> {
        self.voice.as_ref().map(|v| &v.lowpass)
    }

    pub fn scratch_filter(&self) -> &B::Filter {
        &self.scratch_filter
    }

    /// Hand the decoded track to the deck.
    pub fn install(&mut self, buffer: B::Buffer) {
        self.buffer = Some(buffer);
        if self.state == DeckState::Idle {
            self.state = DeckState::Loaded;
        }
        log::debug!("deck: asset installed, state {:?}", self.state);
    }

    /// Start a fresh voice from the top of the track, replacing any
    /// current one. Returns `false` when there is nothing to play.
    pub fn play(&mut self) -> Result<bool, VinylError> {
        let Some(buffer) = self.buffer.as_ref() else {
            log::warn!("deck: play requested before the track loaded");
            return Ok(false);
        };

        if let Some(old) = &self.voice {
            self.backend.stop(&old.source)?;
            self.voice = None;
            self.state = DeckState::Stopped;
        }

        let source = self.backend.create_source(buffer, true)?;
        let lowpass = self
            .backend
            .create_filter(FilterSpec::lowpass(self.lowpass_cutoff))?;
        self.backend.connect_to_output(&lowpass)?;

        if self.scratching {
            self.backend.route(&source, &self.scratch_filter)?;
            self.backend.set_playback_rate(&source, 0.0);
            self.backend
                .set_filter_frequency(&self.scratch_filter, self.mapping.grab_hz);
        } else {
            self.backend.route(&source, &lowpass)?;
            self.backend.set_playback_rate(&source, 1.0);
            self.backend
                .set_filter_frequency(&self.scratch_filter, self.mapping.base_hz);
        }

        self.backend.start(&source, 0.0)?;
        self.voice = Some(Voice { source, lowpass });
        self.state = DeckState::Playing;
        log::debug!("deck: playing");
        Ok(true)
    }

    /// Stop the current voice. Does nothing when not playing.
    pub fn stop(&mut self) -> Result<(), VinylError> {
        if let Some(voice) = &self.voice {
            self.backend.stop(&voice.source)?;
            self.voice = None;
            self.state = DeckState::Stopped;
            log::debug!("deck: stopped");
        }
        Ok(())
    }

    /// Finger down on the record: hold it still and open the scratch filter.
    pub fn scratch_begin(&mut self) -> Result<(), VinylError> {
        self.scratching = true;
        if let Some(voice) = &self.voice {
            self.backend.route(&voice.source, &self.scratch_filter)?;
            self.backend.set_playback_rate(&voice.source, 0.0);
            self.backend
                .set_filter_frequency(&self.scratch_filter, self.mapping.grab_hz);
        }
        Ok(())
    }

    /// Apply one gesture step. Only touches the graph while playing.
    pub fn scratch(&mut self, delta: f64) {
        if !self.scratching {
            return;
        }
        if let Some(voice) = &self.voice {
            self.backend
                .set_playback_rate(&voice.source, self.mapping.playback_rate(delta));
            self.backend
                .set_filter_frequency(&self.scratch_filter, self.mapping.filter_frequency(delta));
        }
    }

    /// Finger up: back to normal speed through the low-pass filter.
    pub fn scratch_end(&mut self) -> Result<(), VinylError> {
        self.scratching = false;
        if let Some(voice) = &self.voice {
            self.backend.set_playback_rate(&voice.source, 1.0);
            self.backend
                .set_filter_frequency(&self.scratch_filter, self.mapping.base_hz);
            self.backend.route(&voice.source, &voice.lowpass)?;
        }
        Ok(())
    }
}
