//! The audio graph capability the deck drives.
//!
//! Shaped after the Web Audio node API: buffer sources and biquad
//! filters are created by the backend and handed back as cheap handles.
//! The browser implementation lives in `web::audio`, the pure-Rust one in
//! `dsp::graph`.

use crate::error::VinylError;

/// Biquad filter response, matching the Web Audio `BiquadFilterType`
/// values this widget uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Bandpass,
}

/// Parameters a filter node is created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub frequency: f64,
    pub q: f64,
}

impl FilterSpec {
    /// Web Audio's default Q for a fresh `BiquadFilterNode`.
    pub const DEFAULT_Q: f64 = 1.0;

    pub fn lowpass(frequency: f64) -> Self {
        FilterSpec {
            kind: FilterKind::Lowpass,
            frequency,
            q: Self::DEFAULT_Q,
        }
    }

    pub fn bandpass(frequency: f64, q: f64) -> Self {
        FilterSpec {
            kind: FilterKind::Bandpass,
            frequency,
            q,
        }
    }
}

/// An audio graph able to host looping buffer sources routed through
/// biquad filters to the output.
pub trait AudioBackend {
    /// A decoded audio asset, shared by every source created from it.
    type Buffer;
    type Source;
    type Filter;

    /// Create a filter node. It is not connected to anything yet.
    fn create_filter(&mut self, spec: FilterSpec) -> Result<Self::Filter, VinylError>;

    /// Connect a filter's output to the graph destination.
    fn connect_to_output(&mut self, filter: &Self::Filter) -> Result<(), VinylError>;

    fn set_filter_frequency(&mut self, filter: &Self::Filter, hz: f64);

    /// Create a source node over `buffer`. It is silent until started.
    fn create_source(
        &mut self,
        buffer: &Self::Buffer,
        looping: bool,
    ) -> Result<Self::Source, VinylError>;

    /// Disconnect the source from wherever it feeds and connect it to
    /// `filter` instead.
    fn route(&mut self, source: &Self::Source, filter: &Self::Filter) -> Result<(), VinylError>;

    fn set_playback_rate(&mut self, source: &Self::Source, rate: f64);

    /// Start the source at context time `when` (seconds, 0 = now).
    fn start(&mut self, source: &Self::Source, when: f64) -> Result<(), VinylError>;

    /// Stop the source. A stopped source can't be restarted.
    fn stop(&mut self, source: &Self::Source) -> Result<(), VinylError>;
}
