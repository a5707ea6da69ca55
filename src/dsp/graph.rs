//! Offline audio graph — a pure-Rust `AudioBackend`.
//!
//! Mirrors the slice of Web Audio the deck uses: buffer sources with a
//! signed playback rate and looping, routed into biquad filters whose
//! outputs may be summed into the destination. `render` pulls frames
//! through the graph; the inspection accessors let callers check the
//! wiring without listening to it.

use std::sync::Arc;

use crate::backend::{AudioBackend, FilterKind, FilterSpec};
use crate::error::VinylError;

use super::buffer::SampleBuffer;
use super::filter::BiquadFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(usize);

/// Lifecycle of a buffer source. Like Web Audio, a source can be
/// started once and never restarted after it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Created,
    Started,
    Stopped,
}

#[derive(Debug, Clone)]
struct SourceSlot {
    buffer: Arc<SampleBuffer>,
    /// Fractional read position, in buffer samples.
    position: f64,
    playback_rate: f64,
    looping: bool,
    status: SourceStatus,
    target: Option<FilterId>,
}

impl SourceSlot {
    fn next_sample(&mut self, engine_rate: f64) -> f64 {
        if self.buffer.is_empty() {
            self.status = SourceStatus::Stopped;
            return 0.0;
        }
        let len = self.buffer.len() as f64;

        let sample = if self.looping {
            self.buffer.read_looped(self.position)
        } else {
            self.buffer.read_interpolated(self.position)
        };

        let step = self.playback_rate * self.buffer.sample_rate as f64 / engine_rate;
        self.position += step;

        if self.looping {
            self.position = self.position.rem_euclid(len);
        } else if self.position >= len || self.position < 0.0 {
            self.status = SourceStatus::Stopped;
        }

        sample
    }
}

#[derive(Debug, Clone)]
struct FilterSlot {
    filter: BiquadFilter,
    to_output: bool,
}

/// An in-memory audio graph rendering mono f32 frames.
#[derive(Debug, Clone)]
pub struct OfflineGraph {
    sample_rate: f64,
    sources: Vec<SourceSlot>,
    filters: Vec<FilterSlot>,
}

impl OfflineGraph {
    pub fn new(sample_rate: f64) -> Self {
        OfflineGraph {
            sample_rate,
            sources: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Render `frames` output samples.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(frames);
        let mut inputs = vec![0.0f64; self.filters.len()];

        for _ in 0..frames {
            inputs.iter_mut().for_each(|x| *x = 0.0);

            for source in self
                .sources
                .iter_mut()
                .filter(|s| s.status == SourceStatus::Started)
            {
                let sample = source.next_sample(self.sample_rate);
                if let Some(target) = source.target {
                    inputs[target.0] += sample;
                }
            }

            let mut sum = 0.0;
            for (slot, &input) in self.filters.iter_mut().zip(&inputs) {
                let y = slot.filter.process(input);
                if slot.to_output {
                    sum += y;
                }
            }
            out.push(sum as f32);
        }

        out
    }

    pub fn source_status(&self, source: SourceId) -> SourceStatus {
        self.sources[source.0].status
    }

    pub fn playback_rate(&self, source: SourceId) -> f64 {
        self.sources[source.0].playback_rate
    }

    pub fn is_looping(&self, source: SourceId) -> bool {
        self.sources[source.0].looping
    }

    /// The filter a source currently feeds, if any.
    pub fn route_of(&self, source: SourceId) -> Option<FilterId> {
        self.sources[source.0].target
    }

    pub fn filter_frequency(&self, filter: FilterId) -> f64 {
        self.filters[filter.0].filter.frequency()
    }

    pub fn filter_kind(&self, filter: FilterId) -> FilterKind {
        self.filters[filter.0].filter.kind
    }

    pub fn filter_q(&self, filter: FilterId) -> f64 {
        self.filters[filter.0].filter.q()
    }

    pub fn is_connected_to_output(&self, filter: FilterId) -> bool {
        self.filters[filter.0].to_output
    }

    /// Number of started sources whose signal reaches the destination.
    pub fn audible_sources(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| s.status == SourceStatus::Started)
            .filter(|s| s.target.is_some_and(|f| self.filters[f.0].to_output))
            .count()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl AudioBackend for OfflineGraph {
    type Buffer = Arc<SampleBuffer>;
    type Source = SourceId;
    type Filter = FilterId;

    fn create_filter(&mut self, spec: FilterSpec) -> Result<FilterId, VinylError> {
        self.filters.push(FilterSlot {
            filter: BiquadFilter::new(spec, self.sample_rate),
            to_output: false,
        });
        Ok(FilterId(self.filters.len() - 1))
    }

    fn connect_to_output(&mut self, filter: &FilterId) -> Result<(), VinylError> {
        self.filters[filter.0].to_output = true;
        Ok(())
    }

    fn set_filter_frequency(&mut self, filter: &FilterId, hz: f64) {
        self.filters[filter.0].filter.set_frequency(hz);
    }

    fn create_source(
        &mut self,
        buffer: &Arc<SampleBuffer>,
        looping: bool,
    ) -> Result<SourceId, VinylError> {
        self.sources.push(SourceSlot {
            buffer: Arc::clone(buffer),
            position: 0.0,
            playback_rate: 1.0,
            looping,
            status: SourceStatus::Created,
            target: None,
        });
        Ok(SourceId(self.sources.len() - 1))
    }

    fn route(&mut self, source: &SourceId, filter: &FilterId) -> Result<(), VinylError> {
        self.sources[source.0].target = Some(*filter);
        Ok(())
    }

    fn set_playback_rate(&mut self, source: &SourceId, rate: f64) {
        self.sources[source.0].playback_rate = rate;
    }

    fn start(&mut self, source: &SourceId, _when: f64) -> Result<(), VinylError> {
        let slot = &mut self.sources[source.0];
        if slot.status != SourceStatus::Created {
            return Err(VinylError::Host(format!(
                "source {} cannot be started twice",
                source.0
            )));
        }
        // Offline rendering starts at frame zero; only "now" is meaningful.
        slot.position = 0.0;
        slot.status = SourceStatus::Started;
        Ok(())
    }

    fn stop(&mut self, source: &SourceId) -> Result<(), VinylError> {
        let slot = &mut self.sources[source.0];
        if slot.status == SourceStatus::Created {
            return Err(VinylError::Host(format!(
                "source {} stopped before it was started",
                source.0
            )));
        }
        slot.status = SourceStatus::Stopped;
        Ok(())
    }
}
