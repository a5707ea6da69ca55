//! Web Audio implementation of the deck's backend, and the track loader.

use js_sys::ArrayBuffer;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, BiquadFilterNode, BiquadFilterType, Response,
};

use crate::backend::{AudioBackend, FilterKind, FilterSpec};
use crate::error::{LoadError, VinylError};

use super::{describe, js_error};

#[derive(Debug, Clone)]
pub struct WebAudio {
    context: AudioContext,
}

impl WebAudio {
    pub fn new() -> Result<Self, VinylError> {
        let context = AudioContext::new().map_err(js_error)?;
        Ok(WebAudio { context })
    }

    pub fn context(&self) -> &AudioContext {
        &self.context
    }
}

impl AudioBackend for WebAudio {
    type Buffer = AudioBuffer;
    type Source = AudioBufferSourceNode;
    type Filter = BiquadFilterNode;

    fn create_filter(&mut self, spec: FilterSpec) -> Result<BiquadFilterNode, VinylError> {
        let filter = self.context.create_biquad_filter().map_err(js_error)?;
        filter.set_type(match spec.kind {
            FilterKind::Lowpass => BiquadFilterType::Lowpass,
            FilterKind::Bandpass => BiquadFilterType::Bandpass,
        });
        filter.frequency().set_value(spec.frequency as f32);
        filter.q().set_value(spec.q as f32);
        Ok(filter)
    }

    fn connect_to_output(&mut self, filter: &BiquadFilterNode) -> Result<(), VinylError> {
        filter
            .connect_with_audio_node(&self.context.destination())
            .map_err(js_error)?;
        Ok(())
    }

    fn set_filter_frequency(&mut self, filter: &BiquadFilterNode, hz: f64) {
        filter.frequency().set_value(hz as f32);
    }

    fn create_source(
        &mut self,
        buffer: &AudioBuffer,
        looping: bool,
    ) -> Result<AudioBufferSourceNode, VinylError> {
        let source = self.context.create_buffer_source().map_err(js_error)?;
        source.set_buffer(Some(buffer));
        source.set_loop(looping);
        Ok(source)
    }

    fn route(
        &mut self,
        source: &AudioBufferSourceNode,
        filter: &BiquadFilterNode,
    ) -> Result<(), VinylError> {
        source.disconnect().map_err(js_error)?;
        source.connect_with_audio_node(filter).map_err(js_error)?;
        Ok(())
    }

    fn set_playback_rate(&mut self, source: &AudioBufferSourceNode, rate: f64) {
        source.playback_rate().set_value(rate as f32);
    }

    fn start(&mut self, source: &AudioBufferSourceNode, when: f64) -> Result<(), VinylError> {
        source.start_with_when(when).map_err(js_error)
    }

    fn stop(&mut self, source: &AudioBufferSourceNode) -> Result<(), VinylError> {
        source.stop().map_err(js_error)
    }
}

/// Fetch the track and decode it. A non-2xx status counts as a failure.
pub async fn load_track(context: &AudioContext, url: &str) -> Result<AudioBuffer, LoadError> {
    let window =
        web_sys::window().ok_or_else(|| LoadError::Network("no global window".to_string()))?;

    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .and_then(|value| value.dyn_into())
        .map_err(|e| LoadError::Network(describe(&e)))?;
    if !response.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = response
        .array_buffer()
        .map_err(|e| LoadError::Network(describe(&e)))?;
    let bytes: ArrayBuffer = JsFuture::from(body)
        .await
        .and_then(|value| value.dyn_into())
        .map_err(|e| LoadError::Network(describe(&e)))?;

    let decoding = context
        .decode_audio_data(&bytes)
        .map_err(|e| LoadError::Decode(describe(&e)))?;
    JsFuture::from(decoding)
        .await
        .and_then(|value| value.dyn_into())
        .map_err(|e| LoadError::Decode(describe(&e)))
}
