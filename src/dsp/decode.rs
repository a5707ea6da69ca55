//! Native decoding of the track for the offline graph.
//!
//! WAV goes through `hound`, anything else is tried as MP3 through
//! `minimp3`. Multi-channel audio is averaged down to mono.

use std::io::Cursor;

use crate::error::LoadError;

use super::buffer::SampleBuffer;

/// Decode WAV or MP3 bytes into a mono buffer.
pub fn decode_asset(bytes: &[u8]) -> Result<SampleBuffer, LoadError> {
    if bytes.starts_with(b"RIFF") {
        decode_wav(bytes)
    } else {
        decode_mp3(bytes)
    }
}

fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer, LoadError> {
    let reader =
        hound::WavReader::new(Cursor::new(bytes)).map_err(|e| LoadError::Decode(e.to_string()))?;
    let spec = reader.spec();

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<_, _>>(),
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()
        }
    }
    .map_err(|e| LoadError::Decode(e.to_string()))?;

    Ok(SampleBuffer::new(
        downmix(&interleaved, spec.channels as usize),
        spec.sample_rate,
    ))
}

fn decode_mp3(bytes: &[u8]) -> Result<SampleBuffer, LoadError> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(bytes));
    let mut data = Vec::new();
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                sample_rate = frame.sample_rate as u32;
                let pcm = SampleBuffer::from_i16(&frame.data, frame.sample_rate as u32);
                data.extend(downmix(&pcm.data, frame.channels));
            }
            Err(minimp3::Error::Eof) => break,
            Err(minimp3::Error::SkippedData) => continue,
            Err(e) => return Err(LoadError::Decode(format!("{e:?}"))),
        }
    }

    if data.is_empty() || sample_rate == 0 {
        return Err(LoadError::Decode("no audio frames found".to_string()));
    }
    Ok(SampleBuffer::new(data, sample_rate))
}

fn downmix(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}
