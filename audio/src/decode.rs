//! Audio decoding into mono f32 PCM at the native sample rate.
//!
//! Decoding never resamples: utterance timestamps are converted to sample
//! indices with the rate found in the container. RIFF/WAVE goes through
//! `hound`; MP3 and AAC in an MP4/M4A container go through `symphonia`.

use std::io::{self, Cursor};

use hound::{SampleFormat, WavReader};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as CodecError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::waveform::Waveform;

/// Errors returned while decoding audio bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed audio container: {0}")]
    Malformed(#[from] hound::Error),

    #[error("malformed compressed audio: {0}")]
    Codec(CodecError),

    #[error("unsupported audio: {0}")]
    Unsupported(String),

    #[error("truncated pcm: {len} bytes is not a whole number of 16-bit samples")]
    Truncated { len: usize },
}

impl From<CodecError> for DecodeError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Unsupported(what) => Self::Unsupported(what.to_string()),
            other => Self::Codec(other),
        }
    }
}

/// Decodes WAV, MP3 or M4A/AAC bytes into a mono waveform.
///
/// The container is chosen by sniffing: a `RIFF` header is read as WAVE,
/// anything else is probed for a compressed format. Bytes no reader
/// recognizes are [`DecodeError::Unsupported`].
pub fn decode(bytes: &[u8]) -> Result<Waveform, DecodeError> {
    if bytes.starts_with(b"RIFF") {
        decode_wav(bytes)
    } else {
        decode_compressed(bytes)
    }
}

/// Decodes a RIFF/WAVE container.
///
/// Integer PCM is scaled by `2^(bits-1)` into `[-1, 1)`. Multi-channel audio
/// is downmixed by averaging every frame.
pub fn decode_wav(bytes: &[u8]) -> Result<Waveform, DecodeError> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(DecodeError::Unsupported("zero channels".into()));
    }
    if spec.sample_rate == 0 {
        return Err(DecodeError::Unsupported("zero sample rate".into()));
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        (SampleFormat::Int, bits @ 1..=32) => {
            let scale = (1u64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
        (format, bits) => {
            return Err(DecodeError::Unsupported(format!(
                "{bits}-bit {format:?} samples"
            )));
        }
    };

    let samples = downmix(&interleaved, spec.channels as usize);
    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Decodes the first audio track of an MP3 stream or an MP4/M4A file.
fn decode_compressed(bytes: &[u8]) -> Result<Waveform, DecodeError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Unsupported(format!("unrecognized container ({e})")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::Unsupported("no audio track".into()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(CodecError::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(CodecError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let buf = match decoder.decode(&packet) {
            Ok(buf) => buf,
            // A corrupt frame is dropped; the stream resyncs on the next one.
            Err(CodecError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };
        let spec = *buf.spec();
        let channels = spec.channels.count();
        if channels == 0 {
            return Err(DecodeError::Unsupported("zero channels".into()));
        }
        sample_rate.get_or_insert(spec.rate);

        let mut interleaved = SampleBuffer::<f32>::new(buf.capacity() as u64, spec);
        interleaved.copy_interleaved_ref(buf);
        samples.extend(downmix(interleaved.samples(), channels));
    }

    match sample_rate {
        Some(rate) if rate > 0 => Ok(Waveform::new(samples, rate)),
        _ => Err(DecodeError::Unsupported("zero sample rate".into())),
    }
}

/// Decodes headerless little-endian 16-bit mono PCM.
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32) -> Result<Waveform, DecodeError> {
    if sample_rate == 0 {
        return Err(DecodeError::Unsupported("zero sample rate".into()));
    }
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::Truncated { len: bytes.len() });
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect();
    Ok(Waveform::new(samples, sample_rate))
}

fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
