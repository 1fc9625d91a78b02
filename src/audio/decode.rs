use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error, formats::FormatOptions,
    io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use thiserror::Error;

use super::AudioSignal;
use crate::error::AnalysisError;

/// Errors raised while decoding an audio file into an [`AudioSignal`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Failed to open or read the file.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The WAV reader rejected the file.
    #[error("WAV decode failed for {path}: {source}")]
    Wav {
        path: PathBuf,
        source: hound::Error,
    },
    /// Symphonia could not probe or decode the container.
    #[error("Audio decode failed for {path}: {message}")]
    Codec { path: PathBuf, message: String },
    /// Decoded samples did not form a valid signal.
    #[error("Decoded audio from {path} is unusable: {source}")]
    Signal {
        path: PathBuf,
        source: AnalysisError,
    },
}

/// Decode a WAV file, downmixing to mono.
pub fn load_wav(path: &Path) -> Result<AudioSignal, DecodeError> {
    let reader = hound::WavReader::open(path).map_err(|source| DecodeError::Wav {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = reader.spec();
    let samples = read_wav_samples(reader).map_err(|source| DecodeError::Wav {
        path: path.to_path_buf(),
        source,
    })?;
    AudioSignal::from_interleaved(&samples, spec.channels, spec.sample_rate).map_err(|source| {
        DecodeError::Signal {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Decode any supported file; WAV goes through `hound`, everything else through Symphonia.
pub fn load_file(path: &Path) -> Result<AudioSignal, DecodeError> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if is_wav {
        return load_wav(path);
    }
    let (samples, sample_rate, channels) = decode_with_symphonia(path)?;
    AudioSignal::from_interleaved(&samples, channels, sample_rate).map_err(|source| {
        DecodeError::Signal {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn read_wav_samples<R: std::io::Read>(reader: hound::WavReader<R>) -> Result<Vec<f32>, hound::Error> {
    let spec = reader.spec();
    match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect(),
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect()
        }
    }
}

fn decode_with_symphonia(path: &Path) -> Result<(Vec<f32>, u32, u16), DecodeError> {
    let codec_err = |message: String| DecodeError::Codec {
        path: path.to_path_buf(),
        message,
    };
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| codec_err(format!("probe failed: {err}")))?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| codec_err("no default track".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| codec_err("missing sample rate".to_string()))?;
    let mut channels = codec_params.channels.map(|c| c.count() as u16).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|err| codec_err(format!("decoder setup failed: {err}")))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(err) => return Err(codec_err(format!("packet read failed: {err}"))),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(Error::DecodeError(err)) => {
                tracing::debug!("Skipping undecodable packet in {}: {err}", path.display());
                continue;
            }
            Err(err) => return Err(codec_err(format!("decode failed: {err}"))),
        };
        let spec = *audio_buf.spec();
        if channels == 0 {
            channels = spec.channels.count() as u16;
        }
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    if samples.is_empty() {
        return Err(codec_err("decoded 0 samples".to_string()));
    }
    Ok((samples, sample_rate, channels.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn int16_wav_is_scaled_to_unit_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..4 {
            writer.write_sample(16_384_i16).unwrap();
            writer.write_sample(-16_384_i16).unwrap();
        }
        writer.finalize().unwrap();

        let signal = load_file(&path).unwrap();
        assert_eq!(signal.sample_rate(), 8_000);
        assert_eq!(signal.len(), 4);
        assert!(signal.samples().iter().all(|s| s.abs() < 1e-9));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_wav(Path::new("/nonexistent/voice.wav")).unwrap_err();
        assert!(err.to_string().contains("voice.wav"));
    }
}
