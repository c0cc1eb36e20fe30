use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use futures::{Stream, StreamExt};

const BYTES_PER_SAMPLE: usize = 2;
const WAV_HEADER_LEN: usize = 44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Bytes in one sample per channel.
    pub fn frame_bytes(&self) -> usize {
        self.channels.max(1) as usize * BYTES_PER_SAMPLE
    }

    pub fn bytes_per_second(&self) -> usize {
        self.sample_rate as usize * self.channels as usize * BYTES_PER_SAMPLE
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::new(44_100, 1)
    }
}

/// Captured 16-bit PCM audio, interleaved by channel.
#[derive(Debug, Clone)]
pub struct Recording {
    pub format: PcmFormat,
    pub samples: Vec<i16>,
}

impl Recording {
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / self.format.channels.max(1) as usize;
        Duration::from_secs_f64(frames as f64 / self.format.sample_rate.max(1) as f64)
    }

    /// RIFF/WAVE container around the samples.
    pub fn to_wav(&self) -> Bytes {
        let data_len = (self.samples.len() * BYTES_PER_SAMPLE) as u32;
        let block_align = self.format.channels * BYTES_PER_SAMPLE as u16;
        let byte_rate = self.format.sample_rate * block_align as u32;

        let mut wav = BytesMut::with_capacity(WAV_HEADER_LEN + data_len as usize);
        wav.put_slice(b"RIFF");
        wav.put_u32_le(36 + data_len);
        wav.put_slice(b"WAVE");
        wav.put_slice(b"fmt ");
        wav.put_u32_le(16);
        wav.put_u16_le(1); // PCM
        wav.put_u16_le(self.format.channels);
        wav.put_u32_le(self.format.sample_rate);
        wav.put_u32_le(byte_rate);
        wav.put_u16_le(block_align);
        wav.put_u16_le(16);
        wav.put_slice(b"data");
        wav.put_u32_le(data_len);
        for sample in &self.samples {
            wav.put_i16_le(*sample);
        }
        wav.freeze()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("audio stream failed: {0}")]
    Stream(String),
    #[error("no audio was captured")]
    Empty,
}

/// Accumulates little-endian s16 PCM from a byte stream.
///
/// Capture stops when the stream ends, when `max_duration` of wall-clock
/// time has passed, or once the byte cap for that duration is reached.
pub struct PcmRecorder {
    format: PcmFormat,
    max_duration: Duration,
}

impl PcmRecorder {
    pub fn new(format: PcmFormat, max_duration: Duration) -> Self {
        Self {
            format,
            max_duration,
        }
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn max_bytes(&self) -> usize {
        let bytes = (self.format.bytes_per_second() as f64 * self.max_duration.as_secs_f64()) as usize;
        bytes - bytes % self.format.frame_bytes()
    }

    pub async fn record<S, E>(&self, stream: S) -> Result<Recording, RecordingError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let max_bytes = self.max_bytes();
        let mut buffer = BytesMut::with_capacity(max_bytes.min(1 << 20));
        let deadline = tokio::time::sleep(self.max_duration);
        tokio::pin!(deadline);
        tokio::pin!(stream);

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    tracing::debug!("Recording window elapsed");
                    break;
                }
                next = stream.next() => match next {
                    Some(Ok(chunk)) => {
                        let remaining = max_bytes - buffer.len();
                        if chunk.len() >= remaining {
                            buffer.put_slice(&chunk[..remaining]);
                            tracing::debug!("Recording byte cap reached");
                            break;
                        }
                        buffer.put_slice(&chunk);
                    }
                    Some(Err(e)) => {
                        tracing::error!(error = %e, bytes = buffer.len(), "Audio stream aborted");
                        return Err(RecordingError::Stream(e.to_string()));
                    }
                    None => break,
                },
            }
        }

        // drop a trailing partial frame
        let usable = buffer.len() - buffer.len() % self.format.frame_bytes();
        if usable == 0 {
            return Err(RecordingError::Empty);
        }

        let samples: Vec<i16> = buffer[..usable]
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let recording = Recording {
            format: self.format,
            samples,
        };
        tracing::info!(
            samples = recording.samples.len(),
            seconds = recording.duration().as_secs_f32(),
            "Recording captured"
        );
        Ok(recording)
    }
}
