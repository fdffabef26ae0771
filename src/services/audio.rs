//! Ljuduppspelning av syntetiserat tal

use async_trait::async_trait;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use tokio::sync::Mutex;
use tracing::debug;

use crate::utils::{AppError, AppResult};

/// Samplingsfrekvens för TTS-svaren
pub const TTS_SAMPLE_RATE: u32 = 24_000;
pub const TTS_CHANNELS: u16 = 1;

/// Tolka rå PCM16 little-endian. En udda sista byte ignoreras.
pub fn decode_pcm16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Speltid för en PCM16-buffert i TTS-formatet
pub fn pcm16_duration(bytes: &[u8]) -> std::time::Duration {
    let samples = (bytes.len() / 2) as f64 / f64::from(TTS_CHANNELS);
    std::time::Duration::from_secs_f64(samples / f64::from(TTS_SAMPLE_RATE))
}

#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Spela upp rå PCM16 och returnera när uppspelningen är klar
    async fn play(&self, pcm: Vec<u8>) -> AppResult<()>;
}

/// Standardhögtalaren. En uppspelning i taget; strömmen öppnas per uppspelning
/// och stängs när den är klar.
#[derive(Debug, Default)]
pub struct SpeakerOutput {
    device: Mutex<()>,
}

impl SpeakerOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

fn play_blocking(samples: Vec<i16>) -> AppResult<()> {
    let (_stream, handle) = OutputStream::try_default()
        .map_err(|e| AppError::audio(format!("Ingen ljudenhet: {}", e)))?;
    let sink = Sink::try_new(&handle)
        .map_err(|e| AppError::audio(format!("Kunde inte öppna uppspelning: {}", e)))?;

    sink.append(SamplesBuffer::new(TTS_CHANNELS, TTS_SAMPLE_RATE, samples));
    sink.sleep_until_end();
    Ok(())
}

#[async_trait]
impl AudioOutput for SpeakerOutput {
    async fn play(&self, pcm: Vec<u8>) -> AppResult<()> {
        let samples = decode_pcm16(&pcm);
        if samples.is_empty() {
            return Ok(());
        }

        let _device = self.device.lock().await;
        debug!("Spelar upp {:?} ljud", pcm16_duration(&pcm));

        tokio::task::spawn_blocking(move || play_blocking(samples))
            .await
            .map_err(|e| AppError::audio(format!("Uppspelningen avbröts: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_decode_pcm16_little_endian() {
        let bytes = [0x01, 0x00, 0xff, 0x7f, 0x00, 0x80];
        assert_eq!(decode_pcm16(&bytes), vec![1, i16::MAX, i16::MIN]);
    }

    #[test]
    fn test_decode_pcm16_drops_odd_byte() {
        assert_eq!(decode_pcm16(&[0x02, 0x00, 0x05]), vec![2]);
        assert!(decode_pcm16(&[0x05]).is_empty());
        assert!(decode_pcm16(&[]).is_empty());
    }

    #[test]
    fn test_duration() {
        let one_second = vec![0u8; 48_000];
        assert_eq!(pcm16_duration(&one_second), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_empty_audio_is_noop() {
        let speaker = SpeakerOutput::new();
        assert!(speaker.play(vec![0x01]).await.is_ok());
    }
}
