// Streaming waveform service - Drives the animation phase and pushes frames
use crate::domain::error::DomainResult;
use crate::domain::outcome::TestOutcome;
use crate::domain::waveform::{WaveformFrame, WaveformSampler};
use crate::infrastructure::config::WaveformConfig;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

const FRAME_BUFFER: usize = 16;

#[derive(Clone)]
pub struct WaveformStreamingService {
    sampler: WaveformSampler,
    tick_interval: Duration,
    phase_wrap: u64,
}

impl WaveformStreamingService {
    pub fn new(config: &WaveformConfig) -> DomainResult<Self> {
        Ok(Self {
            sampler: WaveformSampler::new(config.period)?,
            tick_interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            phase_wrap: config.phase_wrap.max(1),
        })
    }

    pub fn sampler(&self) -> WaveformSampler {
        self.sampler
    }

    /// Spawns the tick source. Frames stop when `ticks` is reached or the
    /// receiver is dropped.
    pub fn stream_waveform(
        &self,
        outcome: TestOutcome,
        sample_count: usize,
        ticks: Option<u64>,
    ) -> DomainResult<mpsc::Receiver<WaveformFrame>> {
        // surface a bad sample count before spawning anything
        self.sampler.sample(&outcome, 0, sample_count)?;

        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let sampler = self.sampler;
        let phase_wrap = self.phase_wrap;
        let interval = tokio::time::interval(self.tick_interval);

        tokio::spawn(async move {
            let mut intervals = IntervalStream::new(interval);
            let mut phase = 0u64;
            let mut sent = 0u64;

            while intervals.next().await.is_some() {
                if ticks.is_some_and(|limit| sent >= limit) {
                    break;
                }
                let frame = match sampler.sample(&outcome, phase, sample_count) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("Waveform sampling failed: {}", e);
                        break;
                    }
                };
                if tx.send(frame).await.is_err() {
                    tracing::debug!("Waveform receiver dropped after {} frames", sent);
                    break;
                }
                sent += 1;
                phase = (phase + 1) % phase_wrap;
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WaveformConfig {
        WaveformConfig {
            tick_interval_ms: 1,
            phase_wrap: 3,
            ..WaveformConfig::default()
        }
    }

    fn outcome() -> TestOutcome {
        TestOutcome::new("Cat6 UTP", 100.0, Some(47.3), 73).unwrap()
    }

    #[tokio::test]
    async fn test_streams_bounded_frames_with_wrapping_phase() {
        let service = WaveformStreamingService::new(&config()).unwrap();
        let mut rx = service.stream_waveform(outcome(), 64, Some(5)).unwrap();

        let mut phases = Vec::new();
        while let Some(frame) = rx.recv().await {
            assert_eq!(frame.samples.len(), 64);
            phases.push(frame.phase);
        }
        assert_eq!(phases, vec![0, 1, 2, 0, 1]);
    }

    #[tokio::test]
    async fn test_streamed_frames_match_pure_sampler() {
        let service = WaveformStreamingService::new(&config()).unwrap();
        let mut rx = service.stream_waveform(outcome(), 32, Some(2)).unwrap();

        while let Some(frame) = rx.recv().await {
            let expected = service.sampler().sample(&outcome(), frame.phase, 32).unwrap();
            assert_eq!(frame, expected);
        }
    }

    #[tokio::test]
    async fn test_zero_samples_rejected_up_front() {
        let service = WaveformStreamingService::new(&config()).unwrap();
        assert!(service.stream_waveform(outcome(), 0, None).is_err());
    }
}
