// Waveform and cable-path geometry for a test outcome.
//
// Positions are fractions of cable length in [0, 1). Amplitudes are
// normalized so the outgoing pulse peaks at 1.0 above the baseline.
use super::error::{DomainError, DomainResult};
use super::metrics::seeded_unit_at;
use super::outcome::TestOutcome;
use serde::Serialize;
use std::f64::consts::PI;

pub const DEFAULT_PHASE_PERIOD: u64 = 100;
pub const DEFAULT_SEGMENT_COUNT: usize = 20;

const PULSE_WIDTH: f64 = 0.05;
const OUTBOUND_PEAK: f64 = 1.0;
const REFLECTED_PEAK: f64 = 0.75;
const SPIKE_HALF_WIDTH: f64 = 0.025;
const SPIKE_PEAK: f64 = 1.5;
const SPIKE_FREQUENCY: f64 = 300.0;
const NOISE_SPAN: f64 = 0.075;

// cable-path geometry, in percent of cable length
const FAULT_HIGHLIGHT: f64 = 5.0;
const PULSE_HIGHLIGHT: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveformSample {
    pub position: f64,
    pub amplitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformFrame {
    pub phase: u64,
    pub samples: Vec<WaveformSample>,
}

#[derive(Debug, Clone, Copy)]
pub struct WaveformSampler {
    period: u64,
}

impl Default for WaveformSampler {
    fn default() -> Self {
        Self {
            period: DEFAULT_PHASE_PERIOD,
        }
    }
}

impl WaveformSampler {
    pub fn new(period: u64) -> DomainResult<Self> {
        if period == 0 {
            return Err(DomainError::invalid("phase period must be positive"));
        }
        Ok(Self { period })
    }

    /// Where the incident pulse front sits for a given phase, in [0, 1)
    pub fn travel_front(&self, phase: u64) -> f64 {
        (phase % self.period) as f64 / self.period as f64
    }

    pub fn sample(
        &self,
        outcome: &TestOutcome,
        phase: u64,
        sample_count: usize,
    ) -> DomainResult<WaveformFrame> {
        if sample_count == 0 {
            return Err(DomainError::invalid("sample count must be positive"));
        }

        let front = self.travel_front(phase);
        let fault = outcome.fault_fraction();
        let faulted = outcome.has_fault();

        let samples = (0..sample_count)
            .map(|i| {
                let position = i as f64 / sample_count as f64;
                let mut amplitude = 0.0;

                if position < front && front < fault {
                    amplitude = bump(front - position) * OUTBOUND_PEAK;
                }

                if faulted && front >= fault {
                    // the echo heads back toward the source
                    let echo = 2.0 * fault - front;
                    if position >= echo {
                        amplitude = -bump(position - echo) * REFLECTED_PEAK;
                    }
                }

                let offset = position - fault;
                if faulted && offset.abs() < SPIKE_HALF_WIDTH {
                    let intensity = 1.0 - offset.abs() / SPIKE_HALF_WIDTH;
                    amplitude = -SPIKE_PEAK * intensity * (offset * SPIKE_FREQUENCY).sin();
                }

                amplitude += (seeded_unit_at(phase, i as u64) - 0.5) * NOISE_SPAN;

                WaveformSample {
                    position,
                    amplitude,
                }
            })
            .collect();

        Ok(WaveformFrame { phase, samples })
    }
}

/// Half-sine bump over [0, PULSE_WIDTH); zero outside
fn bump(distance: f64) -> f64 {
    if !(0.0..PULSE_WIDTH).contains(&distance) {
        return 0.0;
    }
    ((1.0 - distance / PULSE_WIDTH) * PI).sin()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CableSegment {
    pub position: f64,
    pub fault: bool,
    pub pulse: bool,
    pub returning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CablePathFrame {
    pub tick: u64,
    pub pulse_position: f64,
    pub fault_location: Option<f64>,
    pub segments: Vec<CableSegment>,
}

/// Segment highlighting for the cable-path animation. The pulse walks out to
/// the fault and back (twice the fault location), then restarts.
pub fn cable_path_frame(
    outcome: &TestOutcome,
    tick: u64,
    segment_count: usize,
) -> DomainResult<CablePathFrame> {
    if segment_count == 0 {
        return Err(DomainError::invalid("segment count must be positive"));
    }

    let fault_location = outcome.fault_distance.map(|d| d / outcome.length * 100.0);
    let location = fault_location.unwrap_or(0.0);
    let cycle = (location * 2.0).ceil() as u64 + 1;
    let pulse = (tick % cycle) as f64;

    let segments = (0..segment_count)
        .map(|i| {
            let position = i as f64 * 100.0 / segment_count as f64;
            CableSegment {
                position,
                fault: fault_location.is_some() && (position - location).abs() < FAULT_HIGHLIGHT,
                pulse: (position - pulse).abs() < PULSE_HIGHLIGHT,
                returning: pulse > location
                    && (position - (location * 2.0 - pulse)).abs() < PULSE_HIGHLIGHT,
            }
        })
        .collect();

    Ok(CablePathFrame {
        tick,
        pulse_position: pulse,
        fault_location,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOISE_BOUND: f64 = NOISE_SPAN / 2.0 + 1e-12;

    fn sample_waveform(
        outcome: &TestOutcome,
        phase: u64,
        sample_count: usize,
    ) -> DomainResult<WaveformFrame> {
        WaveformSampler::default().sample(outcome, phase, sample_count)
    }

    fn faulted() -> TestOutcome {
        TestOutcome::new("Cat6 UTP", 100.0, Some(47.3), 73).unwrap()
    }

    fn clean() -> TestOutcome {
        TestOutcome::new("Fiber SM", 500.0, None, 98).unwrap()
    }

    #[test]
    fn test_sample_count_and_positions() {
        for count in [1, 2, 7, 600] {
            let frame = sample_waveform(&faulted(), 13, count).unwrap();
            assert_eq!(frame.samples.len(), count);
            assert_eq!(frame.samples[0].position, 0.0);
            assert!(frame.samples.last().unwrap().position < 1.0);
            assert!(frame.samples.windows(2).all(|w| w[0].position < w[1].position));
        }
    }

    #[test]
    fn test_zero_samples_rejected() {
        assert!(matches!(
            sample_waveform(&clean(), 0, 0),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_frames_are_reproducible() {
        for phase in [0, 1, 57, 99, 100, 199] {
            let a = sample_waveform(&faulted(), phase, 300).unwrap();
            let b = sample_waveform(&faulted(), phase, 300).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_noise_varies_by_position_at_large_phase() {
        // front is back at the source, so only noise remains
        let phase = 100 * (1u64 << 55);
        let frame = sample_waveform(&clean(), phase, 8).unwrap();
        let mut amplitudes: Vec<u64> = frame.samples.iter().map(|s| s.amplitude.to_bits()).collect();
        amplitudes.sort_unstable();
        amplitudes.dedup();
        assert_eq!(amplitudes.len(), 8);
        assert!(frame.samples.iter().all(|s| s.amplitude.abs() <= NOISE_BOUND));
    }

    #[test]
    fn test_baseline_is_noise_only_before_launch() {
        let frame = sample_waveform(&clean(), 0, 600).unwrap();
        assert!(frame.samples.iter().all(|s| s.amplitude.abs() <= NOISE_BOUND));
    }

    #[test]
    fn test_clean_cable_has_no_reflection() {
        for phase in (0..100).step_by(5) {
            let frame = sample_waveform(&clean(), phase, 600).unwrap();
            assert!(
                frame.samples.iter().all(|s| s.amplitude >= -NOISE_BOUND),
                "phase {phase}"
            );
        }
    }

    #[test]
    fn test_outbound_pulse_trails_front() {
        let frame = sample_waveform(&clean(), 50, 600).unwrap();
        let peak = frame
            .samples
            .iter()
            .max_by(|a, b| a.amplitude.total_cmp(&b.amplitude))
            .unwrap();
        assert!(peak.position > 0.45 && peak.position < 0.5);
        assert!(peak.amplitude > 0.9);
        // nothing ahead of the front
        assert!(
            frame
                .samples
                .iter()
                .filter(|s| s.position >= 0.5)
                .all(|s| s.amplitude.abs() <= NOISE_BOUND)
        );
    }

    #[test]
    fn test_reflection_returns_after_fault() {
        // front at 0.8, fault at 0.473, echo back at 0.146
        let frame = sample_waveform(&faulted(), 80, 1000).unwrap();
        let trough = frame
            .samples
            .iter()
            .filter(|s| s.position < 0.4)
            .min_by(|a, b| a.amplitude.total_cmp(&b.amplitude))
            .unwrap();
        assert!(trough.position >= 0.146 && trough.position < 0.2);
        assert!(trough.amplitude < -0.65);
    }

    #[test]
    fn test_fault_spike_localized() {
        let frame = sample_waveform(&faulted(), 10, 1000).unwrap();
        let near: f64 = frame
            .samples
            .iter()
            .filter(|s| (s.position - 0.473).abs() < SPIKE_HALF_WIDTH)
            .map(|s| s.amplitude.abs())
            .fold(0.0, f64::max);
        assert!(near > 1.0);
        let far = frame
            .samples
            .iter()
            .filter(|s| s.position > 0.6)
            .all(|s| s.amplitude.abs() <= NOISE_BOUND);
        assert!(far);
    }

    #[test]
    fn test_phase_wraps_with_period() {
        let sampler = WaveformSampler::default();
        assert_eq!(sampler.travel_front(25), sampler.travel_front(125));
        assert!(WaveformSampler::new(0).is_err());
        assert_eq!(WaveformSampler::new(40).unwrap().travel_front(50), 0.25);
    }

    #[test]
    fn test_cable_path_clean_cable_idle() {
        let frame = cable_path_frame(&clean(), 37, DEFAULT_SEGMENT_COUNT).unwrap();
        assert_eq!(frame.segments.len(), 20);
        assert_eq!(frame.pulse_position, 0.0);
        assert_eq!(frame.fault_location, None);
        assert!(frame.segments.iter().all(|s| !s.fault && !s.returning));
        assert!(frame.segments[0].pulse);
    }

    #[test]
    fn test_cable_path_marks_fault_and_echo() {
        let outcome = faulted();
        let frame = cable_path_frame(&outcome, 60, DEFAULT_SEGMENT_COUNT).unwrap();
        let faults: Vec<f64> = frame
            .segments
            .iter()
            .filter(|s| s.fault)
            .map(|s| s.position)
            .collect();
        assert_eq!(faults, vec![45.0, 50.0]);
        // pulse at 60 is past the fault at 47.3, echo sits at 34.6
        assert!(frame.segments.iter().any(|s| s.returning && s.position == 30.0));
        assert!(frame.segments.iter().any(|s| s.pulse && s.position == 55.0));

        // cycle is ceil(94.6) + 1 = 96 ticks
        let wrapped = cable_path_frame(&outcome, 96 + 60, DEFAULT_SEGMENT_COUNT).unwrap();
        assert_eq!(wrapped.pulse_position, 60.0);
    }

    #[test]
    fn test_cable_path_zero_segments_rejected() {
        assert!(cable_path_frame(&faulted(), 0, 0).is_err());
    }
}
