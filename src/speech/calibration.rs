use std::time::Duration;

/// Audio is consumed in buffers of this many frames.
const FRAMES_PER_BUFFER: usize = 4096;
const INITIAL_ENERGY_THRESHOLD: f64 = 300.0;
/// Fraction of the old threshold kept after one second of audio.
const ENERGY_DAMPING: f64 = 0.15;
const ENERGY_RATIO: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    /// Energy (16-bit RMS scale) above which audio is considered speech.
    pub energy_threshold: f64,
    /// Samples consumed while listening to the ambient noise.
    pub consumed: usize,
}

/// Listen to the start of the clip for `duration` and derive the ambient energy
/// threshold. The consumed samples are not part of the recorded sample.
pub fn calibrate_ambient_noise(samples: &[f32], sample_rate: u32, duration: Duration) -> Calibration {
    let seconds_per_buffer = FRAMES_PER_BUFFER as f64 / f64::from(sample_rate.max(1));
    let damping = ENERGY_DAMPING.powf(seconds_per_buffer);

    let mut energy_threshold = INITIAL_ENERGY_THRESHOLD;
    let mut consumed = 0;
    let mut elapsed = 0.0;

    for buffer in samples.chunks(FRAMES_PER_BUFFER) {
        elapsed += seconds_per_buffer;
        if elapsed > duration.as_secs_f64() {
            break;
        }
        let target = rms_energy(buffer) * ENERGY_RATIO;
        energy_threshold = energy_threshold * damping + target * (1.0 - damping);
        consumed += buffer.len();
    }

    Calibration {
        energy_threshold,
        consumed,
    }
}

/// Root mean square of the buffer, on a 16-bit sample scale.
fn rms_energy(buffer: &[f32]) -> f64 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = buffer
        .iter()
        .map(|s| {
            let scaled = f64::from(*s) * f64::from(i16::MAX);
            scaled * scaled
        })
        .sum();
    (sum_squares / buffer.len() as f64).sqrt()
}
