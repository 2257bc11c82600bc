use std::f32::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const AMBIENT_FORCE: f32 = 0.02;

/// Synthetic breath signal: alternating inhale swells and quiet exhales.
///
/// Each breath draws its own length and peak so the force stream looks like
/// an irregular human breath rather than a pure sine.
#[derive(Debug)]
pub(crate) struct BreathWaveform {
    rng: ChaCha8Rng,
    noise: f32,
    tick: u32,
    inhale_ticks: u32,
    breath_ticks: u32,
    peak: f32,
}

impl BreathWaveform {
    /// Creates a waveform seeded for reproducible runs.
    ///
    /// Negative or non-finite noise amplitudes disable the noise.
    pub(crate) fn new(seed: u64, noise: f32) -> Self {
        let mut waveform = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            noise: if noise.is_finite() { noise.max(0.0) } else { 0.0 },
            tick: 0,
            inhale_ticks: 0,
            breath_ticks: 0,
            peak: 0.0,
        };
        waveform.next_breath();
        waveform
    }

    /// Produces the force sample of the next tick.
    pub(crate) fn next_sample(&mut self) -> f32 {
        if self.tick >= self.breath_ticks {
            self.next_breath();
        }

        let base = if self.tick < self.inhale_ticks {
            let phase = self.tick as f32 / self.inhale_ticks as f32;
            AMBIENT_FORCE + self.peak * (PI * phase).sin()
        } else {
            AMBIENT_FORCE
        };
        self.tick += 1;

        let jitter = if self.noise > 0.0 {
            self.rng.gen_range(-self.noise..self.noise)
        } else {
            0.0
        };
        (base + jitter).max(0.0)
    }

    fn next_breath(&mut self) {
        self.tick = 0;
        self.inhale_ticks = self.rng.gen_range(24..48);
        self.breath_ticks = self.inhale_ticks + self.rng.gen_range(18..40);
        self.peak = self.rng.gen_range(0.45..0.9);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_never_negative() {
        let mut waveform = BreathWaveform::new(3, 0.1);
        assert!((0..5_000).all(|_| waveform.next_sample() >= 0.0));
    }

    #[test]
    fn every_breath_swells_and_settles() {
        let mut waveform = BreathWaveform::new(9, 0.0);
        let samples: Vec<f32> = (0..600).map(|_| waveform.next_sample()).collect();
        let strong = samples.iter().filter(|force| **force > 0.3).count();
        let quiet = samples.iter().filter(|force| **force < 0.2).count();
        assert!(strong > 100);
        assert!(quiet > 100);
    }

    #[test]
    fn non_finite_noise_is_ignored() {
        let mut noisy = BreathWaveform::new(11, f32::INFINITY);
        let mut clean = BreathWaveform::new(11, 0.0);
        for _ in 0..256 {
            assert_eq!(noisy.next_sample().to_bits(), clean.next_sample().to_bits());
        }
        let mut undefined = BreathWaveform::new(11, f32::NAN);
        assert!((0..256).all(|_| undefined.next_sample().is_finite()));
    }

    #[test]
    fn identical_seeds_produce_identical_breaths() {
        let mut first = BreathWaveform::new(5, 0.05);
        let mut second = BreathWaveform::new(5, 0.05);
        for _ in 0..256 {
            assert_eq!(first.next_sample().to_bits(), second.next_sample().to_bits());
        }
    }
}
