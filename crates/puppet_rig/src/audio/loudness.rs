//! Microphone loudness metering

use crate::config::LoudnessConfig;

/// Loudness of the most recent block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Loudness {
    /// Smoothed level in dB
    pub db: f32,
    /// Smoothed level mapped from the floor..0 dB range to 0..1
    pub level: f32,
    /// Whether the smoothed level is above the threshold
    pub loud: bool,
    /// How far above the threshold, saturating 20 dB above it (0..1)
    pub confidence: f32,
}

/// RMS energy meter with exponential smoothing
#[derive(Clone, Debug)]
pub struct LoudnessMeter {
    config: LoudnessConfig,
    smoothed_db: f32,
}

impl LoudnessMeter {
    pub fn new(config: LoudnessConfig) -> Self {
        let smoothed_db = config.floor_db;
        Self {
            config,
            smoothed_db,
        }
    }

    /// Feed a block of samples in -1..1
    ///
    /// An empty block leaves the smoothed level unchanged.
    pub fn process(&mut self, samples: &[f32]) -> Loudness {
        if !samples.is_empty() {
            let block_db = rms_db(samples, self.config.floor_db);
            let k = self.config.smoothing.clamp(0.0, 1.0);
            self.smoothed_db = k * block_db + (1.0 - k) * self.smoothed_db;
        }
        self.current()
    }

    /// Loudness as of the last block
    pub fn current(&self) -> Loudness {
        let floor = self.config.floor_db;
        let level = if floor < 0.0 {
            ((self.smoothed_db - floor) / -floor).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let above = self.smoothed_db - self.config.threshold_db;

        Loudness {
            db: self.smoothed_db,
            level,
            loud: above > 0.0,
            confidence: if above > 0.0 { (above / 20.0).min(1.0) } else { 0.0 },
        }
    }

    /// Return to silence
    pub fn reset(&mut self) {
        self.smoothed_db = self.config.floor_db;
    }
}

impl Default for LoudnessMeter {
    fn default() -> Self {
        Self::new(LoudnessConfig::default())
    }
}

/// RMS level of a block in dB, never below `floor_db`
pub fn rms_db(samples: &[f32], floor_db: f32) -> f32 {
    if samples.is_empty() {
        return floor_db;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    let rms = (sum_sq / samples.len() as f32).sqrt();
    if rms > 0.0 {
        (20.0 * rms.log10()).max(floor_db)
    } else {
        floor_db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_db() {
        assert_eq!(rms_db(&[0.0; 64], -100.0), -100.0);
        assert!((rms_db(&[1.0, -1.0, 1.0, -1.0], -100.0)).abs() < 1e-5);
        assert!((rms_db(&[0.1; 32], -100.0) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_silence_is_quiet() {
        let mut meter = LoudnessMeter::default();
        let loudness = meter.process(&[0.0; 256]);
        assert!(!loudness.loud);
        assert_eq!(loudness.level, 0.0);
        assert_eq!(loudness.confidence, 0.0);
    }

    #[test]
    fn test_smoothing_ramps_toward_block_level() {
        let mut meter = LoudnessMeter::default();
        let first = meter.process(&[0.5; 256]);
        let second = meter.process(&[0.5; 256]);
        assert!(second.db > first.db);
        // One block at smoothing 0.3 from -100 toward about -6 dB
        assert!((first.db - (0.3 * rms_db(&[0.5], -100.0) + 0.7 * -100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_sustained_signal_becomes_loud() {
        let mut meter = LoudnessMeter::default();
        let mut loudness = meter.current();
        for _ in 0..20 {
            loudness = meter.process(&[0.5; 256]);
        }
        assert!(loudness.loud);
        assert_eq!(loudness.confidence, 1.0);
        assert!(loudness.level > 0.9);

        meter.reset();
        assert!(!meter.current().loud);
    }

    #[test]
    fn test_empty_block_keeps_level() {
        let mut meter = LoudnessMeter::default();
        let before = meter.process(&[0.5; 16]);
        assert_eq!(meter.process(&[]), before);
    }
}
