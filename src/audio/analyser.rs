//! Short-time spectrum analysis producing one byte magnitude per bin,
//! following the Web Audio `AnalyserNode` conventions.

use std::collections::VecDeque;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::AvatarError;
use crate::settings::LipSyncSettings;

pub struct SpectrumAnalyser {
    fft_size: usize,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    history: VecDeque<f32>,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    frame: Vec<Complex<f32>>,
}

impl SpectrumAnalyser {
    pub fn new(settings: &LipSyncSettings) -> Result<Self, AvatarError> {
        let fft_size = settings.fft_size;
        if fft_size < 32 || !fft_size.is_power_of_two() {
            return Err(AvatarError::new("bad-fft-size").with_arg("fft_size", fft_size));
        }
        if settings.max_decibels <= settings.min_decibels {
            return Err(AvatarError::new("bad-decibel-range")
                .with_arg("min", settings.min_decibels)
                .with_arg("max", settings.max_decibels));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(Self {
            fft_size,
            smoothing: settings.smoothing.clamp(0.0, 1.0),
            min_decibels: settings.min_decibels,
            max_decibels: settings.max_decibels,
            fft,
            window: blackman(fft_size),
            history: VecDeque::from(vec![0.0; fft_size]),
            smoothed: vec![0.0; fft_size / 2],
            scratch,
            frame: vec![Complex::new(0.0, 0.0); fft_size],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Append time-domain samples; only the newest `fft_size` are retained.
    pub fn push_samples(&mut self, samples: &[f32]) {
        let skip = samples.len().saturating_sub(self.fft_size);
        for &s in &samples[skip..] {
            if self.history.len() == self.fft_size {
                self.history.pop_front();
            }
            self.history.push_back(s);
        }
    }

    /// Analyse the current window into `out` (one byte per bin, extra slots untouched).
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        for (i, (slot, s)) in self.frame.iter_mut().zip(self.history.iter()).enumerate() {
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process_with_scratch(&mut self.frame, &mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        let range = self.max_decibels - self.min_decibels;
        for (bin, value) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.frame[bin].norm() * scale;
            *value = self.smoothing * *value + (1.0 - self.smoothing) * magnitude;
            if let Some(slot) = out.get_mut(bin) {
                let db = 20.0 * value.log10();
                let scaled = 255.0 * (db - self.min_decibels) / range;
                // log10(0) is -inf, which clamps to silence.
                *slot = if scaled.is_nan() { 0 } else { scaled.clamp(0.0, 255.0) as u8 };
            }
        }
    }
}

fn blackman(size: usize) -> Vec<f32> {
    let alpha = 0.16f32;
    let a0 = 0.5 * (1.0 - alpha);
    let a1 = 0.5;
    let a2 = 0.5 * alpha;
    (0..size)
        .map(|i| {
            let x = i as f32 / size as f32;
            a0 - a1 * (2.0 * std::f32::consts::PI * x).cos()
                + a2 * (4.0 * std::f32::consts::PI * x).cos()
        })
        .collect()
}
