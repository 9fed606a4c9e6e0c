//! A WAV clip replayed at wall-clock pace, so it can stand in for live audio.

use std::path::Path;
use std::time::{Duration, Instant};

use super::source::AudioSource;
use crate::error::AvatarError;

pub struct ClipSource {
    samples: Vec<f32>,
    sample_rate: u32,
    cursor: usize,
    started: Option<Instant>,
}

impl ClipSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AvatarError> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path)
            .map_err(|e| AvatarError::from(e).with_arg("path", path.display()))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect::<Vec<_>>();

        log::info!(
            "Loaded clip {}: {:.2}s at {} Hz",
            path.display(),
            samples.len() as f32 / spec.sample_rate as f32,
            spec.sample_rate
        );
        Ok(Self::from_samples(samples, spec.sample_rate))
    }

    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            cursor: 0,
            started: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.samples.len()
    }

    /// Release everything due `elapsed` after playback started.
    fn pull_until(&mut self, elapsed: Duration, sink: &mut Vec<f32>) {
        let due = (elapsed.as_secs_f64() * self.sample_rate as f64) as usize;
        let due = due.min(self.samples.len());
        if due > self.cursor {
            sink.extend_from_slice(&self.samples[self.cursor..due]);
            self.cursor = due;
        }
    }
}

impl AudioSource for ClipSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn pull(&mut self, sink: &mut Vec<f32>) {
        let started = *self.started.get_or_insert_with(Instant::now);
        self.pull_until(started.elapsed(), sink);
    }

    fn close(&mut self) {
        self.cursor = self.samples.len();
    }
}
