//! Live microphone input through cpal.

use std::collections::VecDeque;
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use parking_lot::Mutex;

use super::source::AudioSource;
use crate::error::AvatarError;

type SampleQueue = Arc<Mutex<VecDeque<f32>>>;

pub struct MicrophoneSource {
    stream: Option<Stream>,
    queue: SampleQueue,
    sample_rate: u32,
}

impl MicrophoneSource {
    /// Open the default input device and start capturing immediately.
    pub fn open_default() -> Result<Self, AvatarError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| AvatarError::new("no-input-device"))?;
        let supported = device.default_input_config()?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels as usize;

        // Roughly one second of backlog; older audio is useless for lip-sync.
        let capacity = sample_rate as usize;
        let queue: SampleQueue = Arc::new(Mutex::new(VecDeque::with_capacity(capacity)));

        let err_fn = |err: cpal::StreamError| log::error!("Audio input stream error: {}", err);
        let stream = match sample_format {
            SampleFormat::F32 => {
                let queue = queue.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        push_mono(&queue, data, channels, capacity, |s| s);
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::I16 => {
                let queue = queue.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        push_mono(&queue, data, channels, capacity, |s| s as f32 / 32768.0);
                    },
                    err_fn,
                    None,
                )?
            }
            SampleFormat::U16 => {
                let queue = queue.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[u16], _: &cpal::InputCallbackInfo| {
                        push_mono(&queue, data, channels, capacity, |s| {
                            (s as f32 - 32768.0) / 32768.0
                        });
                    },
                    err_fn,
                    None,
                )?
            }
            other => {
                return Err(AvatarError::new("unsupported-sample-format")
                    .with_arg("format", format!("{other:?}")));
            }
        };
        stream.play()?;

        log::info!(
            "Microphone capture started: {} Hz, {} channel(s), {:?}",
            sample_rate,
            channels,
            sample_format
        );

        Ok(Self {
            stream: Some(stream),
            queue,
            sample_rate,
        })
    }
}

/// Down-mix interleaved frames to mono and append, dropping the oldest
/// samples once `capacity` is reached.
fn push_mono<T: Copy>(
    queue: &Mutex<VecDeque<f32>>,
    data: &[T],
    channels: usize,
    capacity: usize,
    to_f32: impl Fn(T) -> f32,
) {
    let channels = channels.max(1);
    let mut queue = queue.lock();
    for frame in data.chunks(channels) {
        let sum: f32 = frame.iter().map(|&s| to_f32(s)).sum();
        if queue.len() >= capacity {
            queue.pop_front();
        }
        queue.push_back(sum / frame.len() as f32);
    }
}

impl AudioSource for MicrophoneSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn pull(&mut self, sink: &mut Vec<f32>) {
        sink.extend(self.queue.lock().drain(..));
    }

    fn close(&mut self) {
        if self.stream.take().is_some() {
            log::info!("Microphone capture stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_frames_are_averaged() {
        let queue = Mutex::new(VecDeque::new());
        push_mono(&queue, &[1.0f32, 0.0, 0.5, 0.5], 2, 16, |s| s);
        assert_eq!(queue.lock().iter().copied().collect::<Vec<_>>(), vec![0.5, 0.5]);
    }

    #[test]
    fn backlog_is_bounded() {
        let queue = Mutex::new(VecDeque::new());
        let data: Vec<i16> = (0..10).map(|i| i * 100).collect();
        push_mono(&queue, &data, 1, 4, |s| s as f32);
        let kept: Vec<f32> = queue.lock().iter().copied().collect();
        assert_eq!(kept, vec![600.0, 700.0, 800.0, 900.0]);
    }
}
