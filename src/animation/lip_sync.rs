// Mouth openness from the loudness of a live audio signal.

use crate::audio::FrequencyTap;
use crate::avatar::ExpressionManager;
use crate::settings::LipSyncSettings;

/// Map a byte magnitude buffer to a mouth-open weight in `[0, 1]`.
pub fn mouth_volume(buffer: &[u8], reference_level: f32, gain: f32) -> f32 {
    if buffer.is_empty() || reference_level <= 0.0 {
        return 0.0;
    }
    let sum: u32 = buffer.iter().map(|&b| b as u32).sum();
    let average = sum as f32 / buffer.len() as f32;
    ((average / reference_level) * gain).clamp(0.0, 1.0)
}

/// Analysis graph plus its fixed-size magnitude buffer.
pub struct AudioAnalysisState {
    tap: Box<dyn FrequencyTap>,
    buffer: Vec<u8>,
}

impl AudioAnalysisState {
    pub fn new(tap: Box<dyn FrequencyTap>) -> Self {
        let buffer = vec![0; tap.bin_count()];
        Self { tap, buffer }
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}

pub struct LipSyncAnalyzer {
    state: Option<AudioAnalysisState>,
    reference_level: f32,
    gain: f32,
    channel: String,
}

impl LipSyncAnalyzer {
    pub fn new(settings: &LipSyncSettings) -> Self {
        Self {
            state: None,
            reference_level: settings.reference_level,
            gain: settings.gain,
            channel: settings.channel.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&AudioAnalysisState> {
        self.state.as_ref()
    }

    /// Install a new analysis graph, closing any previous one.
    pub fn setup(&mut self, tap: Box<dyn FrequencyTap>) {
        if let Some(mut old) = self.state.take() {
            log::info!("Replacing existing lip-sync analysis graph");
            old.tap.close();
        }
        self.state = Some(AudioAnalysisState::new(tap));
    }

    /// Sample the graph once and write the mouth channel. Returns the written volume.
    pub fn step(&mut self, expressions: &mut ExpressionManager) -> Option<f32> {
        let state = self.state.as_mut()?;
        if !expressions.has(&self.channel) {
            return None;
        }
        state.tap.byte_frequency_data(&mut state.buffer);
        let volume = mouth_volume(&state.buffer, self.reference_level, self.gain);
        expressions.set_value(&self.channel, volume);
        Some(volume)
    }

    pub fn teardown(&mut self) {
        if let Some(mut state) = self.state.take() {
            state.tap.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::expression::{BLINK, MOUTH_A};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Flat {
        level: u8,
        bins: usize,
        closed: Rc<Cell<bool>>,
    }

    impl FrequencyTap for Flat {
        fn bin_count(&self) -> usize {
            self.bins
        }

        fn byte_frequency_data(&mut self, out: &mut [u8]) {
            out.fill(self.level);
        }

        fn close(&mut self) {
            self.closed.set(true);
        }
    }

    fn flat(level: u8) -> (Box<Flat>, Rc<Cell<bool>>) {
        let closed = Rc::new(Cell::new(false));
        (
            Box::new(Flat {
                level,
                bins: 128,
                closed: closed.clone(),
            }),
            closed,
        )
    }

    #[test]
    fn volume_boundaries() {
        assert_eq!(mouth_volume(&[255; 128], 128.0, 1.5), 1.0);
        assert_eq!(mouth_volume(&[0; 128], 128.0, 1.5), 0.0);
        assert_eq!(mouth_volume(&[], 128.0, 1.5), 0.0);
        let half = mouth_volume(&[64; 128], 128.0, 1.5);
        assert!((half - 0.75).abs() < 1e-6);
    }

    #[test]
    fn step_writes_mouth_channel() {
        let mut lip = LipSyncAnalyzer::new(&LipSyncSettings::default());
        let mut e = ExpressionManager::new([MOUTH_A]);
        assert_eq!(lip.step(&mut e), None);

        lip.setup(flat(32).0);
        let v = lip.step(&mut e).unwrap();
        assert!((v - 0.375).abs() < 1e-6);
        assert_eq!(e.value(MOUTH_A), Some(v));
        assert_eq!(lip.state().unwrap().buffer().len(), 128);
    }

    #[test]
    fn missing_channel_is_a_no_op() {
        let mut lip = LipSyncAnalyzer::new(&LipSyncSettings::default());
        lip.setup(flat(255).0);
        let mut e = ExpressionManager::new([BLINK]);
        assert_eq!(lip.step(&mut e), None);
    }

    #[test]
    fn second_setup_replaces_and_closes_the_first() {
        let mut lip = LipSyncAnalyzer::new(&LipSyncSettings::default());
        let (first, first_closed) = flat(0);
        let (second, second_closed) = flat(255);
        lip.setup(first);
        lip.setup(second);
        assert!(first_closed.get());
        assert!(!second_closed.get());

        let mut e = ExpressionManager::new([MOUTH_A]);
        assert_eq!(lip.step(&mut e), Some(1.0));

        lip.teardown();
        assert!(second_closed.get());
        assert!(!lip.is_configured());
    }
}
