use super::analyser::SpectrumAnalyser;
use crate::error::AvatarError;
use crate::settings::LipSyncSettings;

/// A live, mono sample producer that can be tapped for analysis.
pub trait AudioSource {
    fn sample_rate(&self) -> u32;

    /// Move every sample produced since the last call into `sink`.
    fn pull(&mut self, sink: &mut Vec<f32>);

    /// Release the device or stream behind this source.
    fn close(&mut self) {}
}

/// Anything that can fill a per-frame frequency-magnitude buffer.
pub trait FrequencyTap {
    fn bin_count(&self) -> usize;

    fn byte_frequency_data(&mut self, out: &mut [u8]);

    fn close(&mut self) {}
}

/// An audio source wired into a spectrum analyser.
pub struct AudioGraph {
    source: Box<dyn AudioSource>,
    analyser: SpectrumAnalyser,
    pending: Vec<f32>,
    closed: bool,
}

impl AudioGraph {
    pub fn connect(
        source: Box<dyn AudioSource>,
        settings: &LipSyncSettings,
    ) -> Result<Self, AvatarError> {
        let analyser = SpectrumAnalyser::new(settings)?;
        log::debug!(
            "Audio graph connected: {} Hz, {} bins",
            source.sample_rate(),
            analyser.bin_count()
        );
        Ok(Self {
            source,
            analyser,
            pending: Vec::new(),
            closed: false,
        })
    }
}

impl FrequencyTap for AudioGraph {
    fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) {
        if !self.closed {
            self.pending.clear();
            self.source.pull(&mut self.pending);
            self.analyser.push_samples(&self.pending);
        }
        self.analyser.byte_frequency_data(out);
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.source.close();
            log::debug!("Audio graph closed");
        }
    }
}

impl Drop for AudioGraph {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Constant {
        level: f32,
        closed: Rc<Cell<u32>>,
    }

    impl AudioSource for Constant {
        fn sample_rate(&self) -> u32 {
            8000
        }

        fn pull(&mut self, sink: &mut Vec<f32>) {
            sink.extend(std::iter::repeat_n(self.level, 64));
        }

        fn close(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    #[test]
    fn graph_feeds_source_samples_into_the_analyser() {
        let closed = Rc::new(Cell::new(0));
        let mut graph = AudioGraph::connect(
            Box::new(Constant { level: 0.5, closed: closed.clone() }),
            &LipSyncSettings::default(),
        )
        .unwrap();
        let mut out = vec![0u8; graph.bin_count()];
        for _ in 0..8 {
            graph.byte_frequency_data(&mut out);
        }
        assert!(out.iter().any(|&b| b > 0));
    }

    #[test]
    fn close_is_idempotent_and_runs_on_drop() {
        let closed = Rc::new(Cell::new(0));
        let mut graph = AudioGraph::connect(
            Box::new(Constant { level: 0.0, closed: closed.clone() }),
            &LipSyncSettings::default(),
        )
        .unwrap();
        graph.close();
        graph.close();
        drop(graph);
        assert_eq!(closed.get(), 1);
    }
}
