// Audio tap-in for lip-sync: sources, the spectrum analyser and the graph joining them.

pub mod analyser;
pub mod capture;
pub mod clip;
pub mod source;

pub use analyser::SpectrumAnalyser;
pub use capture::MicrophoneSource;
pub use clip::ClipSource;
pub use source::{AudioGraph, AudioSource, FrequencyTap};
