use std::collections::BTreeMap;

pub const BLINK: &str = "blink";
pub const MOUTH_A: &str = "a";

/// Named facial-expression weights, each kept in `[0, 1]`.
///
/// Only channels the asset declares exist; writes to anything else are
/// dropped so a model without a mouth preset simply never opens its mouth.
#[derive(Debug, Clone, Default)]
pub struct ExpressionManager {
    channels: BTreeMap<String, f32>,
}

impl ExpressionManager {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: names.into_iter().map(|n| (n.into(), 0.0)).collect(),
        }
    }

    /// Returns `false` when the channel does not exist.
    pub fn set_value(&mut self, name: &str, value: f32) -> bool {
        match self.channels.get_mut(name) {
            Some(slot) => {
                *slot = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
                true
            }
            None => {
                log::trace!("Expression channel '{}' not present, write skipped", name);
                false
            }
        }
    }

    pub fn value(&self, name: &str) -> Option<f32> {
        self.channels.get(name).copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }
}
