use crate::CONFY_APP_NAME;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub initial_position: [f32; 3],
    pub initial_target: [f32; 3],
    /// Added to the head position when framing a freshly loaded character.
    pub head_offset: [f32; 3],
    pub background: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 30.0,
            near: 0.1,
            far: 20.0,
            initial_position: [0.0, 1.0, 5.0],
            initial_target: [0.0, 1.0, 0.0],
            head_offset: [0.0, 0.05, 0.9],
            background: [0.08, 0.08, 0.1],
        }
    }
}

impl CameraSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "camera").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "camera", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlinkSettings {
    pub duration: f32,
    pub min_interval: f32,
    pub interval_jitter: f32,
}

impl Default for BlinkSettings {
    fn default() -> Self {
        Self {
            duration: 0.15,
            min_interval: 2.0,
            interval_jitter: 8.0,
        }
    }
}

impl BlinkSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "blink").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "blink", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LipSyncSettings {
    pub fft_size: usize,
    pub smoothing: f32,
    pub min_decibels: f32,
    pub max_decibels: f32,
    pub reference_level: f32,
    pub gain: f32,
    pub channel: String,
}

impl Default for LipSyncSettings {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            reference_level: 128.0,
            gain: 1.5,
            channel: "a".to_string(),
        }
    }
}

impl LipSyncSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "lip_sync").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "lip_sync", self);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSettings {
    /// Locators offered by the asset picker, in display order.
    pub known: Vec<AssetEntry>,
    pub startup: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    pub label: String,
    pub locator: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            known: vec![
                AssetEntry {
                    label: "Hana".to_string(),
                    locator: "models/hana.rig.json".to_string(),
                },
                AssetEntry {
                    label: "Minsu".to_string(),
                    locator: "models/minsu.rig.json".to_string(),
                },
            ],
            startup: None,
        }
    }
}

impl AssetSettings {
    pub fn load() -> Self {
        confy::load(CONFY_APP_NAME, "assets").unwrap_or_default()
    }

    pub fn save(&self) {
        let _ = confy::store(CONFY_APP_NAME, "assets", self);
    }

    /// Explicit start-up locator, else the first known asset.
    pub fn startup_locator(&self) -> Option<&str> {
        self.startup
            .as_deref()
            .or_else(|| self.known.first().map(|e| e.locator.as_str()))
    }
}

// Aggregate struct for convenience
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub camera: CameraSettings,
    pub blink: BlinkSettings,
    pub lip_sync: LipSyncSettings,
    pub assets: AssetSettings,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            camera: CameraSettings::load(),
            blink: BlinkSettings::load(),
            lip_sync: LipSyncSettings::load(),
            assets: AssetSettings::load(),
        }
    }

    /// Write every section back, creating the config files on first run.
    pub fn save(&self) {
        self.camera.save();
        self.blink.save();
        self.lip_sync.save();
        self.assets.save();
    }
}
