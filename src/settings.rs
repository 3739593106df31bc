//! Session rules and audio preferences
//!
//! Read once at startup; never written back.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Rules for drawing a new session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRules {
    /// Shortest session (seconds, inclusive)
    pub min_secs: u32,
    /// Longest session (seconds, inclusive)
    pub max_secs: u32,
    /// Lowest session id (inclusive)
    pub id_min: u32,
    /// Highest session id (inclusive)
    pub id_max: u32,
    /// Horizontal launch speed bound (pixels/s)
    pub max_vx: i32,
    /// Vertical launch speed bound (pixels/s)
    pub max_vy: i32,
    /// Countdown period (milliseconds)
    pub tick_period_ms: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            min_secs: SESSION_MIN_SECS,
            max_secs: SESSION_MAX_SECS,
            id_min: SESSION_ID_MIN,
            id_max: SESSION_ID_MAX,
            max_vx: LAUNCH_MAX_VX,
            max_vy: LAUNCH_MAX_VY,
            tick_period_ms: TICK_PERIOD_MS,
        }
    }
}

impl SessionRules {
    /// Countdown period as a `Duration`
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.tick_period_ms))
    }

    /// Reject empty or nonsensical ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_secs == 0 || self.min_secs > self.max_secs || self.max_secs > i32::MAX as u32
        {
            return Err(SettingsError::InvalidRange {
                field: "session length",
                min: self.min_secs.into(),
                max: self.max_secs.into(),
            });
        }
        if self.id_min > self.id_max || self.id_max > i32::MAX as u32 {
            return Err(SettingsError::InvalidRange {
                field: "session id",
                min: self.id_min.into(),
                max: self.id_max.into(),
            });
        }
        if self.max_vx < 0 {
            return Err(SettingsError::InvalidRange {
                field: "horizontal speed",
                min: -i64::from(self.max_vx),
                max: self.max_vx.into(),
            });
        }
        if self.max_vy < 0 {
            return Err(SettingsError::InvalidRange {
                field: "vertical speed",
                min: -i64::from(self.max_vy),
                max: self.max_vy.into(),
            });
        }
        if self.tick_period_ms == 0 {
            return Err(SettingsError::InvalidPeriod);
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How sessions are drawn and counted down
    pub session: SessionRules,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Ambient clock loop volume (0.0 - 1.0)
    pub ambient_volume: f32,
    /// Start muted
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: SessionRules::default(),
            master_volume: 0.8,
            ambient_volume: 0.6,
            muted: false,
        }
    }
}

impl Settings {
    /// Element holding inline settings JSON (wasm)
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "settings";

    /// Environment variable holding settings JSON (native)
    #[allow(dead_code)]
    const ENV_VAR: &'static str = "BOUNCE_CLOCK_SETTINGS";

    /// Parse and validate a settings document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.session.validate()?;
        for (field, value) in [
            ("master_volume", self.master_volume),
            ("ambient_volume", self.ambient_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::InvalidVolume { field, value });
            }
        }
        Ok(())
    }

    /// Effective ambient loop gain
    pub fn effective_ambient_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.ambient_volume
        }
    }

    fn from_source(source: Option<String>) -> Self {
        let Some(json) = source else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from the inline `<script id="settings">` element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());
        Self::from_source(json)
    }

    /// Load settings from the environment (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_source(std::env::var(Self::ENV_VAR).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = Settings::from_json(r#"{"session": {"min_secs": 5, "max_secs": 9}}"#)
            .expect("valid settings");
        assert_eq!(settings.session.min_secs, 5);
        assert_eq!(settings.session.max_secs, 9);
        assert_eq!(settings.session.id_min, SESSION_ID_MIN);
        assert_eq!(settings.session.tick_period_ms, TICK_PERIOD_MS);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_empty_length_range_rejected() {
        let err = Settings::from_json(r#"{"session": {"min_secs": 20, "max_secs": 10}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidRange {
                field: "session length",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_length_rejected() {
        let rules = SessionRules {
            min_secs: 0,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_negative_speed_bound_rejected() {
        let err = Settings::from_json(r#"{"session": {"max_vx": -2147483648}}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidRange {
                field: "horizontal speed",
                min: 2147483648,
                ..
            }
        ));

        let err = Settings::from_json(r#"{"session": {"max_vy": -5}}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidRange {
                field: "vertical speed",
                ..
            }
        ));

        assert_eq!(
            Settings::from_source(Some(r#"{"session": {"max_vy": -2147483648}}"#.into())),
            Settings::default()
        );
    }

    #[test]
    fn test_zero_period_rejected() {
        let err = Settings::from_json(r#"{"session": {"tick_period_ms": 0}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidPeriod));
    }

    #[test]
    fn test_bad_volume_rejected() {
        let err = Settings::from_json(r#"{"master_volume": 1.5}"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidVolume {
                field: "master_volume",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Json(_))
        ));
        assert_eq!(
            Settings::from_source(Some("{not json".into())),
            Settings::default()
        );
    }

    #[test]
    fn test_muted_silences_ambient() {
        let mut settings = Settings::default();
        assert!((settings.effective_ambient_volume() - 0.48).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_ambient_volume(), 0.0);
    }
}
