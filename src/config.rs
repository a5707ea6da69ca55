//! Player configuration.
//!
//! Every field has a default, so the page can pass `{}` (or nothing) to
//! `mount` and get the stock widget. Field names are camelCase on the JS
//! side.

use serde::Deserialize;

use crate::error::ConfigError;

/// Tunable constants for the widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Path of the track fetched once at startup.
    pub asset_url: String,
    /// DOM id of the disk image.
    pub disk_element_id: String,
    /// CSS class marking the disk as not spinning.
    pub paused_class: String,
    /// Upper bound of the disk edge length, in CSS pixels.
    pub max_disk_size: f64,
    /// Share of the viewport width the disk may take.
    pub disk_viewport_fraction: f64,
    /// |delta| in radians above which a move event gets a light haptic pulse.
    pub haptic_threshold: f64,
    /// Playback rate per radian of angular delta while scratching.
    pub rate_per_radian: f64,
    /// Scratch filter center frequency at rest, in Hz.
    pub scratch_base_hz: f64,
    /// Added scratch filter frequency per radian of |delta|.
    pub scratch_hz_per_radian: f64,
    /// Scratch filter frequency while the record is held under the finger.
    pub grab_hz: f64,
    pub scratch_q: f64,
    /// Cutoff of the playback low-pass filter.
    pub lowpass_cutoff_hz: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            asset_url: "/audio/track.mp3".to_string(),
            disk_element_id: "platinumDisk".to_string(),
            paused_class: "paused".to_string(),
            max_disk_size: 600.0,
            disk_viewport_fraction: 0.9,
            haptic_threshold: 0.1,
            rate_per_radian: 10.0,
            scratch_base_hz: 1000.0,
            scratch_hz_per_radian: 2000.0,
            grab_hz: 2000.0,
            scratch_q: 10.0,
            lowpass_cutoff_hz: 1000.0,
        }
    }
}

impl PlayerConfig {
    /// Parse a JSON object, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlayerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asset_url.is_empty() {
            return Err(ConfigError::Empty { field: "assetUrl" });
        }
        if self.disk_element_id.is_empty() {
            return Err(ConfigError::Empty { field: "diskElementId" });
        }
        if self.paused_class.is_empty() {
            return Err(ConfigError::Empty { field: "pausedClass" });
        }

        let fraction = self.disk_viewport_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "diskViewportFraction",
                value: fraction,
            });
        }

        let positive = [
            ("maxDiskSize", self.max_disk_size),
            ("scratchBaseHz", self.scratch_base_hz),
            ("grabHz", self.grab_hz),
            ("scratchQ", self.scratch_q),
            ("lowpassCutoffHz", self.lowpass_cutoff_hz),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("hapticThreshold", self.haptic_threshold),
            ("scratchHzPerRadian", self.scratch_hz_per_radian),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        if !self.rate_per_radian.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "ratePerRadian",
                value: self.rate_per_radian,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = PlayerConfig::from_json("{}").unwrap();
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(config.asset_url, "/audio/track.mp3");
        assert_eq!(config.disk_element_id, "platinumDisk");
    }

    #[test]
    fn camel_case_fields_override() {
        let config =
            PlayerConfig::from_json(r#"{"assetUrl": "/audio/other.mp3", "maxDiskSize": 420}"#)
                .unwrap();
        assert_eq!(config.asset_url, "/audio/other.mp3");
        assert_eq!(config.max_disk_size, 420.0);
        assert_eq!(config.rate_per_radian, 10.0);
    }

    #[test]
    fn rejects_fraction_above_one() {
        let err = PlayerConfig::from_json(r#"{"diskViewportFraction": 1.5}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "diskViewportFraction",
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_element_id() {
        let err = PlayerConfig::from_json(r#"{"diskElementId": ""}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Empty { field: "diskElementId" }));
    }

    #[test]
    fn rejects_zero_cutoff() {
        let config = PlayerConfig {
            lowpass_cutoff_hz: 0.0,
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_invalid() {
        let err = PlayerConfig::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
