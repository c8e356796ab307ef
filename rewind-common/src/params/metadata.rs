//! Setting metadata definitions

use super::{SettingMetadata, GRACE_SECONDS, REWIND_SECONDS};

impl SettingMetadata {
    /// Metadata for every rewind setting
    ///
    /// Both settings share the same bounds: a value below one second makes
    /// the rewind imperceptible, a value above ten replays most of a section.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use rewind_common::params::SettingMetadata;
    /// let grace = SettingMetadata::all()
    ///     .iter()
    ///     .find(|m| m.key == "grace_seconds")
    ///     .unwrap();
    ///
    /// assert_eq!(grace.default_value, 1.5);
    /// assert!(grace.parse("11").is_err());
    /// ```
    pub fn all() -> &'static [SettingMetadata] {
        &[
            SettingMetadata {
                key: REWIND_SECONDS,
                label: "Rewind Time",
                description: "The amount of time (in seconds) to rewind when a miss occurs",
                default_value: 3.0,
                min: 1.0,
                max: 10.0,
                step: 0.1,
            },
            SettingMetadata {
                key: GRACE_SECONDS,
                label: "Invulnerable Time",
                description: "The amount of time (in seconds) to prevent rewinding when a miss occurs",
                default_value: 1.5,
                min: 1.0,
                max: 10.0,
                step: 0.1,
            },
        ]
    }
}
