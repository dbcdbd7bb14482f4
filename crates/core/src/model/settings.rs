use thiserror::Error;

/// Limits applied when assembling view-state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplaySettings {
    weak_topic_limit: usize,
    entry_topic_limit: usize,
    path_preview_limit: usize,
}

#[derive(Clone, Debug, Default)]
pub struct DisplaySettingsDraft {
    pub weak_topic_limit: Option<usize>,
    pub entry_topic_limit: Option<usize>,
    pub path_preview_limit: Option<usize>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

impl DisplaySettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::ZeroLimit` if any supplied limit is zero.
    pub fn validate(self) -> Result<DisplaySettings, SettingsError> {
        let defaults = DisplaySettings::default();
        Ok(DisplaySettings {
            weak_topic_limit: non_zero(
                "weak_topic_limit",
                self.weak_topic_limit,
                defaults.weak_topic_limit,
            )?,
            entry_topic_limit: non_zero(
                "entry_topic_limit",
                self.entry_topic_limit,
                defaults.entry_topic_limit,
            )?,
            path_preview_limit: non_zero(
                "path_preview_limit",
                self.path_preview_limit,
                defaults.path_preview_limit,
            )?,
        })
    }
}

impl DisplaySettings {
    /// Topics shown in the dashboard-wide weak-topic summary.
    #[must_use]
    pub fn weak_topic_limit(&self) -> usize {
        self.weak_topic_limit
    }

    /// Topics shown per quiz entry before "+N more".
    #[must_use]
    pub fn entry_topic_limit(&self) -> usize {
        self.entry_topic_limit
    }

    /// Path entries shown before "and N more".
    #[must_use]
    pub fn path_preview_limit(&self) -> usize {
        self.path_preview_limit
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            weak_topic_limit: 5,
            entry_topic_limit: 2,
            path_preview_limit: 8,
        }
    }
}

fn non_zero(
    field: &'static str,
    value: Option<usize>,
    default: usize,
) -> Result<usize, SettingsError> {
    match value {
        Some(0) => Err(SettingsError::ZeroLimit(field)),
        Some(v) => Ok(v),
        None => Ok(default),
    }
}
