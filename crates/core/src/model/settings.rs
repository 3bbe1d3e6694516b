use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be between 5 and 3600 seconds, got {0}")]
    InvalidTimeLimit(u32),

    #[error("bonus time limit must be between 5 and 3600 seconds, got {0}")]
    InvalidBonusTimeLimit(u32),

    #[error("shape run size must be between 1 and 8, got {0}")]
    InvalidShapeRunSize(usize),

    #[error("shape draw cap must be at least the run size")]
    InvalidDrawCap,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

const TIME_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 5..=3600;
const RUN_SIZE_RANGE: std::ops::RangeInclusive<usize> = 1..=8;

/// Tutor-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorSettings {
    time_limit_secs: u32,
    bonus_time_limit_secs: u32,
    shape_run_size: usize,
    shape_draw_cap: usize,
    seed: Option<u64>,
}

/// Unvalidated settings, filled from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct TutorSettingsDraft {
    pub time_limit_secs: Option<u32>,
    pub bonus_time_limit_secs: Option<u32>,
    pub shape_run_size: Option<usize>,
    pub shape_draw_cap: Option<usize>,
    pub seed: Option<u64>,
}

impl TutorSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills gaps with defaults and validates.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if any value is out of range.
    pub fn validate(self) -> Result<TutorSettings, SettingsError> {
        let defaults = TutorSettings::default();
        TutorSettings::new(
            self.time_limit_secs.unwrap_or(defaults.time_limit_secs),
            self.bonus_time_limit_secs
                .unwrap_or(defaults.bonus_time_limit_secs),
            self.shape_run_size.unwrap_or(defaults.shape_run_size),
            self.shape_draw_cap.unwrap_or(defaults.shape_draw_cap),
            self.seed,
        )
    }
}

impl TutorSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a time limit is outside 5..=3600 seconds, the
    /// run size is outside 1..=8, or the draw cap is smaller than the run size.
    pub fn new(
        time_limit_secs: u32,
        bonus_time_limit_secs: u32,
        shape_run_size: usize,
        shape_draw_cap: usize,
        seed: Option<u64>,
    ) -> Result<Self, SettingsError> {
        if !TIME_LIMIT_RANGE.contains(&time_limit_secs) {
            return Err(SettingsError::InvalidTimeLimit(time_limit_secs));
        }
        if !TIME_LIMIT_RANGE.contains(&bonus_time_limit_secs) {
            return Err(SettingsError::InvalidBonusTimeLimit(bonus_time_limit_secs));
        }
        if !RUN_SIZE_RANGE.contains(&shape_run_size) {
            return Err(SettingsError::InvalidShapeRunSize(shape_run_size));
        }
        if shape_draw_cap < shape_run_size {
            return Err(SettingsError::InvalidDrawCap);
        }
        Ok(Self {
            time_limit_secs,
            bonus_time_limit_secs,
            shape_run_size,
            shape_draw_cap,
            seed,
        })
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn bonus_time_limit_secs(&self) -> u32 {
        self.bonus_time_limit_secs
    }

    #[must_use]
    pub fn shape_run_size(&self) -> usize {
        self.shape_run_size
    }

    #[must_use]
    pub fn shape_draw_cap(&self) -> usize {
        self.shape_draw_cap
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for TutorSettings {
    /// 3 minutes per problem, 5 for bonus tasks, 4 shapes per run.
    fn default() -> Self {
        Self {
            time_limit_secs: 180,
            bonus_time_limit_secs: 300,
            shape_run_size: 4,
            shape_draw_cap: 100,
            seed: None,
        }
    }
}
