//! Timetable configuration.
//!
//! All settings have defaults; a JSON document only needs the fields it
//! changes. Field names are camelCase.
//!
//! ```
//! use u_timetable::config::{DailySpread, TimetableConfig};
//!
//! let cfg = TimetableConfig::from_json_str(r#"{ "grid": { "lessonMinutes": 40 } }"#).unwrap();
//! assert_eq!(cfg.grid.lesson_minutes, 40);
//! assert_eq!(cfg.grid.break_minutes, 15);
//! assert_eq!(cfg.daily_spread, DailySpread::Balanced);
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TimetableError};
use crate::grid::{time_of_day, GridConfig, SlotGrid};

/// How strict allocation distributes a subject's lessons over the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DailySpread {
    /// At most `ceil(weekly_target / days)` lessons of a subject per class
    /// group per day. If that leaves the target short, the remaining lessons
    /// go first-fit without the cap.
    #[default]
    Balanced,
    /// First fit in grid order, no daily cap.
    Packed,
}

impl DailySpread {
    /// Per-day lesson cap for a weekly target spread over `days` days.
    ///
    /// `None` = uncapped.
    pub fn daily_cap(self, weekly_target: u32, days: usize) -> Option<u32> {
        match self {
            DailySpread::Packed => None,
            DailySpread::Balanced => {
                let days = days.max(1) as u32;
                Some(weekly_target.div_ceil(days).max(1))
            }
        }
    }
}

const SAMPLE_DAY_START: NaiveTime = time_of_day(8, 0);
const SAMPLE_DAY_END: NaiveTime = time_of_day(13, 20);

/// Settings for lenient sample generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleConfig {
    /// Periods used for sample lessons.
    pub grid: GridConfig,
    /// Chance that a class group has no lesson in a given period.
    pub free_period_probability: f64,
}

impl Default for SampleConfig {
    /// Six 45-minute periods from 08:00 with 10-minute breaks, 20% free periods.
    fn default() -> Self {
        Self {
            grid: GridConfig::new(SAMPLE_DAY_START, SAMPLE_DAY_END, 45, 10),
            free_period_probability: 0.2,
        }
    }
}

impl SampleConfig {
    /// Checks the sample grid and probability.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        if !(0.0..=1.0).contains(&self.free_period_probability) {
            return Err(TimetableError::Configuration(format!(
                "free period probability must be within [0, 1], got {}",
                self.free_period_probability
            )));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimetableConfig {
    /// Default grid for generation requests that do not override it.
    pub grid: GridConfig,
    pub daily_spread: DailySpread,
    /// Maximum candidate slots examined per generation run.
    pub iteration_budget: Option<usize>,
    pub sample: SampleConfig,
}

impl TimetableConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.sample.validate()?;
        if self.iteration_budget == Some(0) {
            return Err(TimetableError::Configuration(
                "iteration budget must be positive when set".into(),
            ));
        }
        Ok(())
    }

    /// Builds the default slot grid.
    pub fn slot_grid(&self) -> Result<SlotGrid> {
        SlotGrid::new(self.grid.clone())
    }

    /// Sets the default grid.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the daily spread policy.
    pub fn with_daily_spread(mut self, spread: DailySpread) -> Self {
        self.daily_spread = spread;
        self
    }

    /// Sets the iteration budget.
    pub fn with_iteration_budget(mut self, budget: usize) -> Self {
        self.iteration_budget = Some(budget);
        self
    }
}
