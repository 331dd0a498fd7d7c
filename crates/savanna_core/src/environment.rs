//! Global conditions: time of day and weather.
//!
//! Both are owned by the driver and advanced once per step. Organisms only
//! ever read them.

use crate::config::WeatherConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HOURS_PER_DAY: u8 = 24;

/// A half-open hour range `[start, end)` that may wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start: u8,
    pub end: u8,
}

impl HourWindow {
    #[must_use]
    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, hour: u8) -> bool {
        if self.start <= self.end {
            hour >= self.start && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

/// Wrapping 0..24 hour counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Clock {
    hour: u8,
}

impl Clock {
    /// # Panics
    /// If `hour` is not a valid hour of the day.
    #[must_use]
    pub fn at(hour: u8) -> Self {
        assert!(hour < HOURS_PER_DAY, "hour {hour} out of range");
        Self { hour }
    }

    /// Restarts the day at `fixed`, or at a random hour when `None`.
    pub fn reset<R: Rng>(&mut self, fixed: Option<u8>, rng: &mut R) {
        self.hour = match fixed {
            Some(hour) => hour % HOURS_PER_DAY,
            None => rng.gen_range(0..HOURS_PER_DAY),
        };
    }

    pub fn tick(&mut self) {
        self.hour = (self.hour + 1) % HOURS_PER_DAY;
    }

    #[must_use]
    pub fn hour(&self) -> u8 {
        self.hour
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.hour)
    }
}

/// Bounded random walk over temperature, plus fresh visibility and rain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature: i32,
    pub visibility: i32,
    pub rain: bool,
    config: WeatherConfig,
}

impl Weather {
    pub fn new<R: Rng>(config: WeatherConfig, rng: &mut R) -> Self {
        let temperature = rng.gen_range(config.min_temp..=config.max_temp);
        let visibility = rng.gen_range(config.min_visibility..=config.max_visibility);
        let rain = rng.gen_bool(config.rain_probability);
        Self {
            temperature,
            visibility,
            rain,
            config,
        }
    }

    /// Fixed conditions, for scripted scenarios.
    #[must_use]
    pub fn fixed(config: WeatherConfig, temperature: i32, visibility: i32, rain: bool) -> Self {
        Self {
            temperature: temperature.clamp(config.min_temp, config.max_temp),
            visibility: visibility.clamp(config.min_visibility, config.max_visibility),
            rain,
            config,
        }
    }

    /// Advances the weather by one step.
    ///
    /// Temperature moves by -1, 0 or +1; a move that would leave
    /// `[min_temp, max_temp]` is redrawn. A temperature set outside the
    /// bounds by hand is pulled back to the nearest bound first.
    pub fn change<R: Rng>(&mut self, rng: &mut R) {
        let (lo, hi) = (self.config.min_temp, self.config.max_temp);
        self.temperature = self.temperature.clamp(lo, hi);
        if lo == hi {
            self.temperature = lo;
        } else {
            loop {
                let next = self.temperature + rng.gen_range(-1..=1);
                if (lo..=hi).contains(&next) {
                    self.temperature = next;
                    break;
                }
            }
        }
        self.visibility =
            rng.gen_range(self.config.min_visibility..=self.config.max_visibility);
        self.rain = rng.gen_bool(self.config.rain_probability);
    }

    #[must_use]
    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°C, visibility {:+}{}",
            self.temperature,
            self.visibility,
            if self.rain { ", raining" } else { "" }
        )
    }
}
