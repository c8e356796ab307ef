//! Practice chart: hit-object times plus the scripted misses
//!
//! ```toml
//! objects = [1000, 1400, 1800, 2200]
//!
//! [[misses]]
//! index = 2
//! times = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// A chart and the player script to run against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Hit-object times (milliseconds, ascending)
    pub objects: Vec<f64>,

    /// Objects the scripted player misses
    #[serde(default)]
    pub misses: Vec<ScriptedMiss>,
}

/// Miss object `index` on its first `times` attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedMiss {
    pub index: usize,
    #[serde(default = "default_times")]
    pub times: u32,
}

fn default_times() -> u32 {
    1
}

impl ScriptedMiss {
    /// Parse `INDEX` or `INDEX:TIMES`
    pub fn parse(text: &str) -> Result<Self> {
        let bad = || Error::Chart(format!("invalid miss '{}', expected INDEX[:TIMES]", text));
        let (index, times) = match text.split_once(':') {
            Some((i, t)) => (i, Some(t)),
            None => (text, None),
        };

        let index = index.trim().parse().map_err(|_| bad())?;
        let times = match times {
            Some(t) => t.trim().parse().map_err(|_| bad())?,
            None => default_times(),
        };
        Ok(Self { index, times })
    }
}

impl Chart {
    /// Evenly spaced objects starting at `offset_ms`
    pub fn generate(count: usize, interval_ms: f64, offset_ms: f64) -> Self {
        Self {
            objects: (0..count)
                .map(|i| offset_ms + i as f64 * interval_ms)
                .collect(),
            misses: Vec::new(),
        }
    }

    pub fn with_misses(mut self, misses: Vec<ScriptedMiss>) -> Self {
        self.misses = misses;
        self
    }

    pub fn parse(content: &str) -> Result<Self> {
        let chart: Chart =
            toml::from_str(content).map_err(|e| Error::Chart(format!("parse error: {}", e)))?;
        chart.validate()?;
        Ok(chart)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.objects.is_empty() {
            return Err(Error::Chart("chart has no objects".to_string()));
        }

        if let Some(bad) = self.objects.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(Error::Chart(format!("invalid object time {}", bad)));
        }

        if self.objects.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::Chart("object times must be ascending".to_string()));
        }

        if let Some(miss) = self.misses.iter().find(|m| m.index >= self.objects.len()) {
            return Err(Error::Chart(format!(
                "miss index {} out of range (chart has {} objects)",
                miss.index,
                self.objects.len()
            )));
        }

        Ok(())
    }

    /// Time of the last object
    pub fn end_time_ms(&self) -> f64 {
        self.objects.last().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let chart = Chart::generate(4, 400.0, 1000.0);
        assert_eq!(chart.objects, vec![1000.0, 1400.0, 1800.0, 2200.0]);
        assert_eq!(chart.end_time_ms(), 2200.0);
        assert!(chart.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let chart = Chart::parse(
            r#"
            objects = [500.0, 900.0, 1300.0]

            [[misses]]
            index = 1
            times = 2

            [[misses]]
            index = 2
            "#,
        )
        .unwrap();
        assert_eq!(chart.objects.len(), 3);
        assert_eq!(
            chart.misses,
            vec![
                ScriptedMiss { index: 1, times: 2 },
                ScriptedMiss { index: 2, times: 1 },
            ]
        );
    }

    #[test]
    fn test_rejects_empty_chart() {
        assert!(matches!(Chart::parse("objects = []"), Err(Error::Chart(_))));
    }

    #[test]
    fn test_rejects_unsorted_objects() {
        assert!(Chart::parse("objects = [900.0, 500.0]").is_err());
    }

    #[test]
    fn test_rejects_miss_out_of_range() {
        let chart = Chart::generate(2, 100.0, 0.0).with_misses(vec![ScriptedMiss { index: 2, times: 1 }]);
        assert!(chart.validate().is_err());
    }

    #[test]
    fn test_parse_scripted_miss() {
        assert_eq!(ScriptedMiss::parse("7").unwrap(), ScriptedMiss { index: 7, times: 1 });
        assert_eq!(ScriptedMiss::parse("7:3").unwrap(), ScriptedMiss { index: 7, times: 3 });
        assert!(ScriptedMiss::parse("x:3").is_err());
        assert!(ScriptedMiss::parse("7:").is_err());
    }
}
