use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::VitalsError;

/// The sampling pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    /// Process CPU utilization
    Cpu,
    /// Garbage-collection pause utilization
    Gc,
    /// Heap snapshot
    Memory,
    /// Machine-wide CPU utilization
    System,
}

impl SamplerKind {
    /// Process-level sampler kinds in registration order, the default set
    pub const ALL: [Self; 3] = [Self::Cpu, Self::Gc, Self::Memory];

    /// Lowercase name used in logs and serialized output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Gc => "gc",
            Self::Memory => "memory",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for SamplerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplerKind {
    type Err = VitalsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "gc" => Ok(Self::Gc),
            "memory" | "mem" | "heap" => Ok(Self::Memory),
            "system" | "machine" => Ok(Self::System),
            other => Err(VitalsError::Config(format!(
                "unknown sampler '{other}' (expected cpu, gc, memory or system)"
            ))),
        }
    }
}

/// Utilization of the normalized capacity over one interval.
///
/// Stored in tenths of a percent, always within `0..=1000`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "f64", try_from = "f64")]
pub struct Utilization(u16);

impl Utilization {
    /// Upper bound of the raw value (100.0%)
    pub const MAX_RAW: u16 = 1000;

    /// 0.0%
    pub const ZERO: Self = Self(0);

    /// 100.0%
    pub const FULL: Self = Self(Self::MAX_RAW);

    /// Build from tenths of a percent, clamping anything above 1000
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        if raw > Self::MAX_RAW {
            Self::FULL
        } else {
            Self(raw)
        }
    }

    /// Tenths of a percent
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Percentage in `[0.0, 100.0]`
    #[must_use]
    pub fn percent(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Fraction of capacity in `[0.0, 1.0]`
    #[must_use]
    pub fn ratio(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX_RAW)
    }
}

impl From<Utilization> for f64 {
    fn from(value: Utilization) -> Self {
        value.percent()
    }
}

impl TryFrom<f64> for Utilization {
    type Error = String;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(percent: f64) -> Result<Self, Self::Error> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(format!("utilization {percent} outside 0.0..=100.0"));
        }
        Ok(Self::from_raw((percent * 10.0).round() as u16))
    }
}

impl std::fmt::Display for Utilization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::format::format_percent(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_clamps() {
        assert_eq!(Utilization::from_raw(1500), Utilization::FULL);
        assert_eq!(Utilization::from_raw(500).percent(), 50.0);
        assert_eq!(Utilization::from_raw(1).percent(), 0.1);
    }

    #[test]
    fn test_serializes_as_percent() {
        let json = serde_json::to_string(&Utilization::from_raw(425)).unwrap();
        assert_eq!(json, "42.5");
        let parsed: Utilization = serde_json::from_str("42.5").unwrap();
        assert_eq!(parsed.raw(), 425);
        assert!(serde_json::from_str::<Utilization>("101.0").is_err());
    }

    #[test]
    fn test_sampler_kind_parse() {
        assert_eq!("CPU".parse::<SamplerKind>().unwrap(), SamplerKind::Cpu);
        assert_eq!("heap".parse::<SamplerKind>().unwrap(), SamplerKind::Memory);
        assert_eq!("machine".parse::<SamplerKind>().unwrap(), SamplerKind::System);
        assert!("disk".parse::<SamplerKind>().is_err());
        assert_eq!(SamplerKind::Gc.to_string(), "gc");
    }
}
