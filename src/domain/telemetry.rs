// Telemetry data domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    R,
    S,
    T,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::R, Phase::S, Phase::T];
}

/// Inclusive numeric domain a reading must fall into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const VOLTAGE_RANGE: Range = Range::new(210.0, 230.0);
pub const CURRENT_RANGE: Range = Range::new(1.0, 3.0);
pub const FREQUENCY_RANGE: Range = Range::new(59.8, 60.2);
/// Upper bound on power added to an active dock per tick
pub const POWER_STEP_MAX: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseReading {
    pub phase: Phase,
    pub voltage: f64,
    pub current: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DockReading {
    pub dock: u32,
    pub active: bool,
    pub power_kwh: f64,
    pub frequency_hz: f64,
}

/// One atomic tick of the realtime feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySample {
    pub seq: u64,
    pub taken_at: DateTime<Utc>,
    pub phases: Vec<PhaseReading>,
    pub docks: Vec<DockReading>,
}

impl TelemetrySample {
    pub fn active_docks(&self) -> usize {
        self.docks.iter().filter(|d| d.active).count()
    }

    pub fn total_power_kwh(&self) -> f64 {
        self.docks.iter().map(|d| d.power_kwh).sum()
    }

    /// True when every reading lies inside its declared domain
    pub fn within_domain(&self) -> bool {
        let phases_ok = self
            .phases
            .iter()
            .all(|p| VOLTAGE_RANGE.contains(p.voltage) && CURRENT_RANGE.contains(p.current));
        let docks_ok = self.docks.iter().all(|d| {
            if d.active {
                d.power_kwh >= 0.0 && FREQUENCY_RANGE.contains(d.frequency_hz)
            } else {
                d.power_kwh == 0.0 && d.frequency_hz == 0.0
            }
        });
        phases_ok && docks_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    pub dock: u32,
    pub labels: Vec<String>,
    pub power: Vec<f64>,
    pub water: Vec<f64>,
    pub frequency_avg: f64,
}

impl HistoryReport {
    pub fn total_power(&self) -> f64 {
        self.power.iter().sum()
    }

    pub fn total_water(&self) -> f64 {
        self.water.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(docks: Vec<DockReading>) -> TelemetrySample {
        TelemetrySample {
            seq: 1,
            taken_at: Utc::now(),
            phases: Phase::ALL
                .iter()
                .map(|&phase| PhaseReading {
                    phase,
                    voltage: 220.0,
                    current: 1.5,
                })
                .collect(),
            docks,
        }
    }

    #[test]
    fn test_inactive_dock_must_be_zeroed() {
        let ok = sample(vec![DockReading {
            dock: 1,
            active: false,
            power_kwh: 0.0,
            frequency_hz: 0.0,
        }]);
        assert!(ok.within_domain());

        let stale = sample(vec![DockReading {
            dock: 1,
            active: false,
            power_kwh: 1.2,
            frequency_hz: 0.0,
        }]);
        assert!(!stale.within_domain());
    }

    #[test]
    fn test_totals() {
        let s = sample(vec![
            DockReading { dock: 1, active: true, power_kwh: 1.5, frequency_hz: 60.0 },
            DockReading { dock: 2, active: false, power_kwh: 0.0, frequency_hz: 0.0 },
        ]);
        assert_eq!(s.active_docks(), 1);
        assert_eq!(s.total_power_kwh(), 1.5);
    }
}
