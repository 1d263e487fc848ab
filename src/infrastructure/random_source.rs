// Randomised stand-ins for the marina meters
use crate::application::telemetry_source::{HistorySource, TelemetrySource};
use crate::domain::dock::{DeviceSwitch, Dock};
use crate::domain::telemetry::{
    CURRENT_RANGE, DockReading, FREQUENCY_RANGE, HistoryReport, POWER_STEP_MAX, Phase, PhaseReading,
    TelemetrySample, VOLTAGE_RANGE,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const ACTIVE_PROBABILITY: f64 = 0.7;
const HOURS: usize = 24;

fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

pub struct RandomTelemetrySource {
    rng: StdRng,
    power: Vec<f64>,
}

impl RandomTelemetrySource {
    pub fn new(docks: u32) -> Self {
        Self::with_rng(docks, StdRng::from_entropy())
    }

    /// Deterministic source for tests and demos
    pub fn seeded(docks: u32, seed: u64) -> Self {
        Self::with_rng(docks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(docks: u32, rng: StdRng) -> Self {
        Self {
            rng,
            power: vec![0.0; docks as usize],
        }
    }
}

impl TelemetrySource for RandomTelemetrySource {
    fn name(&self) -> &str {
        "random"
    }

    fn next_sample(&mut self, seq: u64) -> TelemetrySample {
        let phases = Phase::ALL
            .iter()
            .map(|&phase| PhaseReading {
                phase,
                voltage: self.rng.gen_range(VOLTAGE_RANGE.min..=VOLTAGE_RANGE.max).round(),
                current: round_to(self.rng.gen_range(CURRENT_RANGE.min..CURRENT_RANGE.max), 2),
            })
            .collect();

        let rng = &mut self.rng;
        let docks = self
            .power
            .iter_mut()
            .enumerate()
            .map(|(idx, power)| {
                let active = rng.gen_bool(ACTIVE_PROBABILITY);
                if active {
                    *power = round_to(*power + rng.gen_range(0.0..POWER_STEP_MAX), 2);
                } else {
                    *power = 0.0;
                }
                DockReading {
                    dock: idx as u32 + 1,
                    active,
                    power_kwh: *power,
                    frequency_hz: if active {
                        round_to(rng.gen_range(FREQUENCY_RANGE.min..=FREQUENCY_RANGE.max), 2)
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        TelemetrySample {
            seq,
            taken_at: Utc::now(),
            phases,
            docks,
        }
    }
}

pub struct RandomHistorySource {
    rng: Mutex<StdRng>,
}

impl RandomHistorySource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomHistorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl HistorySource for RandomHistorySource {
    fn hourly_usage(&self, dock: u32) -> HistoryReport {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let labels = (0..HOURS).map(|h| format!("{:02}:00", h)).collect();
        let power = (0..HOURS).map(|_| rng.gen_range(100..150) as f64).collect();
        let water = (0..HOURS).map(|_| rng.gen_range(80..100) as f64).collect();
        let frequency_avg = round_to(rng.gen_range(59.0..61.0), 2);

        HistoryReport {
            dock,
            labels,
            power,
            water,
            frequency_avg,
        }
    }
}

/// Docks with a coin-flip initial state for every device switch
pub fn random_docks(docks: u32, devices_per_dock: u32) -> Vec<Dock> {
    let mut rng = StdRng::from_entropy();
    (1..=docks)
        .map(|dock| {
            let devices = (1..=devices_per_dock)
                .map(|id| DeviceSwitch {
                    id,
                    name: format!("設備 {}", id),
                    enabled: rng.gen_bool(0.5),
                })
                .collect();
            Dock::new(dock, devices)
        })
        .collect()
}
