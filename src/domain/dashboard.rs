// Dashboard domain model - landing page overview
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub slug: String,
    pub title: String,
    pub records: usize,
    pub by_status: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RealtimeSummary {
    pub active_docks: usize,
    pub total_docks: usize,
    pub total_power_kwh: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub modules: Vec<ModuleSummary>,
    pub realtime: Option<RealtimeSummary>,
}

impl Dashboard {
    pub fn new(title: String, modules: Vec<ModuleSummary>, realtime: Option<RealtimeSummary>) -> Self {
        Self {
            title,
            modules,
            realtime,
        }
    }
}
