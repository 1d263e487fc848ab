// Dashboard service - Use case for building the landing overview
use crate::application::module_catalog::ModuleCatalog;
use crate::application::realtime_service::RealtimeService;
use crate::domain::dashboard::{Dashboard, RealtimeSummary};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<ModuleCatalog>,
    realtime: Arc<RealtimeService>,
}

impl DashboardService {
    pub fn new(catalog: Arc<ModuleCatalog>, realtime: Arc<RealtimeService>) -> Self {
        Self { catalog, realtime }
    }

    pub async fn get_dashboard(&self) -> Dashboard {
        let modules = self.catalog.summaries().await;
        let realtime = self.realtime.latest().await.map(|sample| RealtimeSummary {
            active_docks: sample.active_docks(),
            total_docks: sample.docks.len(),
            total_power_kwh: sample.total_power_kwh(),
        });

        Dashboard::new("Marina Overview".to_string(), modules, realtime)
    }
}
