// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::history_service::HistoryService;
use crate::application::module_catalog::ModuleCatalog;
use crate::application::realtime_service::RealtimeService;
use crate::application::remote_control::RemoteControl;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub catalog: Arc<ModuleCatalog>,
    pub realtime: Arc<RealtimeService>,
    pub dashboard_service: DashboardService,
    pub history_service: HistoryService,
    pub remote_control: Mutex<RemoteControl>,
}

impl AppState {
    pub fn new(
        catalog: ModuleCatalog,
        realtime: RealtimeService,
        history_service: HistoryService,
        remote_control: RemoteControl,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let realtime = Arc::new(realtime);
        let dashboard_service = DashboardService::new(catalog.clone(), realtime.clone());
        Self {
            catalog,
            realtime,
            dashboard_service,
            history_service,
            remote_control: Mutex::new(remote_control),
        }
    }
}
