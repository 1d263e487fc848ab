// History service - hourly power/water usage per dock
use crate::application::error::RecordError;
use crate::application::telemetry_source::HistorySource;
use crate::domain::telemetry::HistoryReport;
use std::sync::Arc;

#[derive(Clone)]
pub struct HistoryService {
    source: Arc<dyn HistorySource>,
    docks: u32,
}

impl HistoryService {
    pub fn new(source: Arc<dyn HistorySource>, docks: u32) -> Self {
        Self { source, docks }
    }

    pub fn report(&self, dock: u32) -> Result<HistoryReport, RecordError> {
        if dock == 0 || dock > self.docks {
            return Err(RecordError::UnknownTarget(format!("dock {}", dock)));
        }
        Ok(self.source.hourly_usage(dock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::random_source::RandomHistorySource;

    #[test]
    fn test_dock_bounds() {
        let service = HistoryService::new(Arc::new(RandomHistorySource::seeded(1)), 11);
        assert!(service.report(0).is_err());
        assert!(service.report(12).is_err());
        let report = service.report(11).unwrap();
        assert_eq!(report.power.len(), 24);
        assert_eq!(report.water.len(), 24);
    }
}
