// Module catalog - one record manager per configured dashboard module
use crate::application::record_manager::RecordManager;
use crate::domain::dashboard::ModuleSummary;
use crate::domain::record::ModuleSchema;
use crate::infrastructure::config::ModulesConfig;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub struct ModuleCatalog {
    order: Vec<String>,
    managers: HashMap<String, Mutex<RecordManager>>,
}

impl ModuleCatalog {
    pub fn new(managers: Vec<RecordManager>) -> anyhow::Result<Self> {
        let mut order = Vec::with_capacity(managers.len());
        let mut by_slug = HashMap::with_capacity(managers.len());
        for manager in managers {
            let slug = manager.schema().slug.clone();
            if by_slug.contains_key(&slug) {
                anyhow::bail!("module slug {} is defined twice", slug);
            }
            order.push(slug.clone());
            by_slug.insert(slug, Mutex::new(manager));
        }
        Ok(Self {
            order,
            managers: by_slug,
        })
    }

    pub fn from_config(config: &ModulesConfig) -> anyhow::Result<Self> {
        let mut managers = Vec::with_capacity(config.modules.len());
        for module in &config.modules {
            let (schema, seed) = module.build()?;
            tracing::debug!(module = %schema.slug, records = seed.len(), "module loaded");
            managers.push(RecordManager::new(schema, seed));
        }
        Self::new(managers)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&Mutex<RecordManager>> {
        self.managers.get(slug)
    }

    /// Managers in configuration order
    fn iter(&self) -> impl Iterator<Item = &Mutex<RecordManager>> {
        self.order.iter().filter_map(|slug| self.managers.get(slug))
    }

    pub async fn schemas(&self) -> Vec<ModuleSchema> {
        let mut schemas = Vec::with_capacity(self.len());
        for manager in self.iter() {
            schemas.push(manager.lock().await.schema().clone());
        }
        schemas
    }

    pub async fn summaries(&self) -> Vec<ModuleSummary> {
        let mut summaries = Vec::with_capacity(self.len());
        for manager in self.iter() {
            let manager = manager.lock().await;
            summaries.push(ModuleSummary {
                slug: manager.schema().slug.clone(),
                title: manager.schema().title.clone(),
                records: manager.records().len(),
                by_status: manager.status_counts(),
            });
        }
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{FieldSpec, StatusCycle};

    fn manager(slug: &str) -> RecordManager {
        let schema = ModuleSchema {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            fields: vec![FieldSpec {
                name: "name".to_string(),
                label: None,
                required: true,
                numeric: false,
                searchable: true,
            }],
            statuses: StatusCycle::new(["啟用", "停用"]).unwrap(),
            default_status: "啟用".to_string(),
            page_size: 10,
            read_only: false,
        };
        RecordManager::new(schema, Vec::new())
    }

    #[tokio::test]
    async fn test_catalog_keeps_configured_order() {
        let catalog = ModuleCatalog::new(vec![manager("items"), manager("camera"), manager("rates")]).unwrap();
        let slugs: Vec<String> = catalog.schemas().await.into_iter().map(|s| s.slug).collect();
        assert_eq!(slugs, vec!["items", "camera", "rates"]);
        assert!(catalog.get("camera").is_some());
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn test_duplicate_slugs_rejected() {
        assert!(ModuleCatalog::new(vec![manager("items"), manager("items")]).is_err());
    }
}
