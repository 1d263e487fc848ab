use crate::domain::record::{FieldSpec, FieldValue, ModuleSchema, Record, RecordId, StatusCycle};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Sub-path the dashboard is hosted under, e.g. `/yacht-dashboard`
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_docks")]
    pub docks: u32,
    #[serde(default = "default_devices")]
    pub devices_per_dock: u32,
}

impl ServerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.telemetry.validate()
    }
}

impl TelemetrySettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval_ms == 0 {
            anyhow::bail!("telemetry.interval_ms must be positive");
        }
        if self.docks == 0 {
            anyhow::bail!("telemetry.docks must be positive");
        }
        Ok(())
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            docks: default_docks(),
            devices_per_dock: default_devices(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_path() -> String {
    "/".to_string()
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_docks() -> u32 {
    11
}

fn default_devices() -> u32 {
    4
}

fn default_page_size() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModulesConfig {
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModuleConfig {
    pub slug: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
    pub statuses: Vec<String>,
    pub default_status: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub seed: Vec<SeedRow>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedRow {
    pub id: u64,
    pub status: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl ModuleConfig {
    /// Checks the definition and builds the schema plus its seed records
    pub fn build(&self) -> anyhow::Result<(ModuleSchema, Vec<Record>)> {
        let statuses = StatusCycle::new(self.statuses.iter().cloned()).ok_or_else(|| {
            anyhow::anyhow!(
                "module {} needs at least two distinct statuses",
                self.slug
            )
        })?;

        let default_status = self
            .default_status
            .clone()
            .unwrap_or_else(|| statuses.labels()[0].clone());
        if !statuses.contains(&default_status) {
            anyhow::bail!(
                "module {}: default status {} is not one of its statuses",
                self.slug,
                default_status
            );
        }
        if self.page_size == 0 {
            anyhow::bail!("module {}: page_size must be positive", self.slug);
        }

        let mut seen = Vec::with_capacity(self.seed.len());
        let mut records = Vec::with_capacity(self.seed.len());
        for row in &self.seed {
            if seen.contains(&row.id) {
                anyhow::bail!("module {}: duplicate seed id {}", self.slug, row.id);
            }
            seen.push(row.id);
            self.check_seed(row, &statuses)?;
            records.push(Record::new(RecordId(row.id), row.fields.clone(), row.status.clone()));
        }

        let schema = ModuleSchema {
            slug: self.slug.clone(),
            title: self.title.clone(),
            fields: self.fields.clone(),
            statuses,
            default_status,
            page_size: self.page_size,
            read_only: self.read_only,
        };
        Ok((schema, records))
    }

    fn check_seed(&self, row: &SeedRow, statuses: &StatusCycle) -> anyhow::Result<()> {
        if !statuses.contains(&row.status) {
            anyhow::bail!(
                "module {}: seed row {} has status {} outside its cycle",
                self.slug,
                row.id,
                row.status
            );
        }
        if let Some(name) = row.fields.keys().find(|k| !self.fields.iter().any(|f| &f.name == *k)) {
            anyhow::bail!("module {}: seed row {} has unknown field {}", self.slug, row.id, name);
        }
        for spec in &self.fields {
            match row.fields.get(&spec.name) {
                None if spec.required => {
                    anyhow::bail!("module {}: seed row {} lacks required field {}", self.slug, row.id, spec.name)
                }
                Some(FieldValue::Text(_)) if spec.numeric => {
                    anyhow::bail!("module {}: seed row {} field {} must be a number", self.slug, row.id, spec.name)
                }
                _ => {}
            }
        }
        Ok(())
    }
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(
            config::Environment::with_prefix("MARINA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_default("server.host", default_host())?
        .build()?;

    let config: ServerConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_modules_config() -> anyhow::Result<ModulesConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/modules"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Normalises the hosting sub-path to `/segment` form, or `/` for the root
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(statuses: &[&str], default_status: Option<&str>) -> ModuleConfig {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldValue::Text("攝影機 A".to_string()));
        ModuleConfig {
            slug: "camera".to_string(),
            title: "Cameras".to_string(),
            fields: vec![FieldSpec {
                name: "name".to_string(),
                label: None,
                required: true,
                numeric: false,
                searchable: true,
            }],
            statuses: statuses.iter().map(|s| s.to_string()).collect(),
            default_status: default_status.map(str::to_string),
            page_size: 10,
            read_only: false,
            seed: vec![SeedRow {
                id: 1,
                status: "啟用".to_string(),
                fields,
            }],
        }
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/yacht-dashboard/"), "/yacht-dashboard");
        assert_eq!(normalize_base_path("yacht-dashboard"), "/yacht-dashboard");
        assert_eq!(normalize_base_path("/"), "/");
        assert_eq!(normalize_base_path(""), "/");
    }

    #[test]
    fn test_build_defaults_to_first_status() {
        let (schema, records) = module(&["啟用", "停用"], None).build().unwrap();
        assert_eq!(schema.default_status, "啟用");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_build_rejects_bad_definitions() {
        assert!(module(&["啟用"], None).build().is_err());
        assert!(module(&["啟用", "停用"], Some("維護")).build().is_err());
    }

    #[test]
    fn test_build_rejects_inconsistent_seeds() {
        let mut bad_status = module(&["啟用", "停用"], None);
        bad_status.seed[0].status = "維護".to_string();
        assert!(bad_status.build().is_err());

        let mut missing = module(&["啟用", "停用"], None);
        missing.seed[0].fields.clear();
        assert!(missing.build().is_err());

        let mut text_price = module(&["啟用", "停用"], None);
        text_price.fields.push(FieldSpec {
            name: "unit_price".to_string(),
            label: None,
            required: false,
            numeric: true,
            searchable: false,
        });
        text_price.seed[0]
            .fields
            .insert("unit_price".to_string(), FieldValue::Text("cheap".to_string()));
        assert!(text_price.build().is_err());

        text_price.seed[0]
            .fields
            .insert("unit_price".to_string(), FieldValue::Number(30.0));
        assert!(text_price.build().is_ok());
    }

    #[test]
    fn test_zero_telemetry_interval_rejected() {
        let mut telemetry = TelemetrySettings::default();
        assert!(telemetry.validate().is_ok());
        telemetry.interval_ms = 0;
        assert!(telemetry.validate().is_err());
    }

    #[test]
    fn test_server_config_parses_and_validates() {
        let parse = |interval: i64| -> anyhow::Result<ServerConfig> {
            let config: ServerConfig = config::Config::builder()
                .set_override("server.port", 9000)?
                .set_override("telemetry.interval_ms", interval)?
                .build()?
                .try_deserialize()?;
            config.validate()?;
            Ok(config)
        };
        let config = parse(250).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.base_path, "/");
        assert_eq!(config.telemetry.docks, 11);
        assert!(parse(0).is_err());
    }

    #[test]
    fn test_seed_rows_deserialize_mixed_fields() {
        let raw = r#"{ "id": 2, "status": "停用", "name": "電費", "unit_price": 5 }"#;
        let row: SeedRow = serde_json::from_str(raw).unwrap();
        assert_eq!(row.fields.get("unit_price"), Some(&FieldValue::Number(5.0)));
        assert_eq!(row.fields.get("name"), Some(&FieldValue::Text("電費".to_string())));
    }
}
