use marina_dashboard::application::module_catalog::ModuleCatalog;
use marina_dashboard::application::error::RecordError;
use marina_dashboard::application::record_manager::Operation;
use marina_dashboard::domain::record::RecordId;
use marina_dashboard::infrastructure::config::load_modules_config;

#[tokio::test]
async fn test_shipped_modules_load() {
    let config = load_modules_config().expect("config/modules.toml should parse");
    let catalog = ModuleCatalog::from_config(&config).expect("modules should validate");
    assert_eq!(catalog.len(), 17);

    let schemas = catalog.schemas().await;
    let network = schemas.iter().find(|s| s.slug == "network").unwrap();
    assert_eq!(network.statuses.len(), 3);
}

#[tokio::test]
async fn test_alert_events_paginate_and_filter() {
    let config = load_modules_config().unwrap();
    let catalog = ModuleCatalog::from_config(&config).unwrap();
    let mut alerts = catalog.get("alerts").unwrap().lock().await;

    let view = alerts.view();
    assert_eq!(view.total_matches, 15);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.records.len(), 10);

    alerts.set_page(2);
    alerts.set_filter("設備 5");
    let view = alerts.view();
    assert_eq!(view.page, 1);
    assert_eq!(view.total_matches, 3);
}

#[tokio::test]
async fn test_numeric_seed_field_rejects_text_edit() {
    let config = load_modules_config().unwrap();
    let catalog = ModuleCatalog::from_config(&config).unwrap();
    let mut items = catalog.get("items").unwrap().lock().await;

    let input = [("unit_price".to_string(), "cheap".to_string())].into_iter().collect();
    assert!(items.stage(Operation::Edit(RecordId(1), input)).is_err());
    assert!(items.pending_prompt().is_none());
}

#[tokio::test]
async fn test_user_binding_pages_by_five_and_toggles() {
    let config = load_modules_config().unwrap();
    let catalog = ModuleCatalog::from_config(&config).unwrap();
    let mut users = catalog.get("user-binding").unwrap().lock().await;

    let view = users.view();
    assert_eq!(view.total_matches, 23);
    assert_eq!(view.total_pages, 5);
    assert_eq!(users.view_for("", 5).records.len(), 3);

    let id = view.records[0].id;
    let before = view.records[0].status.clone();
    let prompt = users.stage(Operation::AdvanceStatus(id)).unwrap();
    users.confirm_ticket(prompt.ticket).unwrap();
    assert_ne!(users.get(id).unwrap().status, before);
}

#[tokio::test]
async fn test_read_only_pages_search_but_refuse_changes() {
    let config = load_modules_config().unwrap();
    let catalog = ModuleCatalog::from_config(&config).unwrap();

    let mut ships = catalog.get("ais").unwrap().lock().await;
    assert_eq!(ships.view().total_matches, 23);
    assert_eq!(ships.view_for("412341005", 1).total_matches, 1);
    assert_eq!(ships.view_for("船舶 2", 1).total_matches, 5);
    assert_eq!(
        ships.stage(Operation::Remove(RecordId(1))).unwrap_err(),
        RecordError::ReadOnly("ais".to_string())
    );

    let access = catalog.get("access-records").unwrap().lock().await;
    assert_eq!(access.view().total_pages, 3);
    assert_eq!(access.view_for("進入", 1).total_matches, 13);
    assert_eq!(access.view_for("AIC-1024", 1).total_matches, 1);
}
