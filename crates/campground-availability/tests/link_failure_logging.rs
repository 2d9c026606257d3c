//! A failed linked map is skipped quietly: nothing above debug is logged.
//!
//! Kept in its own test binary because the capturing logger is process-wide.

use std::sync::Mutex;

use chrono::NaiveDate;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campground_availability::{
    CAMP_SITE, ClientConfig, GoingToCampClient, Region, ScanExecutor, ScanExecutorConfig,
};

struct CapturingLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.target().starts_with("campground_availability") {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

fn site(code: u8) -> Value {
    Value::Array(vec![json!({"availability": code}); 90])
}

#[tokio::test]
async fn failed_linked_map_logs_nothing_above_debug() {
    log::set_logger(&LOGGER).expect("logger already installed");
    log::set_max_level(LevelFilter::Trace);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/resourceLocation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"resourceLocationId": 1, "resourceCategoryIds": [CAMP_SITE]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/maps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"mapLinks": [{"resourceLocationId": 1, "childMapId": 10}]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/availability/map"))
        .and(query_param("mapId", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resourceAvailabilities": {"-1": site(0)},
            "mapLinkAvailabilities": {"11": {}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/availability/map"))
        .and(query_param("mapId", "11"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = GoingToCampClient::new(ClientConfig {
        base_url: Some(server.uri()),
        ..ClientConfig::default()
    })
    .unwrap();
    let run = ScanExecutor::new(
        client,
        Some(ScanExecutorConfig {
            regions: vec![Region::BcParks],
            facility_limit: 0,
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        }),
    )
    .run()
    .await;

    assert_eq!(run.records.len(), 1);
    assert_eq!(run.summary.links_failed, 1);

    let records = LOGGER.records.lock().unwrap();
    let loud: Vec<_> = records
        .iter()
        .filter(|(level, _)| *level <= Level::Warn)
        .collect();
    assert!(loud.is_empty(), "unexpected warnings: {:?}", loud);
    assert!(
        records
            .iter()
            .any(|(level, message)| *level == Level::Debug && message.contains("Linked map 11"))
    );
}
