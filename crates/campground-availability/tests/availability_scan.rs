//! End-to-end scans against a mocked GoingToCamp host.

use chrono::NaiveDate;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use campground_availability::{
    CAMP_SITE, ClientConfig, GROUP_SITE, GoingToCampClient, Region, ScanExecutor,
    ScanExecutorConfig,
};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
}

fn executor(server: &MockServer, facility_limit: usize) -> ScanExecutor<GoingToCampClient> {
    let client = GoingToCampClient::new(ClientConfig {
        base_url: Some(server.uri()),
        ..ClientConfig::default()
    })
    .expect("failed to build test GoingToCampClient");

    ScanExecutor::new(
        client,
        Some(ScanExecutorConfig {
            regions: vec![Region::BcParks],
            facility_limit,
            start_date: start(),
        }),
    )
}

/// A site reporting the same status code for every day of the window
fn site(code: u8) -> Value {
    Value::Array(vec![json!({"availability": code}); 90])
}

async fn mount_region(server: &MockServer, facilities: Value, maps: Value) {
    Mock::given(method("GET"))
        .and(path("/api/resourceLocation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(facilities))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/maps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(maps))
        .mount(server)
        .await;
}

async fn mount_map(server: &MockServer, map_id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/availability/map"))
        .and(query_param("mapId", map_id))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn empty_region_produces_empty_array() {
    let server = MockServer::start().await;
    mount_region(&server, json!([]), json!([])).await;

    let run = executor(&server, 0).run().await;

    assert_eq!(serde_json::to_value(&run.records).unwrap(), json!([]));
    assert_eq!(run.summary.regions_failed, 0);
}

#[tokio::test]
async fn failing_region_is_left_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/resourceLocation"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let run = executor(&server, 0).run().await;

    assert!(run.records.is_empty());
    assert_eq!(run.summary.regions_failed, 1);
}

#[tokio::test]
async fn failing_facility_is_omitted_and_sibling_kept() {
    let server = MockServer::start().await;
    mount_region(
        &server,
        json!([
            {"resourceLocationId": 1, "resourceCategoryIds": [CAMP_SITE], "resourceLocationName": "Alice Lake"},
            {"resourceLocationId": 2, "resourceCategoryIds": [GROUP_SITE], "localizedValues": [{"fullName": "Golden Ears"}]},
            {"resourceLocationId": 3, "resourceCategoryIds": [1234], "resourceLocationName": "Day Use"}
        ]),
        json!([{"mapLinks": [
            {"resourceLocationId": 1, "childMapId": 10},
            {"resourceLocationId": 2, "childMapId": 20},
            {"resourceLocationId": 3, "childMapId": 30}
        ]}]),
    )
    .await;
    mount_map(&server, "10", ResponseTemplate::new(500)).await;
    mount_map(
        &server,
        "20",
        ResponseTemplate::new(200).set_body_json(json!({
            "resourceAvailabilities": {"-1": site(0), "-2": site(1)}
        })),
    )
    .await;

    let run = executor(&server, 0).run().await;

    assert_eq!(run.records.len(), 1);
    let record = serde_json::to_value(&run.records[0]).unwrap();
    assert_eq!(record["rec_area_id"], json!(12));
    assert_eq!(record["provider"], json!("bcparks"));
    assert_eq!(record["facility_id"], json!(2));
    assert_eq!(record["facility_name"], json!("Golden Ears"));
    assert_eq!(record["map_id"], json!(20));
    assert_eq!(record["availability"]["2025-07-01"], json!(1));
    assert_eq!(record["availability"]["2025-09-28"], json!(1));
    assert_eq!(record["availability"].as_object().unwrap().len(), 90);
    assert_eq!(run.summary.facilities_failed, 1);
}

#[tokio::test]
async fn linked_maps_are_merged_and_failures_skipped() {
    let server = MockServer::start().await;
    mount_region(
        &server,
        json!([{"resourceLocationId": 1, "resourceCategoryIds": [CAMP_SITE]}]),
        json!([{"mapLinks": [{"resourceLocationId": 1, "childMapId": 10}]}]),
    )
    .await;
    mount_map(
        &server,
        "10",
        ResponseTemplate::new(200).set_body_json(json!({
            "resourceAvailabilities": {"-1": site(2)},
            "mapLinkAvailabilities": {"11": {}, "12": {}, "13": {}}
        })),
    )
    .await;
    mount_map(
        &server,
        "11",
        ResponseTemplate::new(200).set_body_json(json!({
            "resourceAvailabilities": {"-5": site(0), "-6": site(0)}
        })),
    )
    .await;
    mount_map(&server, "12", ResponseTemplate::new(500)).await;
    mount_map(
        &server,
        "13",
        ResponseTemplate::new(200).set_body_json(json!({
            "resourceAvailabilities": {"-7": site(0)}
        })),
    )
    .await;

    let run = executor(&server, 0).run().await;

    assert_eq!(run.records.len(), 1);
    let availability = &run.records[0].availability;
    assert_eq!(availability.len(), 90);
    assert!(availability.iter().all(|(_, &spots)| spots == 3));
    assert_eq!(run.records[0].facility_name, "Unknown");
    assert_eq!(run.summary.links_merged, 2);
    assert_eq!(run.summary.links_failed, 1);
}

#[tokio::test]
async fn limit_bounds_fetched_facilities() {
    let server = MockServer::start().await;
    let facilities: Vec<Value> = (1..=4)
        .map(|id| json!({"resourceLocationId": id, "resourceCategoryIds": [CAMP_SITE]}))
        .collect();
    let links: Vec<Value> = (1..=4)
        .map(|id| json!({"resourceLocationId": id, "childMapId": id * 10}))
        .collect();
    mount_region(&server, json!(facilities), json!([{"mapLinks": links}])).await;

    Mock::given(method("GET"))
        .and(path("/api/availability/map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let run = executor(&server, 2).run().await;

    let ids: Vec<i64> = run.records.iter().map(|r| r.facility_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(run.summary.facilities_resolved, 2);
}
