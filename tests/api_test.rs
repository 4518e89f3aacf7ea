//! HTTP tests for the /api/meetings routes, run in-process through
//! actix-web's test service.

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use meetsync::web::configure;

mod common;
use common::*;

macro_rules! app {
    ($codes:expr, $expose:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($codes, $expose)))
                .configure(configure),
        )
        .await
    };
}

fn create_body() -> Value {
    json!({
        "name": "Team Sync",
        "creatorName": "Ada",
        "dates": [DATE],
        "startTime": "09:00",
        "endTime": "10:00"
    })
}

#[actix_web::test]
async fn test_create_then_get_meeting() {
    let app = app!(&["ABC123"], false);

    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .set_json(create_body())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["code"], "ABC123");
    let meeting = &body["meeting"];
    assert_eq!(meeting["id"], "ABC123");
    assert_eq!(meeting["name"], "Team Sync");
    assert_eq!(meeting["creatorName"], "Ada");
    assert_eq!(meeting["timeSlots"], json!([SLOT_0900, SLOT_0930, SLOT_1000]));
    assert_eq!(meeting["votes"][SLOT_0930], json!([]));
    assert_eq!(meeting["participants"], json!([]));
    assert!(meeting["createdAt"].as_str().is_some_and(|s| s.ends_with('Z')));

    let req = test::TestRequest::get().uri("/api/meetings/abc123").to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(&fetched, meeting);
}

#[actix_web::test]
async fn test_create_missing_fields_is_bad_request() {
    let app = app!(&["ABC123"], false);

    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .set_json(json!({"name": "Team Sync", "dates": [DATE], "startTime": "09:00", "endTime": "10:00"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["field"], "creatorName");
    assert!(body["error"].as_str().is_some());
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = app!(&["ABC123"], false);

    let req = test::TestRequest::post()
        .uri("/api/meetings/ABC123/vote")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"participantName\": \"P\", \"availableSlots\": \"nope\"}")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["field"], "body");
}

#[actix_web::test]
async fn test_unknown_meeting_is_not_found() {
    let app = app!(&["ABC123"], false);

    for uri in ["/api/meetings/NOPE00", "/api/meetings/NOPE00/results", "/api/meetings/NOPE00/results.csv"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Meeting not found");
    }

    let req = test::TestRequest::post()
        .uri("/api/meetings/NOPE00/vote")
        .set_json(json!({"participantName": "P", "availableSlots": [SLOT_0900]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_vote_and_results_flow() {
    let app = app!(&["FLOW01"], false);

    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .set_json(create_body())
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/meetings/FLOW01/vote")
        .set_json(json!({"participantName": "Bob", "availableSlots": [SLOT_0900]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["meeting"]["id"], "FLOW01");
    assert_eq!(
        body["meeting"]["bestSlots"],
        json!([{"slot": SLOT_0900, "votes": 1, "percentage": 100}])
    );

    // Same instant in a different spelling still lands in the ledger
    let req = test::TestRequest::post()
        .uri("/api/meetings/flow01/vote")
        .set_json(json!({"participantName": "Cy", "availableSlots": ["2025-09-25T09:30:00-07:00"]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["meeting"]["votes"][SLOT_0930], json!(["Cy"]));

    let req = test::TestRequest::get().uri("/api/meetings/FLOW01/results").to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        results["bestSlots"],
        json!([
            {"slot": SLOT_0900, "votes": 1, "percentage": 50},
            {"slot": SLOT_0930, "votes": 1, "percentage": 50}
        ])
    );
    assert_eq!(results["votesSummary"].as_array().map(Vec::len), Some(3));
    assert_eq!(results["votesSummary"][2], json!({"slot": SLOT_1000, "votes": 0, "voters": []}));
    assert_eq!(results["meeting"]["participants"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn test_results_csv_download() {
    let app = app!(&["CSV001"], false);

    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .set_json(create_body())
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/meetings/CSV001/results.csv").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(content_type.as_deref(), Some("text/csv; charset=utf-8"));
    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert_eq!(text.lines().next(), Some("slot,local_time,votes,percentage,voters"));
    assert_eq!(text.lines().count(), 4);
}

#[actix_web::test]
async fn test_meeting_index_is_opt_in() {
    let hidden = app!(&["IDX001"], false);
    let resp = test::call_service(&hidden, test::TestRequest::get().uri("/api/meetings").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let open = app!(&["IDX001"], true);
    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .set_json(create_body())
        .to_request();
    let _: Value = test::call_and_read_body_json(&open, req).await;

    let req = test::TestRequest::get().uri("/api/meetings").to_request();
    let index: Value = test::call_and_read_body_json(&open, req).await;
    assert_eq!(index["IDX001"]["name"], "Team Sync");
}

#[actix_web::test]
async fn test_disk_store_round_trip_over_http() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state_on_disk(dir.path(), &["DISK01"])))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .set_json(create_body())
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;
    assert!(dir.path().join("DISK01.json").exists());

    let req = test::TestRequest::post()
        .uri("/api/meetings/disk01/vote")
        .set_json(json!({"participantName": "Bob", "availableSlots": [SLOT_1000]}))
        .to_request();
    let _: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get().uri("/api/meetings/DISK01/results").to_request();
    let results: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        results["bestSlots"],
        json!([{"slot": SLOT_1000, "votes": 1, "percentage": 100}])
    );

    let on_disk: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("DISK01.json")).expect("read")).expect("json");
    assert_eq!(on_disk["votes"][SLOT_1000], json!(["Bob"]));
}
