use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use spy_cat_agency::api::{create_router, AppState};
use spy_cat_agency::breeds::{
    BreedCache, BreedSource, BreedSourceError, BreedValidator, StaticBreedSource,
};
use spy_cat_agency::db::Database;
use spy_cat_agency::models::*;
use uuid::Uuid;

struct UnreachableBreeds;

#[async_trait]
impl BreedSource for UnreachableBreeds {
    async fn fetch_breeds(&self) -> Result<Vec<String>, BreedSourceError> {
        Err(BreedSourceError::Body("connection refused".to_string()))
    }
}

fn server_with(source: Arc<dyn BreedSource>) -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let breeds = BreedValidator::new(source, BreedCache::new(Duration::from_secs(60)));
    let app = create_router(AppState::new(db, breeds));
    TestServer::new(app).expect("Failed to create test server")
}

fn setup() -> TestServer {
    server_with(Arc::new(StaticBreedSource::new([
        "Abyssinian",
        "Bengal",
        "Siamese",
    ])))
}

async fn create_test_cat(server: &TestServer, name: &str) -> Cat {
    server
        .post("/cats")
        .json(&json!({
            "name": name,
            "breed": "Abyssinian",
            "years_of_experience": 3,
            "salary": 1500,
        }))
        .await
        .json::<Cat>()
}

async fn create_test_mission(server: &TestServer, targets: &[(&str, &str)]) -> MissionWithTargets {
    let targets: Vec<Value> = targets
        .iter()
        .map(|(name, country)| json!({ "name": name, "country": country, "notes": "" }))
        .collect();
    server
        .post("/missions")
        .json(&json!({ "targets": targets }))
        .await
        .json::<MissionWithTargets>()
}

fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn health_reports_ok() {
    let server = setup();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

mod cats {
    use super::*;

    #[tokio::test]
    async fn creates_cat_with_canonical_breed() {
        let server = setup();

        let response = server
            .post("/cats")
            .json(&json!({
                "name": "Shadow",
                "breed": "  siamese ",
                "years_of_experience": 3,
                "salary": 1500,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let cat: Cat = response.json();
        assert_eq!(cat.name, "Shadow");
        assert_eq!(cat.breed, "Siamese");
        assert_eq!(cat.salary, 1500.0);
    }

    #[tokio::test]
    async fn rejects_unknown_breed_with_422() {
        let server = setup();

        let response = server
            .post("/cats")
            .json(&json!({
                "name": "BadCat",
                "breed": "NotARealBreed",
                "years_of_experience": 1,
                "salary": 1000,
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(error_code(&body), "INVALID_BREED");
        assert_eq!(body["retryable"], false);
        assert!(server.get("/cats").await.json::<Vec<Cat>>().is_empty());
    }

    #[tokio::test]
    async fn rejects_invalid_fields_with_422() {
        let server = setup();

        for payload in [
            json!({ "name": "", "breed": "Bengal", "years_of_experience": 1, "salary": 10 }),
            json!({ "name": "Cat", "breed": "Bengal", "years_of_experience": -1, "salary": 10 }),
            json!({ "name": "Cat", "breed": "Bengal", "years_of_experience": 1, "salary": 0 }),
        ] {
            let response = server.post("/cats").json(&payload).await;
            response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(error_code(&response.json::<Value>()), "INVALID_INPUT");
        }
    }

    #[tokio::test]
    async fn breed_service_outage_is_503_and_retryable() {
        let server = server_with(Arc::new(UnreachableBreeds));

        let response = server
            .post("/cats")
            .json(&json!({
                "name": "Shadow",
                "breed": "Abyssinian",
                "years_of_experience": 3,
                "salary": 1500,
            }))
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(error_code(&body), "EXTERNAL_SERVICE_UNAVAILABLE");
        assert_eq!(body["retryable"], true);
        assert!(response.headers().get("retry-after").is_some());
    }

    #[tokio::test]
    async fn lists_and_gets_cats() {
        let server = setup();
        let shadow = create_test_cat(&server, "Shadow").await;
        create_test_cat(&server, "Tom").await;

        let cats: Vec<Cat> = server.get("/cats").await.json();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].name, "Shadow");

        let response = server.get(&format!("/cats/{}", shadow.id)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<Cat>().id, shadow.id);
    }

    #[tokio::test]
    async fn get_unknown_cat_is_404() {
        let server = setup();
        let response = server.get(&format!("/cats/{}", Uuid::new_v4())).await;
        response.assert_status_not_found();
        assert_eq!(error_code(&response.json::<Value>()), "NOT_FOUND");
    }

    #[tokio::test]
    async fn updates_salary() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;

        let response = server
            .patch(&format!("/cats/{}", cat.id))
            .json(&json!({ "salary": 2750.5 }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Cat>().salary, 2750.5);
    }

    #[tokio::test]
    async fn salary_update_errors() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;

        server
            .patch(&format!("/cats/{}", cat.id))
            .json(&json!({ "salary": -1 }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        server
            .patch(&format!("/cats/{}", Uuid::new_v4()))
            .json(&json!({ "salary": 100 }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn deletes_idle_cat() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;

        server
            .delete(&format!("/cats/{}", cat.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/cats/{}", cat.id))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn cat_on_active_mission_cannot_be_deleted() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;
        let mission = create_test_mission(&server, &[("A", "UA")]).await;
        server
            .post(&format!("/missions/{}/assign/{}", mission.mission.id, cat.id))
            .await
            .assert_status_ok();

        let response = server.delete(&format!("/cats/{}", cat.id)).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(
            error_code(&response.json::<Value>()),
            "CAT_HAS_ACTIVE_MISSION"
        );
    }
}

mod missions {
    use super::*;

    #[tokio::test]
    async fn creates_mission_with_targets() {
        let server = setup();

        let response = server
            .post("/missions")
            .json(&json!({
                "targets": [
                    { "name": "Alice", "country": "Finland", "notes": "Start observing." },
                    { "name": "Bob", "country": "Estonia" },
                ]
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let mission: MissionWithTargets = response.json();
        assert_eq!(mission.mission.status, MissionStatus::Active);
        assert!(mission.mission.assigned_cat_id.is_none());
        assert_eq!(mission.targets.len(), 2);
        assert_eq!(mission.targets[0].notes, "Start observing.");
        assert_eq!(mission.targets[1].notes, "");
    }

    #[tokio::test]
    async fn serializes_flat_mission_with_targets() {
        let server = setup();
        let created = create_test_mission(&server, &[("A", "UA")]).await;

        let body: Value = server
            .get(&format!("/missions/{}", created.mission.id))
            .await
            .json();
        assert_eq!(body["status"], "active");
        assert!(body["assigned_cat_id"].is_null());
        assert_eq!(body["targets"][0]["completed"], false);
    }

    #[tokio::test]
    async fn duplicate_targets_are_422() {
        let server = setup();

        let response = server
            .post("/missions")
            .json(&json!({
                "targets": [
                    { "name": "A", "country": "UA" },
                    { "name": "A", "country": "UA" },
                ]
            }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&response.json::<Value>()), "DUPLICATE_TARGET");
        assert!(server
            .get("/missions")
            .await
            .json::<Vec<MissionWithTargets>>()
            .is_empty());
    }

    #[tokio::test]
    async fn zero_or_four_targets_are_422() {
        let server = setup();

        let zero = server
            .post("/missions")
            .json(&json!({ "targets": [] }))
            .await;
        zero.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&zero.json::<Value>()), "INVALID_TARGET_COUNT");

        let four = server
            .post("/missions")
            .json(&json!({
                "targets": [
                    { "name": "A", "country": "UA" },
                    { "name": "B", "country": "UA" },
                    { "name": "C", "country": "UA" },
                    { "name": "D", "country": "UA" },
                ]
            }))
            .await;
        four.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&four.json::<Value>()), "INVALID_TARGET_COUNT");
    }

    #[tokio::test]
    async fn get_unknown_mission_is_404() {
        let server = setup();
        server
            .get(&format!("/missions/{}", Uuid::new_v4()))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn assigns_cat() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;
        let mission = create_test_mission(&server, &[("A", "UA")]).await;

        let response = server
            .post(&format!("/missions/{}/assign/{}", mission.mission.id, cat.id))
            .await;

        response.assert_status_ok();
        let assigned: MissionWithTargets = response.json();
        assert_eq!(assigned.mission.assigned_cat_id, Some(cat.id));
    }

    #[tokio::test]
    async fn assigning_busy_cat_is_409() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;
        let m1 = create_test_mission(&server, &[("A", "UA")]).await;
        let m2 = create_test_mission(&server, &[("B", "UA")]).await;

        server
            .post(&format!("/missions/{}/assign/{}", m1.mission.id, cat.id))
            .await
            .assert_status_ok();

        let response = server
            .post(&format!("/missions/{}/assign/{}", m2.mission.id, cat.id))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(error_code(&response.json::<Value>()), "CAT_BUSY");
    }

    #[tokio::test]
    async fn reassigning_is_409() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;
        let mission = create_test_mission(&server, &[("A", "UA")]).await;
        let path = format!("/missions/{}/assign/{}", mission.mission.id, cat.id);

        server.post(&path).await.assert_status_ok();
        let response = server.post(&path).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(
            error_code(&response.json::<Value>()),
            "MISSION_ALREADY_ASSIGNED"
        );
    }

    #[tokio::test]
    async fn assigning_unknown_cat_is_404() {
        let server = setup();
        let mission = create_test_mission(&server, &[("A", "UA")]).await;

        server
            .post(&format!(
                "/missions/{}/assign/{}",
                mission.mission.id,
                Uuid::new_v4()
            ))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn assigned_mission_cannot_be_deleted() {
        let server = setup();
        let cat = create_test_cat(&server, "Shadow").await;
        let mission = create_test_mission(&server, &[("A", "UA")]).await;
        server
            .post(&format!("/missions/{}/assign/{}", mission.mission.id, cat.id))
            .await
            .assert_status_ok();

        let response = server
            .delete(&format!("/missions/{}", mission.mission.id))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(error_code(&response.json::<Value>()), "MISSION_ASSIGNED");

        server
            .get(&format!("/missions/{}", mission.mission.id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn deletes_unassigned_mission() {
        let server = setup();
        let mission = create_test_mission(&server, &[("A", "UA"), ("B", "UA")]).await;

        server
            .delete(&format!("/missions/{}", mission.mission.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/missions/{}", mission.mission.id))
            .await
            .assert_status_not_found();
    }
}

mod targets {
    use super::*;

    fn target_path(mission: &MissionWithTargets, index: usize) -> String {
        format!(
            "/missions/{}/targets/{}",
            mission.mission.id, mission.targets[index].id
        )
    }

    #[tokio::test]
    async fn updates_notes() {
        let server = setup();
        let mission = create_test_mission(&server, &[("Alice", "Finland")]).await;

        let response = server
            .patch(&target_path(&mission, 0))
            .json(&json!({ "notes": "Collect evidence." }))
            .await;

        response.assert_status_ok();
        let target: Target = response.json();
        assert_eq!(target.notes, "Collect evidence.");
        assert!(!target.completed);
    }

    #[tokio::test]
    async fn completing_last_target_completes_mission() {
        let server = setup();
        let mission = create_test_mission(&server, &[("Alice", "Finland")]).await;

        let response = server
            .patch(&target_path(&mission, 0))
            .json(&json!({ "completed": true }))
            .await;
        response.assert_status_ok();
        assert!(response.json::<Target>().completed);

        let after: MissionWithTargets = server
            .get(&format!("/missions/{}", mission.mission.id))
            .await
            .json();
        assert_eq!(after.mission.status, MissionStatus::Completed);
    }

    #[tokio::test]
    async fn mission_stays_active_until_every_target_completes() {
        let server = setup();
        let mission = create_test_mission(&server, &[("T1", "UA"), ("T2", "UA")]).await;
        let mission_path = format!("/missions/{}", mission.mission.id);

        server
            .patch(&target_path(&mission, 0))
            .json(&json!({ "completed": true }))
            .await
            .assert_status_ok();
        let after_first: MissionWithTargets = server.get(&mission_path).await.json();
        assert_eq!(after_first.mission.status, MissionStatus::Active);

        server
            .patch(&target_path(&mission, 1))
            .json(&json!({ "completed": true }))
            .await
            .assert_status_ok();
        let after_second: MissionWithTargets = server.get(&mission_path).await.json();
        assert_eq!(after_second.mission.status, MissionStatus::Completed);
        assert!(after_second.targets.iter().all(|t| t.completed));
    }

    #[tokio::test]
    async fn notes_frozen_after_target_complete() {
        let server = setup();
        let cat = create_test_cat(&server, "AgentCat").await;
        let mission = create_test_mission(&server, &[("Alice", "Finland"), ("Bob", "Estonia")]).await;
        server
            .post(&format!("/missions/{}/assign/{}", mission.mission.id, cat.id))
            .await
            .assert_status_ok();

        server
            .patch(&target_path(&mission, 0))
            .json(&json!({ "completed": true }))
            .await
            .assert_status_ok();

        let response = server
            .patch(&target_path(&mission, 0))
            .json(&json!({ "notes": "New notes after complete" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(error_code(&response.json::<Value>()), "TARGET_FROZEN");

        // The other target is still open and editable
        server
            .patch(&target_path(&mission, 1))
            .json(&json!({ "notes": "Still watching" }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn completing_twice_is_a_no_op() {
        let server = setup();
        let mission = create_test_mission(&server, &[("A", "UA"), ("B", "UA")]).await;

        for _ in 0..2 {
            let response = server
                .patch(&target_path(&mission, 0))
                .json(&json!({ "completed": true }))
                .await;
            response.assert_status_ok();
            assert!(response.json::<Target>().completed);
        }
    }

    #[tokio::test]
    async fn uncompleting_is_ignored() {
        let server = setup();
        let mission = create_test_mission(&server, &[("A", "UA")]).await;

        server
            .patch(&target_path(&mission, 0))
            .json(&json!({ "completed": true }))
            .await
            .assert_status_ok();

        let response = server
            .patch(&target_path(&mission, 0))
            .json(&json!({ "completed": false }))
            .await;
        response.assert_status_ok();
        assert!(response.json::<Target>().completed);
    }

    #[tokio::test]
    async fn target_from_another_mission_is_404() {
        let server = setup();
        let first = create_test_mission(&server, &[("A", "UA")]).await;
        let second = create_test_mission(&server, &[("B", "UA")]).await;

        server
            .patch(&format!(
                "/missions/{}/targets/{}",
                first.mission.id, second.targets[0].id
            ))
            .json(&json!({ "completed": true }))
            .await
            .assert_status_not_found();
    }
}

mod malformed_requests {
    use super::*;

    fn assert_invalid_input(response: axum_test::TestResponse) {
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(error_code(&body), "INVALID_INPUT");
        assert_eq!(body["retryable"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_cat_field_is_invalid_input() {
        let server = setup();

        let response = server
            .post("/cats")
            .json(&json!({ "name": "C", "years_of_experience": 1, "salary": 10 }))
            .await;

        assert_invalid_input(response);
        assert!(server.get("/cats").await.json::<Vec<Cat>>().is_empty());
    }

    #[tokio::test]
    async fn fractional_experience_is_invalid_input() {
        let server = setup();

        let response = server
            .post("/cats")
            .json(&json!({
                "name": "Shadow",
                "breed": "Bengal",
                "years_of_experience": 1.5,
                "salary": 10,
            }))
            .await;

        assert_invalid_input(response);
    }

    #[tokio::test]
    async fn mission_without_targets_field_is_invalid_input() {
        let server = setup();
        let response = server.post("/missions").json(&json!({})).await;
        assert_invalid_input(response);
    }

    #[tokio::test]
    async fn wrongly_typed_target_update_is_invalid_input() {
        let server = setup();
        let mission = create_test_mission(&server, &[("A", "UA")]).await;

        let response = server
            .patch(&format!(
                "/missions/{}/targets/{}",
                mission.mission.id, mission.targets[0].id
            ))
            .json(&json!({ "completed": "yes" }))
            .await;

        assert_invalid_input(response);
    }

    #[tokio::test]
    async fn non_uuid_ids_are_not_found() {
        let server = setup();
        let mission = create_test_mission(&server, &[("A", "UA")]).await;

        for response in [
            server.get("/cats/not-a-uuid").await,
            server.delete("/missions/42").await,
            server
                .post(&format!("/missions/{}/assign/nobody", mission.mission.id))
                .await,
        ] {
            response.assert_status_not_found();
            assert_eq!(error_code(&response.json::<Value>()), "NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn unknown_cat_is_reported_before_bad_salary() {
        let server = setup();

        let response = server
            .patch(&format!("/cats/{}", Uuid::new_v4()))
            .json(&json!({ "salary": 0 }))
            .await;

        response.assert_status_not_found();
        assert_eq!(error_code(&response.json::<Value>()), "NOT_FOUND");
    }
}
