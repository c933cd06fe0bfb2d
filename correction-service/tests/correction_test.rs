mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{json_body, test_config, TestApp};
use correction_service::services::providers::mock::MockProvider;
use serde_json::json;

const WELL_FORMED: &str = "Note: 15/20\nCommentaires:\n- Bon travail\n- Manque de détails";

fn batch(copies: &[&str]) -> serde_json::Value {
    json!({
        "class_level": "Terminale S",
        "exam_subject_id": "Étudier la fonction exponentielle",
        "perfect_answer_id": "La fonction est croissante sur R",
        "student_copies": copies,
    })
}

#[tokio::test]
async fn batch_returns_parsed_grade() {
    let app = TestApp::new(WELL_FORMED);

    let response = app.post_json("/correction/batch", batch(&["Ma copie"])).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["grade"], 15.0);
    assert_eq!(body["max_grade"], 20.0);
    assert_eq!(body["comments"], json!(["Bon travail", "Manque de détails"]));
    assert_eq!(body["detailed_feedback"]["analysis"], WELL_FORMED);
    assert!(body["detailed_feedback"].get("error").is_none());
}

#[tokio::test]
async fn batch_grades_only_the_first_copy() {
    let app = TestApp::new(WELL_FORMED);

    let response = app
        .post_json("/correction/batch", batch(&["première copie", "seconde copie"]))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let calls = app.provider.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].user.contains("première copie"));
    assert!(!calls[0].user.contains("seconde copie"));
    assert!(calls[0].user.contains("Étudier la fonction exponentielle"));
    assert!(calls[0].user.contains("Notation standard sur 20 points"));
}

#[tokio::test]
async fn batch_passes_grading_criteria_to_the_prompt() {
    let app = TestApp::new(WELL_FORMED);
    let mut body = batch(&["copie"]);
    body["grading_criteria"] = json!({ "raisonnement": 12, "rédaction": "8 points" });

    let response = app.post_json("/correction/batch", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let user = &app.provider.calls()[0].user;
    assert!(user.contains("- raisonnement: 12"));
    assert!(user.contains("- rédaction: 8 points"));
    assert!(!user.contains("Notation standard"));
}

#[tokio::test]
async fn unreadable_answer_degrades_to_fallback() {
    let app = TestApp::new("Note: quinze\nCommentaires:");

    let response = app.post_json("/correction/batch", batch(&["copie"])).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["grade"], 10.0);
    assert_eq!(body["max_grade"], 20.0);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    assert!(body["detailed_feedback"]["error"].is_string());
    assert_eq!(
        body["detailed_feedback"]["raw_analysis"],
        "Note: quinze\nCommentaires:"
    );
}

#[tokio::test]
async fn header_only_answer_has_empty_comments() {
    let app = TestApp::new("Note: 9/20\nCommentaires:\n\n");

    let body = json_body(app.post_json("/correction/batch", batch(&["copie"])).await).await;

    assert_eq!(body["grade"], 9.0);
    assert_eq!(body["comments"], json!([]));
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let app = TestApp::new(WELL_FORMED);

    let response = app.post_json("/correction/batch", batch(&[])).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = TestApp::new(WELL_FORMED);

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/correction/batch")
                .header("content-type", "application/json")
                .body(Body::from("{\"class_level\": "))
                .unwrap(),
        )
        .await;

    assert!(response.status().is_client_error());
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_is_an_internal_error() {
    let app = TestApp::with_config(test_config(), MockProvider::failing("upstream exploded"));

    let response = app.post_json("/correction/batch", batch(&["copie"])).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].as_str().unwrap().contains("upstream exploded"));
}

#[tokio::test]
async fn single_copy_grading_endpoint() {
    let app = TestApp::new("Note: 18/20\nCommentaires:\n- Excellent");

    let response = app
        .post_json(
            "/correction/grade",
            json!({
                "class_level": "Première",
                "exam_subject_text": "Sujet",
                "perfect_answer_text": "Corrigé",
                "student_copy_text": "Copie complète",
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["grade"], 18.0);
    assert_eq!(body["comments"], json!(["Excellent"]));
}

#[tokio::test]
async fn ocr_correction_endpoint() {
    let app = TestApp::new("Bonjour le monde\n");

    let response = app
        .post_json(
            "/api/correct",
            json!({ "text": "Bonj0ur le monde", "context": "lettre", "language": "fr" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["corrected_text"], "Bonjour le monde");
    assert_eq!(body["status"], "success");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((confidence - 2.0 / 3.0).abs() < 1e-9);

    let call = &app.provider.calls()[0];
    assert!(call.user.contains("Langue: fr"));
    assert!(call.user.contains("lettre"));
}

#[tokio::test]
async fn interpretation_is_stable_across_requests() {
    let app = TestApp::new(WELL_FORMED);

    let first = json_body(app.post_json("/correction/batch", batch(&["copie"])).await).await;
    let second = json_body(app.post_json("/correction/batch", batch(&["copie"])).await).await;

    assert_eq!(first, second);
}
