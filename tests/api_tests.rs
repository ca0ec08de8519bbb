use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use indiquant_rust::auth::{MemoryTokenStore, TokenStore};
use indiquant_rust::config::ClientOptions;
use indiquant_rust::leaderboard::PerformanceTrend;
use indiquant_rust::tournaments::TournamentStatus;
use indiquant_rust::IndiQuant;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An unsigned JWT-shaped token whose `exp` claim lies `seconds` from now
fn token_expiring_in(seconds: i64) -> String {
    let exp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
        + seconds;
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{}}}"#, exp)),
        URL_SAFE_NO_PAD.encode("signature")
    )
}

/// A client holding a fresh session, plus the bearer header it should send
fn signed_in_client(uri: &str) -> (IndiQuant, String) {
    let access_token = token_expiring_in(600);
    let store = Arc::new(MemoryTokenStore::new());
    store.save_tokens(&access_token, "refresh-1");
    let client = IndiQuant::new_with_token_store(uri, ClientOptions::default(), store);
    (client, format!("Bearer {}", access_token))
}

#[tokio::test]
async fn leaderboard_query_sends_period_and_top_n() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/leaderboard"))
        .and(query_param("period", "7d"))
        .and(query_param("top_n", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "leaderboard": [{
                "rank": 1,
                "user_id": "u1",
                "submission_id": "s1",
                "score": 0.42,
                "percentile": 99.1,
                "submissions_count": 7,
                "best_score": 0.45,
                "performance_trend": "up"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = IndiQuant::new_with_options(
        &mock_server.uri(),
        ClientOptions::default().with_persist_session(false),
    );

    let response = client.leaderboard().get("7d", 10).await.unwrap();

    assert_eq!(response.leaderboard.len(), 1);
    let entry = &response.leaderboard[0];
    assert_eq!(entry.rank, 1);
    assert_eq!(entry.user_id, "u1");
    assert_eq!(entry.performance_trend, PerformanceTrend::Up);
}

#[tokio::test]
async fn user_stats_carries_the_bearer_token() {
    let mock_server = MockServer::start().await;
    let (client, bearer) = signed_in_client(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/leaderboard/user/u1"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": "u1",
            "rank": 12,
            "score": 0.31,
            "percentile": 88.0,
            "submissions_count": 4,
            "best_score": 0.33
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stats = client.leaderboard().user_stats("u1").await.unwrap();

    assert_eq!(stats.rank, Some(12));
    assert_eq!(stats.submissions_count, 4);
}

#[tokio::test]
async fn unranked_user_stats_parse_with_absent_fields() {
    let mock_server = MockServer::start().await;
    let (client, _bearer) = signed_in_client(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/leaderboard/user/u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": "u2",
            "rank": null,
            "score": null,
            "percentile": null,
            "best_score": null
        })))
        .mount(&mock_server)
        .await;

    let stats = client.leaderboard().user_stats("u2").await.unwrap();

    assert_eq!(stats.rank, None);
    assert_eq!(stats.score, None);
    assert_eq!(stats.submissions_count, 0);
}

#[tokio::test]
async fn active_tournaments_are_listed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tournaments/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "tournament_id": "t1",
            "name": "Weekly Alpha",
            "description": "Predict next-week returns",
            "status": "active",
            "start_date": "2024-06-01T00:00:00Z",
            "end_date": "2024-06-08T00:00:00Z",
            "max_submissions": 5,
            "total_submissions": 132,
            "scoring_type": "spearman",
            "created_at": "2024-05-30T12:00:00Z",
            "updated_at": "2024-06-02T08:00:00Z"
        }])))
        .mount(&mock_server)
        .await;

    let client = IndiQuant::new_with_options(
        &mock_server.uri(),
        ClientOptions::default().with_persist_session(false),
    );

    let tournaments = client.tournaments().active().await.unwrap();

    assert_eq!(tournaments.len(), 1);
    assert_eq!(tournaments[0].tournament_id, "t1");
    assert_eq!(tournaments[0].status, TournamentStatus::Active);
    assert_eq!(tournaments[0].max_submissions, 5);
}

#[tokio::test]
async fn csv_submit_uploads_the_file_with_the_bearer_token() {
    let mock_server = MockServer::start().await;
    let (client, bearer) = signed_in_client(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/api/v1/submit/"))
        .and(query_param("tournament_id", "t1"))
        .and(header("Authorization", bearer.as_str()))
        .and(body_string_contains("id,prediction"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub-1",
            "created_at": "2024-06-02T09:00:00Z",
            "is_valid": true,
            "error_message": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let csv = b"id,prediction\n1,0.4\n2,0.6\n".to_vec();
    let receipt = client
        .submissions()
        .submit("t1", "predictions.csv", csv)
        .await
        .unwrap();

    assert_eq!(receipt.id, "sub-1");
    assert!(receipt.is_valid);
    assert_eq!(receipt.error_message, None);
}

#[tokio::test]
async fn rejected_csv_submit_surfaces_the_server_detail() {
    let mock_server = MockServer::start().await;
    let (client, _bearer) = signed_in_client(&mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/api/v1/submit/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": "missing prediction column"
        })))
        .mount(&mock_server)
        .await;

    let result = client
        .submissions()
        .submit("t1", "predictions.csv", b"id\n1\n".to_vec())
        .await;

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("422"));
}

#[tokio::test]
async fn batch_status_reports_pipeline_progress() {
    let mock_server = MockServer::start().await;
    let (client, bearer) = signed_in_client(&mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/submit/batch/status"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing",
            "progress": 62.5,
            "current_step": "scoring predictions",
            "predictions_queued": 48,
            "next_batch_run": "2024-06-02T12:00:00Z",
            "stats": {
                "total_submissions": 310,
                "profitable": 104,
                "neutral": 99,
                "trash": 107,
                "global_spearman": 0.021
            }
        })))
        .mount(&mock_server)
        .await;

    let status = client.submissions().batch_status().await.unwrap();

    assert_eq!(status.status, "processing");
    assert_eq!(status.predictions_queued, 48);
    let stats = status.stats.unwrap();
    assert_eq!(stats.total_submissions, 310);
    assert!(stats.global_spearman > 0.0);
}

#[tokio::test]
async fn health_probe_parses_the_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-06-02T09:00:00Z",
            "version": "1.4.2",
            "uptime_seconds": 86400,
            "dependencies": {
                "database": {"status": "healthy"},
                "queue": {"status": "healthy"}
            }
        })))
        .mount(&mock_server)
        .await;

    let client = IndiQuant::new_with_options(
        &mock_server.uri(),
        ClientOptions::default().with_persist_session(false),
    );

    let health = client.health().check().await.unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("1.4.2"));
    assert_eq!(health.dependencies.len(), 2);
}
