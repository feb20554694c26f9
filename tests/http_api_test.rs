//! Tests for the REST API.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::NamedTempFile;
use tower::ServiceExt;

use tictactoe_service::{AppState, GameRepository, OpponentPolicy, router};

fn setup_app() -> (NamedTempFile, GameRepository, Router) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    let app = router(AppState::new(repo.clone(), OpponentPolicy::FirstEmpty, None));
    (db_file, repo, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn start(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/startgame", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Game initiated");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_start_and_get_game() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;

    let (status, game) = send(&app, "GET", &format!("/api/getgame/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["id"], id.as_str());
    assert_eq!(game["board"], json!([["", "", ""], ["", "", ""], ["", "", ""]]));
    assert_eq!(game["currentPlayer"], "X");
    assert_eq!(game["status"], "playing");
    assert_eq!(game["winner"], Value::Null);
}

#[tokio::test]
async fn test_unknown_game_is_404() {
    let (_db, _repo, app) = setup_app();
    let (status, body) = send(&app, "GET", "/api/getgame/missing1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Game not found");

    let (status, _) = send(&app, "POST", "/api/move/missing1", Some(json!({"number": 5}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_triggers_system_reply() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;

    let (status, game) = send(
        &app,
        "POST",
        &format!("/api/move/{id}"),
        Some(json!({"number": 5, "player": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["board"], json!([["O", "", ""], ["", "X", ""], ["", "", ""]]));
    assert_eq!(game["currentPlayer"], "X");
    assert_eq!(game["version"], 1);
}

#[tokio::test]
async fn test_player_defaults_to_x() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;

    let (status, game) = send(&app, "POST", &format!("/api/move/{id}"), Some(json!({"number": 9}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["board"][2][2], "X");
}

#[tokio::test]
async fn test_move_errors() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;
    let uri = format!("/api/move/{id}");

    let (status, body) = send(&app, "POST", &uri, Some(json!({"number": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("between 1 and 9"));

    let (status, body) = send(&app, "POST", &uri, Some(json!({"number": 5, "player": "O"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Not your turn");

    send(&app, "POST", &uri, Some(json!({"number": 5}))).await;
    let (status, body) = send(&app, "POST", &uri, Some(json!({"number": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid move!");
}

#[tokio::test]
async fn test_game_played_to_a_win() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;
    let uri = format!("/api/move/{id}");

    // The first-empty opponent answers 1 then 2; X takes the anti-diagonal.
    for n in [5, 3] {
        let (status, _) = send(&app, "POST", &uri, Some(json!({"number": n}))).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, game) = send(&app, "POST", &uri, Some(json!({"number": 7}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["status"], "finished");
    assert_eq!(game["winner"], "X");

    let (status, body) = send(&app, "POST", &uri, Some(json!({"number": 9}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Game is already over");
}

#[tokio::test]
async fn test_end_game() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;

    let (status, body) = send(&app, "POST", &format!("/api/endgame/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Game Over");
    assert_eq!(body["game"]["status"], "finished");
    assert_eq!(body["game"]["winner"], Value::Null);

    let (status, _) = send(&app, "POST", &format!("/api/move/{id}"), Some(json!({"number": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owned_game_requires_owner() {
    let (_db, repo, app) = setup_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/startgame",
        Some(json!({"name": "Ana", "phoneNumber": "5511999990000"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/move/{id}");

    let owner = repo.find_player_by_phone("5511999990000").unwrap().unwrap();
    let game = repo.load_game(&id).unwrap().unwrap();
    assert_eq!(*game.owner_id(), Some(*owner.id()));

    let (status, _) = send(&app, "POST", &uri, Some(json!({"number": 5}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(json!({"number": 5, "phoneNumber": "5511888880000"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(json!({"number": 5, "phoneNumber": "55 11 99999-0000"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_get_player() {
    let (_db, _repo, app) = setup_app();

    let (status, player) = send(
        &app,
        "POST",
        "/api/players",
        Some(json!({"name": "Ana", "phoneNumber": "5511999990000"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(player["name"], "Ana");
    assert_eq!(player["phoneNumber"], "5511999990000");

    let (status, found) = send(&app, "GET", "/api/players/5511999990000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], player["id"]);

    let (status, _) = send(&app, "GET", "/api/players/123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/players",
        Some(json!({"name": " ", "phoneNumber": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_game_without_phone_is_anonymous() {
    let (_db, repo, app) = setup_app();

    for body in [json!({}), json!({"name": "Ana"}), json!({"name": "Ana", "phoneNumber": "--"})] {
        let (status, created) = send(&app, "POST", "/api/startgame", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap();
        let game = repo.load_game(id).unwrap().unwrap();
        assert_eq!(*game.owner_id(), None);
    }
    assert!(repo.find_player_by_phone("").unwrap().is_none());
}

#[tokio::test]
async fn test_register_rejects_blank_phone() {
    let (_db, _repo, app) = setup_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/players",
        Some(json!({"name": "Ana", "phoneNumber": "( - )"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("phoneNumber"));
}

#[tokio::test]
async fn test_malformed_body_gets_message() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/move/{id}"),
        Some(json!({"number": "five"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, "POST", "/api/players", Some(json!({"name": "Ana"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_finished_game_reported_before_position() {
    let (_db, _repo, app) = setup_app();
    let id = start(&app).await;
    send(&app, "POST", &format!("/api/endgame/{id}"), None).await;

    let (status, body) = send(&app, "POST", &format!("/api/move/{id}"), Some(json!({"number": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Game is already over");
}

#[tokio::test]
async fn test_seeded_random_opponent_draws_one_stream() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let repo = GameRepository::new(db_file.path().to_str().unwrap().to_string()).unwrap();
    repo.run_migrations().expect("Migrations failed");
    let app = router(AppState::new(repo, OpponentPolicy::Random, Some(7)));

    // Identical openings on fresh games: the replies keep drawing from the
    // same generator instead of restarting it for every move.
    let mut replies = Vec::new();
    for _ in 0..8 {
        let id = start(&app).await;
        let (status, game) = send(&app, "POST", &format!("/api/move/{id}"), Some(json!({"number": 1}))).await;
        assert_eq!(status, StatusCode::OK);

        let cells: Vec<&str> = game["board"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|row| row.as_array().unwrap().iter().map(|c| c.as_str().unwrap()))
            .collect();
        assert_eq!(cells[0], "X");
        let reply = cells.iter().position(|c| *c == "O").unwrap();
        assert_ne!(reply, 0);
        replies.push(reply);
    }

    replies.sort_unstable();
    replies.dedup();
    assert!(replies.len() > 1, "every game got the same reply: {:?}", replies);
}
