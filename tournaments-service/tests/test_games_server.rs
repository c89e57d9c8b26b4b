mod common;

use std::time::Duration;

use common::{new_year_2024, timestamp, InMemoryGameRepository, SlowGameRepository};
use shared::proto::games_service_server::GamesService;
use shared::proto::{GameCreateRequest, GameRequest, IdGameRequest};
use shared::{Game, GameId, GameTypeId};
use tonic::{Code, Request};
use tournaments_service::{GameServerImpl, GameService, DEFAULT_REQUEST_TIMEOUT};

fn server(repo: &InMemoryGameRepository) -> GameServerImpl<InMemoryGameRepository> {
    GameServerImpl::new(GameService::new(repo.clone(), DEFAULT_REQUEST_TIMEOUT))
}

fn id_request(id: impl ToString) -> Request<IdGameRequest> {
    Request::new(IdGameRequest { id: id.to_string() })
}

#[tokio::test]
async fn test_create_then_fetch_returns_same_fields() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);
    let game_type_id = GameTypeId::new();

    server
        .create(Request::new(GameCreateRequest {
            game_start: Some(timestamp(new_year_2024())),
            game_type_id: game_type_id.to_string(),
        }))
        .await
        .expect("create should succeed");

    let stored = repo.snapshot();
    assert_eq!(stored.len(), 1);
    let created = &stored[0];

    let response = server
        .fetch_by_id(id_request(created.id))
        .await
        .expect("fetch should succeed")
        .into_inner();

    assert_eq!(response.id, created.id.to_string());
    assert_eq!(response.game_start, Some(timestamp(new_year_2024())));
    assert_eq!(response.game_type_id, game_type_id.to_string());
}

#[tokio::test]
async fn test_create_keeps_microsecond_precision() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);

    server
        .create(Request::new(GameCreateRequest {
            game_start: Some(prost_types::Timestamp {
                seconds: 1_704_067_200,
                nanos: 123_456_789,
            }),
            game_type_id: GameTypeId::new().to_string(),
        }))
        .await
        .unwrap();

    let id = repo.snapshot()[0].id;
    let response = server.fetch_by_id(id_request(id)).await.unwrap().into_inner();

    assert_eq!(
        response.game_start,
        Some(prost_types::Timestamp {
            seconds: 1_704_067_200,
            nanos: 123_456_000,
        })
    );
}

#[tokio::test]
async fn test_create_fetch_delete_lifecycle() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);

    server
        .create(Request::new(GameCreateRequest {
            game_start: Some(timestamp(new_year_2024())),
            game_type_id: GameTypeId::new().to_string(),
        }))
        .await
        .unwrap();
    let id = repo.snapshot()[0].id;

    assert!(server.fetch_by_id(id_request(id)).await.is_ok());

    server.delete_by_id(id_request(id)).await.expect("delete should succeed");

    let status = server.fetch_by_id(id_request(id)).await.unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_unknown_id_fetch_is_not_found_but_delete_succeeds() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);
    let unknown = GameId::new();

    let status = server.fetch_by_id(id_request(unknown)).await.unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    server
        .delete_by_id(id_request(unknown))
        .await
        .expect("deleting an unknown game is not an error");
}

#[tokio::test]
async fn test_update_without_start_keeps_start_and_replaces_type() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);
    let original = Game::new(new_year_2024(), GameTypeId::new());
    repo.insert(original.clone());
    let new_type = GameTypeId::new();

    server
        .update(Request::new(GameRequest {
            id: original.id.to_string(),
            game_start: None,
            game_type_id: new_type.to_string(),
        }))
        .await
        .expect("update should succeed");

    let response = server.fetch_by_id(id_request(original.id)).await.unwrap().into_inner();
    assert_eq!(response.game_start, Some(timestamp(new_year_2024())));
    assert_eq!(response.game_type_id, new_type.to_string());
}

#[tokio::test]
async fn test_update_with_epoch_start_overwrites() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);
    let original = Game::new(new_year_2024(), GameTypeId::new());
    repo.insert(original.clone());

    server
        .update(Request::new(GameRequest {
            id: original.id.to_string(),
            game_start: Some(prost_types::Timestamp { seconds: 0, nanos: 0 }),
            game_type_id: original.game_type_id.to_string(),
        }))
        .await
        .unwrap();

    let response = server.fetch_by_id(id_request(original.id)).await.unwrap().into_inner();
    assert_eq!(response.game_start, Some(prost_types::Timestamp { seconds: 0, nanos: 0 }));
}

#[tokio::test]
async fn test_update_unknown_game_is_not_found() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);

    let status = server
        .update(Request::new(GameRequest {
            id: GameId::new().to_string(),
            game_start: None,
            game_type_id: GameTypeId::new().to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_malformed_ids_are_rejected_before_storage() {
    let repo = InMemoryGameRepository::default();
    let existing = Game::new(new_year_2024(), GameTypeId::new());
    repo.insert(existing.clone());
    let server = server(&repo);

    let status = server.fetch_by_id(id_request("not-a-uuid")).await.unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = server.delete_by_id(id_request("")).await.unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = server
        .update(Request::new(GameRequest {
            id: existing.id.to_string(),
            game_start: None,
            game_type_id: "12345".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = server
        .create(Request::new(GameCreateRequest {
            game_start: Some(timestamp(new_year_2024())),
            game_type_id: "zzz".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    assert_eq!(repo.calls(), 0, "no call should reach storage");
    assert_eq!(repo.snapshot(), vec![existing]);
}

#[tokio::test]
async fn test_create_rejects_missing_or_invalid_start() {
    let repo = InMemoryGameRepository::default();
    let server = server(&repo);

    let status = server
        .create(Request::new(GameCreateRequest {
            game_start: None,
            game_type_id: GameTypeId::new().to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = server
        .create(Request::new(GameCreateRequest {
            game_start: Some(prost_types::Timestamp {
                seconds: 0,
                nanos: 2_000_000_000,
            }),
            game_type_id: GameTypeId::new().to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    assert!(repo.snapshot().is_empty());
}

#[tokio::test]
async fn test_slow_storage_hits_deadline() {
    let inner = InMemoryGameRepository::default();
    let slow = SlowGameRepository {
        inner: inner.clone(),
        delay: Duration::from_secs(5),
    };
    let server = GameServerImpl::new(GameService::new(slow, Duration::from_millis(20)));

    let status = server
        .create(Request::new(GameCreateRequest {
            game_start: Some(timestamp(new_year_2024())),
            game_type_id: GameTypeId::new().to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::DeadlineExceeded);
    assert!(status.message().contains("service.games.create"));
    assert!(inner.snapshot().is_empty(), "abandoned call must not write");
}
