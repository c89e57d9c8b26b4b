use std::time::Instant;

use shared::proto::{
    games_service_server::GamesService, GameCreateRequest, GameRequest, GameResponse,
    IdGameRequest,
};
use shared::GameId;
use tonic::{Request, Response, Status};

use super::convert::{game_from_create, game_to_response, game_update_from_request};
use super::reject;
use crate::repository::GameRepository;
use crate::service::GameService;

const SERVICE: &str = "games";

pub struct GameServerImpl<R> {
    service: GameService<R>,
}

impl<R: GameRepository> GameServerImpl<R> {
    pub fn new(service: GameService<R>) -> Self {
        Self { service }
    }

    async fn fetch_game(&self, req: IdGameRequest) -> Result<GameResponse, Status> {
        let id = GameId::from_string(&req.id).map_err(|e| reject("FetchById", e))?;

        let game = self
            .service
            .fetch_by_id(id)
            .await
            .map_err(|e| reject("FetchById", e))?;

        game_to_response(&game).map_err(|e| reject("FetchById", e))
    }

    async fn delete_game(&self, req: IdGameRequest) -> Result<(), Status> {
        let id = GameId::from_string(&req.id).map_err(|e| reject("DeleteById", e))?;

        self.service
            .delete_by_id(id)
            .await
            .map_err(|e| reject("DeleteById", e))
    }

    async fn update_game(&self, req: GameRequest) -> Result<(), Status> {
        let update = game_update_from_request(&req).map_err(|e| reject("Update", e))?;

        self.service
            .update(&update)
            .await
            .map_err(|e| reject("Update", e))
    }

    // The generated id is not part of the response contract.
    async fn create_game(&self, req: GameCreateRequest) -> Result<(), Status> {
        let game = game_from_create(&req).map_err(|e| reject("Create", e))?;

        self.service
            .create(&game)
            .await
            .map_err(|e| reject("Create", e))
    }
}

#[tonic::async_trait]
impl<R: GameRepository + 'static> GamesService for GameServerImpl<R> {
    async fn fetch_by_id(
        &self,
        request: Request<IdGameRequest>,
    ) -> Result<Response<GameResponse>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(id = %req.id, "FetchById game request");

        let outcome = self.fetch_game(req).await;
        shared::record_rpc(SERVICE, "FetchById", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }

    async fn delete_by_id(
        &self,
        request: Request<IdGameRequest>,
    ) -> Result<Response<()>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(id = %req.id, "DeleteById game request");

        let outcome = self.delete_game(req).await;
        shared::record_rpc(SERVICE, "DeleteById", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }

    async fn update(
        &self,
        request: Request<GameRequest>,
    ) -> Result<Response<()>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(
            id = %req.id,
            game_type_id = %req.game_type_id,
            has_game_start = req.game_start.is_some(),
            "Update game request"
        );

        let outcome = self.update_game(req).await;
        shared::record_rpc(SERVICE, "Update", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }

    async fn create(
        &self,
        request: Request<GameCreateRequest>,
    ) -> Result<Response<()>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(game_type_id = %req.game_type_id, "Create game request");

        let outcome = self.create_game(req).await;
        shared::record_rpc(SERVICE, "Create", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }
}
