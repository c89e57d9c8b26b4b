use std::time::Instant;

use shared::proto::{
    results_service_server::ResultsService, IdResultRequest, ResultCreateRequest, ResultRequest,
    ResultResponse,
};
use shared::ResultId;
use tonic::{Request, Response, Status};

use super::convert::{result_from_create, result_from_request, result_to_response};
use super::reject;
use crate::repository::ResultRepository;
use crate::service::ResultService;

const SERVICE: &str = "results";

pub struct ResultServerImpl<R> {
    service: ResultService<R>,
}

impl<R: ResultRepository> ResultServerImpl<R> {
    pub fn new(service: ResultService<R>) -> Self {
        Self { service }
    }

    async fn fetch_result(&self, req: IdResultRequest) -> Result<ResultResponse, Status> {
        let id = ResultId::from_string(&req.id).map_err(|e| reject("FetchById", e))?;

        let result = self
            .service
            .fetch_by_id(id)
            .await
            .map_err(|e| reject("FetchById", e))?;

        Ok(result_to_response(result))
    }

    async fn delete_result(&self, req: IdResultRequest) -> Result<(), Status> {
        let id = ResultId::from_string(&req.id).map_err(|e| reject("DeleteById", e))?;

        self.service
            .delete_by_id(id)
            .await
            .map_err(|e| reject("DeleteById", e))
    }

    async fn update_result(&self, req: ResultRequest) -> Result<(), Status> {
        let result = result_from_request(&req).map_err(|e| reject("Update", e))?;

        self.service
            .update(&result)
            .await
            .map_err(|e| reject("Update", e))
    }

    async fn create_result(&self, req: ResultCreateRequest) -> Result<(), Status> {
        let result = result_from_create(&req).map_err(|e| reject("Create", e))?;

        self.service
            .create(&result)
            .await
            .map_err(|e| reject("Create", e))
    }
}

#[tonic::async_trait]
impl<R: ResultRepository + 'static> ResultsService for ResultServerImpl<R> {
    async fn fetch_by_id(
        &self,
        request: Request<IdResultRequest>,
    ) -> Result<Response<ResultResponse>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(id = %req.id, "FetchById result request");

        let outcome = self.fetch_result(req).await;
        shared::record_rpc(SERVICE, "FetchById", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }

    async fn delete_by_id(
        &self,
        request: Request<IdResultRequest>,
    ) -> Result<Response<()>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(id = %req.id, "DeleteById result request");

        let outcome = self.delete_result(req).await;
        shared::record_rpc(SERVICE, "DeleteById", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }

    async fn update(
        &self,
        request: Request<ResultRequest>,
    ) -> Result<Response<()>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(
            id = %req.id,
            game_id = %req.game_id,
            winner_id = %req.winner_id,
            "Update result request"
        );

        let outcome = self.update_result(req).await;
        shared::record_rpc(SERVICE, "Update", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }

    async fn create(
        &self,
        request: Request<ResultCreateRequest>,
    ) -> Result<Response<()>, Status> {
        let started = Instant::now();
        let req = request.into_inner();

        tracing::debug!(
            game_id = %req.game_id,
            winner_id = %req.winner_id,
            "Create result request"
        );

        let outcome = self.create_result(req).await;
        shared::record_rpc(SERVICE, "Create", started.elapsed(), outcome.is_ok());
        outcome.map(Response::new)
    }
}
