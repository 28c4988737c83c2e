use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use application::usecases::clients::{ClientUseCase, InsertClientModel};
use domain::repositories::clients::ClientRepository;
use infra::postgres::{
    postgres_connection::PgPoolSquad, repositories::clients::ClientPostgres,
};

use crate::{auth::AuthCompany, axum_http::error_responses::error_response};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let client_repository = ClientPostgres::new(Arc::clone(&db_pool));
    let clients_usecase = ClientUseCase::new(Arc::new(client_repository));

    Router::new()
        .route("/", post(create_client).get(list_clients))
        .route("/:client_id/deactivate", post(deactivate_client))
        .with_state(Arc::new(clients_usecase))
}

pub async fn create_client<C>(
    State(clients_usecase): State<Arc<ClientUseCase<C>>>,
    auth: AuthCompany,
    Json(insert_client_model): Json<InsertClientModel>,
) -> impl IntoResponse
where
    C: ClientRepository + Send + Sync + 'static,
{
    match clients_usecase
        .create_client(auth.company_id, insert_client_model)
        .await
    {
        Ok(client_id) => (StatusCode::CREATED, Json(json!({ "id": client_id }))).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_clients<C>(
    State(clients_usecase): State<Arc<ClientUseCase<C>>>,
    auth: AuthCompany,
) -> impl IntoResponse
where
    C: ClientRepository + Send + Sync + 'static,
{
    match clients_usecase.list_clients(auth.company_id).await {
        Ok(clients) => (StatusCode::OK, Json(clients)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn deactivate_client<C>(
    State(clients_usecase): State<Arc<ClientUseCase<C>>>,
    auth: AuthCompany,
    Path(client_id): Path<Uuid>,
) -> impl IntoResponse
where
    C: ClientRepository + Send + Sync + 'static,
{
    match clients_usecase
        .deactivate_client(auth.company_id, client_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
