use axum::{Json, extract::State, response::Response};
use axum::response::IntoResponse;
use tracing::{debug, instrument};

use verdict::pipeline::StatsSnapshot;
use verdict::vectordb::VectorSearchBackend;

use crate::gateway::error::GatewayError;
use crate::gateway::payload::AskRequest;
use crate::gateway::state::HandlerState;

/// `POST /ask`: runs one query through the pipeline.
#[instrument(skip(state, request), fields(policy_id = request.policy_id.as_deref()))]
pub async fn ask_handler<B>(
    State(state): State<HandlerState<B>>,
    Json(request): Json<AskRequest>,
) -> Result<Response, GatewayError>
where
    B: VectorSearchBackend + 'static,
{
    debug!("Processing ask request");

    let response = state
        .pipeline
        .ask(&request.query, request.policy_id.as_deref())
        .await?;

    Ok(Json(response).into_response())
}

/// `GET /stats`: counters over responses served since startup.
#[instrument(skip(state))]
pub async fn stats_handler<B>(State(state): State<HandlerState<B>>) -> Json<StatsSnapshot>
where
    B: VectorSearchBackend + 'static,
{
    Json(state.pipeline.stats())
}
