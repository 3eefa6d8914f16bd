//! Contract endpoints.

use super::AppState;
use crate::domain::error::{success, ApiError};
use crate::domain::types::{
    CreateContractRequest, DeleteContractRequest, ListContractsQuery, SignStepRequest,
    SignatureStatusQuery, UpdateContractRequest,
};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use covenant_core::{CreateContractInput, SignStepInput, UpdateContractInput};

/// `POST /contract` - create a contract.
pub async fn create_contract(
    State(state): State<AppState>,
    Json(request): Json<CreateContractRequest>,
) -> Result<Response, ApiError> {
    let input = CreateContractInput {
        title: request.title,
        description: request.description,
        participants: request.participants,
        steps: request.steps,
        product_uuid: request.product_uuid,
        bdo_location: request.bdo_location,
    };
    let contract = state.service.create_contract(&request.auth, input).await?;
    Ok(success(contract))
}

/// `GET /contract/:uuid` - fetch. Contracts are public-readable by uuid.
pub async fn get_contract(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Response, ApiError> {
    let contract = state.service.get_contract(&uuid).await?;
    Ok(success(contract))
}

/// `GET /contract/:uuid/progress` - derived completion counters.
pub async fn contract_progress(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Response, ApiError> {
    let progress = state.service.contract_progress(&uuid).await?;
    Ok(success(progress))
}

/// `GET /contract/:uuid/status?user=pk` - one participant's signing state.
pub async fn signature_status(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Query(query): Query<SignatureStatusQuery>,
) -> Result<Response, ApiError> {
    let status = state.service.signature_status(&uuid, &query.user).await?;
    Ok(success(status))
}

/// `PUT /contract/:uuid` - update mutable fields.
pub async fn update_contract(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Json(request): Json<UpdateContractRequest>,
) -> Result<Response, ApiError> {
    let input = UpdateContractInput {
        title: request.title,
        description: request.description,
        steps: request.steps,
        status: request.status,
    };
    let contract = state
        .service
        .update_contract(&uuid, &request.auth, input)
        .await?;
    Ok(success(contract))
}

/// `PUT /contract/:uuid/sign` - sign a step with the dual-signature
/// protocol.
pub async fn sign_step(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Json(request): Json<SignStepRequest>,
) -> Result<Response, ApiError> {
    let input = SignStepInput {
        step_id: request.step_id,
        step_signature: request.step_signature,
    };
    let outcome = state.service.sign_step(&uuid, &request.auth, input).await?;
    Ok(success(outcome))
}

/// `DELETE /contract/:uuid` - creator only.
pub async fn delete_contract(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Json(request): Json<DeleteContractRequest>,
) -> Result<Response, ApiError> {
    state.service.delete_contract(&uuid, &request.auth).await?;
    Ok(success(serde_json::json!({ "uuid": uuid, "deleted": true })))
}

/// `GET /contracts?participant=pk` - summaries, newest update first.
pub async fn list_contracts(
    State(state): State<AppState>,
    Query(query): Query<ListContractsQuery>,
) -> Result<Response, ApiError> {
    let summaries = state
        .service
        .list_contracts(query.participant.as_deref())
        .await?;
    Ok(success(summaries))
}
