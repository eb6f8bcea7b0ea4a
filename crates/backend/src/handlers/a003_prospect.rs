use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a003_prospect::aggregate::{
    ProspectDetails, ProspectDto, ProspectId, ProspectUpdateDto,
};
use contracts::shared::api::{ApiResponse, ListQuery, Page};

use crate::domain::a003_prospect;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceResult;

/// GET /api/prospeccoes?page=&per_page=&search=&arquivado=
pub async fn list_paginated(
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ServiceResult<Json<ApiResponse<Page<ProspectDetails>>>> {
    let Query(query) = query?;
    let page = a003_prospect::service::list(get_connection()?, &query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/prospeccoes/:id
pub async fn get_by_id(
    path: Result<Path<i32>, PathRejection>,
) -> ServiceResult<Json<ApiResponse<ProspectDetails>>> {
    let Path(id) = path?;
    let item = a003_prospect::service::get_by_id(get_connection()?, ProspectId(id)).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/prospeccoes
pub async fn create(
    payload: Result<Json<ProspectDto>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<ApiResponse<ProspectDetails>>)> {
    let Json(dto) = payload?;
    let item = a003_prospect::service::create(get_connection()?, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(item, "Prospecção criada com sucesso")),
    ))
}

/// PUT /api/prospeccoes/:id
pub async fn update(
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ProspectUpdateDto>, JsonRejection>,
) -> ServiceResult<Json<ApiResponse<ProspectDetails>>> {
    let Path(id) = path?;
    let Json(dto) = payload?;
    let item = a003_prospect::service::update(get_connection()?, ProspectId(id), dto).await?;
    Ok(Json(ApiResponse::with_message(
        item,
        "Prospecção atualizada com sucesso",
    )))
}

/// DELETE /api/prospeccoes/:id
pub async fn delete(path: Result<Path<i32>, PathRejection>) -> ServiceResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    a003_prospect::service::delete(get_connection()?, ProspectId(id)).await?;
    Ok(Json(ApiResponse::message("Prospecção excluída com sucesso")))
}

/// PUT /api/prospeccoes/:id/arquivar
pub async fn archive(path: Result<Path<i32>, PathRejection>) -> ServiceResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    a003_prospect::service::set_archived(get_connection()?, ProspectId(id), true).await?;
    Ok(Json(ApiResponse::message("Prospecção arquivada com sucesso")))
}

/// PUT /api/prospeccoes/:id/desarquivar
pub async fn unarchive(
    path: Result<Path<i32>, PathRejection>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    a003_prospect::service::set_archived(get_connection()?, ProspectId(id), false).await?;
    Ok(Json(ApiResponse::message("Prospecção desarquivada com sucesso")))
}
