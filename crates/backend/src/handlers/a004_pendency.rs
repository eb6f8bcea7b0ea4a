use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a004_pendency::aggregate::{
    PendencyDetails, PendencyDto, PendencyId, PendencyUpdateDto,
};
use contracts::shared::api::{ApiResponse, ListQuery, Page};

use crate::domain::a004_pendency;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceResult;

/// GET /api/pendencias?page=&per_page=&search=&arquivado=
pub async fn list_paginated(
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ServiceResult<Json<ApiResponse<Page<PendencyDetails>>>> {
    let Query(query) = query?;
    let page = a004_pendency::service::list(get_connection()?, &query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/pendencias/:id
pub async fn get_by_id(
    path: Result<Path<i32>, PathRejection>,
) -> ServiceResult<Json<ApiResponse<PendencyDetails>>> {
    let Path(id) = path?;
    let item = a004_pendency::service::get_by_id(get_connection()?, PendencyId(id)).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/pendencias
pub async fn create(
    payload: Result<Json<PendencyDto>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<ApiResponse<PendencyDetails>>)> {
    let Json(dto) = payload?;
    let item = a004_pendency::service::create(get_connection()?, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(item, "Pendência criada com sucesso")),
    ))
}

/// PUT /api/pendencias/:id
pub async fn update(
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<PendencyUpdateDto>, JsonRejection>,
) -> ServiceResult<Json<ApiResponse<PendencyDetails>>> {
    let Path(id) = path?;
    let Json(dto) = payload?;
    let item = a004_pendency::service::update(get_connection()?, PendencyId(id), dto).await?;
    Ok(Json(ApiResponse::with_message(
        item,
        "Pendência atualizada com sucesso",
    )))
}

/// PUT /api/pendencias/:id/arquivar
pub async fn archive(path: Result<Path<i32>, PathRejection>) -> ServiceResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    a004_pendency::service::set_archived(get_connection()?, PendencyId(id), true).await?;
    Ok(Json(ApiResponse::message("Pendência arquivada com sucesso")))
}

/// PUT /api/pendencias/:id/desarquivar
pub async fn unarchive(
    path: Result<Path<i32>, PathRejection>,
) -> ServiceResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    a004_pendency::service::set_archived(get_connection()?, PendencyId(id), false).await?;
    Ok(Json(ApiResponse::message("Pendência desarquivada com sucesso")))
}
