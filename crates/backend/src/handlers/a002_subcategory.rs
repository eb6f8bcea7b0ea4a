use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_category::aggregate::CategoryId;
use contracts::domain::a002_subcategory::aggregate::{
    Subcategory, SubcategoryDto, SubcategoryId, SubcategorySearchItem, SubcategoryUpdateDto,
};
use contracts::shared::api::{ApiResponse, SearchQuery};
use serde::Deserialize;

use crate::domain::a002_subcategory;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceResult;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub categoria_id: Option<i32>,
}

/// GET /api/subcategorias?categoria_id=
pub async fn list_all(
    params: Result<Query<ListParams>, QueryRejection>,
) -> ServiceResult<Json<ApiResponse<Vec<Subcategory>>>> {
    let Query(params) = params?;
    let items =
        a002_subcategory::service::list(get_connection()?, params.categoria_id.map(CategoryId))
            .await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/subcategorias/:id
pub async fn get_by_id(
    path: Result<Path<i32>, PathRejection>,
) -> ServiceResult<Json<ApiResponse<Subcategory>>> {
    let Path(id) = path?;
    let item = a002_subcategory::service::get_by_id(get_connection()?, SubcategoryId(id)).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/subcategorias
pub async fn create(
    payload: Result<Json<SubcategoryDto>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<ApiResponse<Subcategory>>)> {
    let Json(dto) = payload?;
    let item = a002_subcategory::service::create(get_connection()?, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(item, "Subcategoria criada com sucesso")),
    ))
}

/// PUT /api/subcategorias/:id
pub async fn update(
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SubcategoryUpdateDto>, JsonRejection>,
) -> ServiceResult<Json<ApiResponse<Subcategory>>> {
    let Path(id) = path?;
    let Json(dto) = payload?;
    let item =
        a002_subcategory::service::update(get_connection()?, SubcategoryId(id), dto).await?;
    Ok(Json(ApiResponse::with_message(
        item,
        "Subcategoria atualizada com sucesso",
    )))
}

/// PUT /api/subcategorias/:id/arquivar
pub async fn archive(path: Result<Path<i32>, PathRejection>) -> ServiceResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    a002_subcategory::service::archive(get_connection()?, SubcategoryId(id)).await?;
    Ok(Json(ApiResponse::message("Subcategoria arquivada com sucesso")))
}

/// GET /api/subcategorias/buscar?q=&categoria_id=
pub async fn search(
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ServiceResult<Json<ApiResponse<Vec<SubcategorySearchItem>>>> {
    let Query(query) = query?;
    let items = a002_subcategory::service::search(get_connection()?, &query).await?;
    Ok(Json(ApiResponse::ok(items)))
}
