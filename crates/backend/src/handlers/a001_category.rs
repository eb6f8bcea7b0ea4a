use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_category::aggregate::{
    Category, CategoryDto, CategoryId, CategorySearchItem, CategoryUpdateDto,
};
use contracts::shared::api::{ApiResponse, SearchQuery};
use serde_json::json;

use crate::domain::a001_category;
use crate::shared::data::db::get_connection;
use crate::shared::error::ServiceResult;

/// GET /api/categorias
pub async fn list_all() -> ServiceResult<Json<ApiResponse<Vec<Category>>>> {
    let items = a001_category::service::list(get_connection()?).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/categorias/:id
pub async fn get_by_id(
    path: Result<Path<i32>, PathRejection>,
) -> ServiceResult<Json<ApiResponse<Category>>> {
    let Path(id) = path?;
    let item = a001_category::service::get_by_id(get_connection()?, CategoryId(id)).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/categorias
pub async fn create(
    payload: Result<Json<CategoryDto>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let Json(dto) = payload?;
    let item = a001_category::service::create(get_connection()?, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(item, "Categoria criada com sucesso")),
    ))
}

/// PUT /api/categorias/:id
pub async fn update(
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CategoryUpdateDto>, JsonRejection>,
) -> ServiceResult<Json<ApiResponse<Category>>> {
    let Path(id) = path?;
    let Json(dto) = payload?;
    let item = a001_category::service::update(get_connection()?, CategoryId(id), dto).await?;
    Ok(Json(ApiResponse::with_message(
        item,
        "Categoria atualizada com sucesso",
    )))
}

/// PUT /api/categorias/:id/arquivar
pub async fn archive(path: Result<Path<i32>, PathRejection>) -> ServiceResult<Json<ApiResponse<()>>> {
    let Path(id) = path?;
    a001_category::service::archive(get_connection()?, CategoryId(id)).await?;
    Ok(Json(ApiResponse::message("Categoria arquivada com sucesso")))
}

/// GET /api/categorias/buscar?q=
pub async fn search(
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ServiceResult<Json<ApiResponse<Vec<CategorySearchItem>>>> {
    let Query(query) = query?;
    let items = a001_category::service::search(get_connection()?, &query).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// POST /api/categorias/testdata
pub async fn insert_test_data() -> ServiceResult<Json<ApiResponse<serde_json::Value>>> {
    let created = a001_category::service::insert_test_data(get_connection()?).await?;
    Ok(Json(ApiResponse::with_message(
        json!({ "categorias_criadas": created }),
        "Dados de teste inseridos",
    )))
}
