use axum::http::{header, Method};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers;
use crate::system::middleware::request_logger::request_logger;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // TAXONOMY
        // ========================================
        .route(
            "/api/categorias",
            get(handlers::a001_category::list_all).post(handlers::a001_category::create),
        )
        .route(
            "/api/categorias/buscar",
            get(handlers::a001_category::search),
        )
        .route(
            "/api/categorias/testdata",
            post(handlers::a001_category::insert_test_data),
        )
        .route(
            "/api/categorias/:id",
            get(handlers::a001_category::get_by_id).put(handlers::a001_category::update),
        )
        .route(
            "/api/categorias/:id/arquivar",
            put(handlers::a001_category::archive),
        )
        .route(
            "/api/subcategorias",
            get(handlers::a002_subcategory::list_all).post(handlers::a002_subcategory::create),
        )
        .route(
            "/api/subcategorias/buscar",
            get(handlers::a002_subcategory::search),
        )
        .route(
            "/api/subcategorias/:id",
            get(handlers::a002_subcategory::get_by_id).put(handlers::a002_subcategory::update),
        )
        .route(
            "/api/subcategorias/:id/arquivar",
            put(handlers::a002_subcategory::archive),
        )
        // ========================================
        // RECORDS
        // ========================================
        .route(
            "/api/prospeccoes",
            get(handlers::a003_prospect::list_paginated).post(handlers::a003_prospect::create),
        )
        .route(
            "/api/prospeccoes/:id",
            get(handlers::a003_prospect::get_by_id)
                .put(handlers::a003_prospect::update)
                .delete(handlers::a003_prospect::delete),
        )
        .route(
            "/api/prospeccoes/:id/arquivar",
            put(handlers::a003_prospect::archive),
        )
        .route(
            "/api/prospeccoes/:id/desarquivar",
            put(handlers::a003_prospect::unarchive),
        )
        .route(
            "/api/pendencias",
            get(handlers::a004_pendency::list_paginated).post(handlers::a004_pendency::create),
        )
        .route(
            "/api/pendencias/:id",
            get(handlers::a004_pendency::get_by_id).put(handlers::a004_pendency::update),
        )
        .route(
            "/api/pendencias/:id/arquivar",
            put(handlers::a004_pendency::archive),
        )
        .route(
            "/api/pendencias/:id/desarquivar",
            put(handlers::a004_pendency::unarchive),
        )
}

/// Full application: API routes, bundled frontend, request logging and CORS
pub fn build_app(static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Unknown paths go to the SPA entry point
    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    configure_routes()
        .fallback_service(frontend)
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}
