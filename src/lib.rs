pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc};

/// Monta todas as rotas da API sobre o estado já construído.
pub fn build_router(app_state: AppState) -> Router {
    let company_routes = Router::new()
        .route("/"
               ,post(handlers::companies::create_company)
               .get(handlers::companies::list_companies)
        )
        .route("/login-tablet", post(handlers::companies::login_tablet))
        .route("/ativar-dispositivo", post(handlers::companies::activate_device))
        .route("/{id}"
               ,put(handlers::companies::update_company)
               .delete(handlers::companies::delete_company)
        )
        .route("/{id}/afd", get(handlers::companies::export_afd));

    // O mesmo segmento serve de cliente_id (GET) e de CPF (PUT/DELETE)
    let employee_routes = Router::new()
        .route("/", post(handlers::employees::create_employee))
        .route("/{id}"
               ,get(handlers::employees::list_employees)
               .put(handlers::employees::update_employee)
               .delete(handlers::employees::delete_employee)
        );

    let clock_routes = Router::new()
        .route("/", post(handlers::clock::register_clock))
        .route("/registrar", post(handlers::clock::register_clock))
        .route("/funcionario/{cpf}", get(handlers::clock::employee_history));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clientes", company_routes)
        .nest("/api/funcionarios", employee_routes)
        .nest("/api/ponto", clock_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
