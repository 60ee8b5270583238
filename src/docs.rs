// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes ---
        handlers::companies::create_company,
        handlers::companies::list_companies,
        handlers::companies::update_company,
        handlers::companies::delete_company,
        handlers::companies::export_afd,

        // --- Tablet ---
        handlers::companies::login_tablet,
        handlers::companies::activate_device,

        // --- Funcionários ---
        handlers::employees::create_employee,
        handlers::employees::list_employees,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,

        // --- Ponto ---
        handlers::clock::register_clock,
        handlers::clock::employee_history,
    ),
    components(
        schemas(
            // --- Models ---
            models::company::CompanyStatus,
            models::company::Company,
            models::company::TabletLoginResponse,
            models::employee::Employee,
            models::clock::EventType,
            models::clock::ClockEvent,
            models::clock::ClockResponse,
            models::device::Device,

            // --- Payloads ---
            handlers::companies::CreateCompanyPayload,
            handlers::companies::UpdateCompanyPayload,
            handlers::companies::TabletLoginPayload,
            handlers::companies::ActivateDevicePayload,
            handlers::employees::CreateEmployeePayload,
            handlers::employees::UpdateEmployeePayload,
            handlers::clock::ClockPayload,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de empresas e exportação AFD"),
        (name = "Tablet", description = "Login e pareamento de tablets"),
        (name = "Funcionários", description = "Cadastro de funcionários"),
        (name = "Ponto", description = "Registro e histórico de batidas")
    )
)]
pub struct ApiDoc;
