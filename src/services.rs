pub mod afd_service;
pub use afd_service::AfdService;
pub mod clock_resolver;
pub mod clock_service;
pub use clock_service::ClockService;
pub mod company_service;
pub use company_service::CompanyService;
pub mod employee_service;
pub use employee_service::EmployeeService;
