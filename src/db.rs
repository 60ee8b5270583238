pub mod document_store;
pub use document_store::{Document, DocumentStore, Filter, StoredDocument};
pub mod memory_store;
pub use memory_store::MemoryDocumentStore;
pub mod pg_store;
pub use pg_store::PgDocumentStore;

pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod clock_repo;
pub use clock_repo::ClockEventRepository;
pub mod device_repo;
pub use device_repo::DeviceRepository;
