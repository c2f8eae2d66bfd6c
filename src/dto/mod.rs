//! DTOs del gateway
//!
//! Borradores de formulario que viajan como body de las peticiones POST
//! y el envelope genérico de las respuestas.

pub mod api_response;
pub mod maintenance_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
pub use maintenance_dto::MaintenanceDraft;
pub use vehicle_dto::VehicleDraft;
