pub mod api_response;
pub mod route_dto;
