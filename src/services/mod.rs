pub mod games_service;
pub mod health_service;
pub mod sse_service;
