pub mod app;
pub mod error;
pub mod http_routes;
