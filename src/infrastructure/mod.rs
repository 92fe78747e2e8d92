// Infrastructure layer - External dependencies and adapters
pub mod catalog_store;
pub mod chunked_frames;
pub mod config;
pub mod export;
pub mod http_response;
