// Application layer - Use cases over the domain
pub mod cable_repository;
pub mod catalog_service;
pub mod outcome_generator;
pub mod streaming_service;
pub mod test_session;
