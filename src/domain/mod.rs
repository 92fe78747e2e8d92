// Domain layer - Pure TDR simulation models
pub mod cable;
pub mod error;
pub mod history;
pub mod metrics;
pub mod outcome;
pub mod waveform;
