/// Domain model for games and the snapshot/update envelopes.
pub mod game;
/// Health check data structures.
pub mod health;
/// Server-Sent Events data structures.
pub mod sse;
