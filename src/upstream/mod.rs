//! Client for the MLB Stats API: schedule listing, live-game hydration, and
//! the projection into the domain [`Game`](crate::dto::game::Game).

mod client;
mod error;
mod fields;
mod models;
mod projection;

pub use client::MlbClient;
pub use error::UpstreamError;
