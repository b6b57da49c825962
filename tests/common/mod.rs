//! Common test infrastructure
//!
//! End-to-end tests talk to a fake Spotify Web API served on a random local
//! port, and drive the orchestrator with a scripted model.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{FakeSpotify, TEST_TOKEN};
//!
//! #[tokio::test]
//! async fn test_genres() {
//!     let fake = FakeSpotify::spawn().await;
//!     let client = fake.client();
//!     // ...
//! }
//! ```

mod constants;
mod model;
mod server;

pub use constants::*;
#[allow(unused_imports)]
pub use model::ScriptedModel;
pub use server::FakeSpotify;
