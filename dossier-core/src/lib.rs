//! dossier-core: session, routing and backend access for the dossier console.
pub mod api;
pub mod claims;
pub mod client;
pub mod error;
pub mod export;
pub mod filter;
pub mod guard;
pub mod models;
pub mod normalize;
pub mod observability;
pub mod resolver;
pub mod role;
pub mod session;

pub use async_trait;
pub use secrecy;
pub use validator;

pub use client::ApiClient;
pub use error::ConsoleError;
pub use resolver::{resolve, Candidate, FallbackPolicy, Resolution};
pub use role::Role;
pub use session::{Session, SessionStore};
