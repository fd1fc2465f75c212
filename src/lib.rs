//! Normalizes movie/TV metadata from heterogeneous provider payloads
//! into one Movie aggregate and performs catalog lookups with title,
//! fuzzy-title and year disambiguation.

pub mod adapter;
pub mod builder;
pub mod config;
pub mod movie;
pub mod repository;

pub use adapter::{Adapter, HttpAdapter};
pub use builder::{MovieBuilder, ProviderPayload};
pub use movie::{Episode, Movie, MovieType, NotFoundError, Source, SourceKind};
pub use repository::{MovieRepository, SearchMode};
