// crudboard-api: Async Rust client for the users/posts REST resource service

pub mod client;
pub mod error;
pub mod resource;
pub mod transport;

pub use client::ResourceClient;
pub use error::Error;
pub use resource::Resource;
pub use transport::TransportConfig;
