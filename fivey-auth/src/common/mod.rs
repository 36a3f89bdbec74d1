pub mod models;

pub use models::Credentials;
