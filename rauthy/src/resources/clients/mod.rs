pub mod resource_client;
pub mod resource_client_secret;


pub use resource_client::ClientResource;
pub use resource_client_secret::ClientSecretResource;
