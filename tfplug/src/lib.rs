//! tfplug - Terraform plugin lifecycle interface for Rust
//!
//! The traits and value types a provider implements to plug into a Terraform
//! plugin host: providers, resources, data sources, schemas, and the
//! schema-driven validation and planning the host performs around them.
//! The host itself (gRPC protocol, handshake) lives elsewhere.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod defaults;
pub mod import;
pub mod plan;
pub mod plan_modifier;
pub mod validation;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_id;
pub use plan::{plan_resource_change, PlannedChange};
pub use provider::{Provider, ProviderMetadataRequest, ProviderMetadataResponse};
pub use resource::{Resource, ResourceWithConfigure};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{Diagnostic, Dynamic, DynamicValue};
pub use validation::validate_config;
