pub mod attachment;
pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod normalize;
pub mod pagination;
pub mod report;
pub mod validation;

pub use config::{ConfigError, RegistryConfig};
pub use error::RegistryError;
pub use filter::{AgeRange, FilterOptions, filter_applicants};
pub use form::{FormData, submit};
pub use pagination::{Page, paginate};
pub use validation::{ValidationError, validate, validate_age, validate_required};
