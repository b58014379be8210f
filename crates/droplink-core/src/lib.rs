//! Core domain types for droplink: models, errors, configuration, and the
//! share-code generator. No I/O lives here.

pub mod code;
pub mod config;
pub mod error;
pub mod models;

pub use code::{normalize_code, CodeSource, RandomCode, CODE_LEN};
pub use config::Config;
pub use error::AppError;
pub use models::{FileGroup, StoredFile};
