//! Message Schemas
//!
//! Schema validation for the messages and Parquet rows exchanged by the
//! external data pipeline services.
//!
//! ## Features
//!
//! - **Predicate Library**: Scalar checks for numbers, text grammars, digests, timestamps and UUIDs
//! - **Schema Composition**: Immutable, shareable schema trees with required and optional keys
//! - **Path-aware Errors**: Every failure carries a category and the location of the offending value
//! - **Batch Validation**: Single document, newline separated or row sources with outcome tallies
//! - **Topic Catalog**: Ready-made schemas for the known Kafka, SQS and Parquet formats
//!
//! ## Architecture
//!
//! ```text
//! predicate ──> schema ──> evaluate ──> batch ──> report
//!                  ^                      ^
//!               catalog                 source
//! ```

pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod predicate;
pub mod report;
pub mod schema;
pub mod source;
pub mod value;

pub use batch::{validate, Tally, Validator};
pub use catalog::Topic;
pub use config::ValidatorConfig;
pub use error::{ErrorKind, FieldPath, Result, SourceError, ValidationError};
pub use evaluate::{EvaluationMode, Evaluator};
pub use predicate::{Digest, Encoding, Format, Predicate, Sign, TimestampFormat};
pub use report::render_report;
pub use schema::{ObjectSchema, Schema};
pub use value::{Value, ValueType};
