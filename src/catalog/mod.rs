//! Published data-schema catalog and outstanding data requests.
//!
//! Both families are auto-incrementing tables owned by the application:
//! schemas describe the data a provider publishes, requests reference those
//! schemas and are written back by the identified provider.

mod types;

pub use types::{
    AppKeyRecord, RequestRecord, RequestType, Schedule, SchemaRecord, SchemaVersion,
};
