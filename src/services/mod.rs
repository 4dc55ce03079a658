//! Upload submitters
//!
//! One service per endpoint. Each sends a single upload, turns the outcome
//! into an `UploadResult`, and reconciles the injected cache.

pub mod meters_submitter;
pub mod readings_submitter;

pub use meters_submitter::MetersUploadSubmitter;
pub use readings_submitter::ReadingsUploadSubmitter;
