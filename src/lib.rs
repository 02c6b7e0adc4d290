//! Provisioning CLI for the Ultra Car Rental voice agent on Vapi.
//!
//! Uploads the rental knowledge files, creates the assistant, creates the
//! query tools bound to those files and attaches them to the assistant.

pub mod config;
pub mod error;
pub mod prompts;
pub mod provisioner;
pub mod types;
pub mod vapi;

pub use error::{FailureKind, ProvisionError, StepError};
pub use provisioner::Provisioner;
