//! Aggregate per-contributor coding hours across repositories and publish the
//! resulting reports to a branch of a host repository.
//!
//! The hours themselves come from an external tool run inside a fresh clone
//! of each repository; git is driven through its command line.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrate;
pub mod producer;
pub mod publish;
pub mod remote;
pub mod report;
pub mod runner;
pub mod site;
pub mod slug;

pub use aggregate::aggregate;
pub use error::{HoursError, Result};
pub use orchestrate::Orchestrator;
pub use publish::BranchPublisher;
pub use slug::slugify;
