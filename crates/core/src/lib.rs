//! Domain model for the short-video generation wizard.
//!
//! Pure types and rules only: step ordering and guards, the style and voice
//! catalogs, topic and script shapes, generation job snapshots, and the
//! [`session::WizardSession`] state container. Network access and the
//! polling loop live in `shortgen-client`.

pub mod catalog;
pub mod error;
pub mod job;
pub mod script;
pub mod session;
pub mod topic;
pub mod types;
pub mod wizard;
