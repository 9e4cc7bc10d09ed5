//! Client side of the short-video generation workflow.
//!
//! Provides the REST adapter for the generation backend, the
//! [`backend::GenerationBackend`] seam it implements, the job-status
//! polling engine, wizard events, configuration, and the
//! [`controller::WizardController`] that ties them to a
//! [`shortgen_core::session::WizardSession`].

pub mod api;
pub mod backend;
pub mod config;
pub mod controller;
pub mod events;
pub mod poller;

#[cfg(test)]
mod testing;
