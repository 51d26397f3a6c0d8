//! Prelude module that provides common imports
//!
//! Meant for binaries and tests: `use intelplat::prelude::*`.

pub use anyhow::Result;

pub use crate::config::Config;
pub use crate::dashboard::{Dashboard, DatasetForm, IncidentForm, RegistrationForm, TicketForm};
pub use crate::error::PlatformError;
pub use crate::session::Session;
