pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{Credentials, DryRunGateway, FcmGateway};
pub use crate::config::messages::TemplateCatalog;
pub use crate::config::settings::Settings;
pub use crate::core::{
    dispatch::{DispatchOptions, Dispatcher},
    templates::TemplateProvider,
};
pub use crate::domain::identifiers::{TaskId, TaskType, TemplateKey, Token};
pub use crate::domain::model::{BulkResult, NotificationRequest, NotificationResponse, TokenOutcome};
pub use crate::utils::error::{PushError, Result};
