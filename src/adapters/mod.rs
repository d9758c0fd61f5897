// Adapters layer: concrete gateways behind the MessagingGateway port.

pub mod credentials;
pub mod dry_run;
pub mod fcm;

pub use credentials::Credentials;
pub use dry_run::DryRunGateway;
pub use fcm::FcmGateway;
