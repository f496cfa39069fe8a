pub mod account;
pub mod config;
pub mod terms;
pub mod upload;

pub use account::{Role, UserInfo};
pub use config::{AppConfig, Environment, UploadConfig};
pub use terms::{TermsAgreement, TermsId};
pub use upload::{Envelope, StoredObject, UploadEnvelope, UploadFile, UploadResult};
