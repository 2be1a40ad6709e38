pub mod config;
pub mod dispatcher;
pub mod error;
pub mod job;
pub mod loader;
pub mod mail;
pub mod records;
pub mod report;
pub mod storage;

pub use config::Config;
pub use error::{ReportError, ReportResult};
pub use job::{InvocationResponse, ReportJob};
