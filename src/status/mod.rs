pub mod service;

pub use service::{PageSettings, StatusService, REFRESH_SECS};
