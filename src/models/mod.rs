pub mod config;
pub mod guide;
pub mod person;

pub use config::*;
pub use guide::*;
pub use person::*;
