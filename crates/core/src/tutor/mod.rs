//! Page tutoring: recognition followed by generation

pub mod ports;
pub mod service;

pub use service::TutorService;
