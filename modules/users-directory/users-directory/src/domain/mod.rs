pub mod error;
pub mod events;
pub mod page_token;
pub mod patch;
pub mod ports;
pub mod repo;
pub mod service;
pub mod validation;
