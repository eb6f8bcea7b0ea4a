pub mod numbering;
pub mod repository;
pub mod service;
