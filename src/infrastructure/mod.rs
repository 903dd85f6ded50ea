pub mod container;
pub mod database;
pub mod external_services;
pub mod file_system;
pub mod messaging;
pub mod persistence;
pub mod status;
