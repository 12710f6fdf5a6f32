pub mod api;
pub mod backend;
pub mod config;
pub mod customer;
pub mod error;
pub mod gateway;
pub mod requests;
pub mod state;
pub mod validation;
pub mod workflow;
