pub mod client;
pub mod config;
pub mod constants;
pub mod controllers;
pub mod error;
pub mod games;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod structs;
