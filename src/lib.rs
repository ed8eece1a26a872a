pub mod config;
pub mod context;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod llm;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
