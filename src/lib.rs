pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod docs;
pub mod manage;
pub mod model;
pub mod routes;
pub mod serializer;
