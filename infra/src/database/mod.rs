//! Database module - MySQL connection pool using SQLx

pub mod connection;

pub use connection::DatabasePool;
