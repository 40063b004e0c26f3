//! Cache module for the Redis-backed session store

pub mod redis_client;


pub use redis_client::RedisClient;
