pub mod auth;
pub mod cli;
pub mod storage;
pub mod utils;
