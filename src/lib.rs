pub mod record;
pub mod sink;
pub mod writer;

pub mod generator;
pub mod runner;
pub mod shutdown;

pub mod config;
pub mod init;
