pub mod config;
pub mod logging;

pub mod downloader;
pub mod extract;
pub mod merge;
pub mod naming;
pub mod observer;
pub mod pipeline;
pub mod table;
