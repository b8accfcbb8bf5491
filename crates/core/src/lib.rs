//! Core library: folder scanning, file name patterns, exiftool invocation, run reports.

pub mod config;
pub mod exiftool;
pub mod models;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod scanner;
