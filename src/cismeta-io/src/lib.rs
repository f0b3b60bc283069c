//! File adapters of cismeta-rs: loaders for every input format and the
//! gzipped result writer. Formats are plain whitespace-separated text,
//! optionally gzip-compressed (`.gz`).

pub mod read;
pub mod write;
