pub mod brackets;
pub mod file;
pub mod stdin;
