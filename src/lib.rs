pub mod config;
pub mod error;
pub mod fitness;
pub mod grid;
pub mod optimizer;
pub mod pathfind;
pub mod route;
pub mod workload;
// cmd and reports are binary modules (in main.rs); the library surface stays
// renderer-free.
