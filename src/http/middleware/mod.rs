//! Middleware applied to live (non-invoke) traffic.

pub mod mirror_host;

pub use mirror_host::mirror_host_middleware;
