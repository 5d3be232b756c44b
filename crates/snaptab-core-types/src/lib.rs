//! Core types shared across snaptab facilities
//!
//! This crate provides the canonical field keys and event names used by
//! the logging facility and by structured error reporting.

pub mod schema;
