//! Postboard: a small blog board that keeps every post in one JSON file.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
