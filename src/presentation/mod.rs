//! HTML presentation: askama templates and render helpers.

pub mod views;
