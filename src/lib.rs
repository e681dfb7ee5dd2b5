#![deny(warnings, clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub(crate) mod api;
pub mod app;
pub(crate) mod clients;
pub mod config;
pub mod detector;
pub mod model;
pub mod observability;
pub(crate) mod render;
