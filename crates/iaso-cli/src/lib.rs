//! Command line front-end for the question mapping engine.

pub mod commands;
pub mod logging;
pub mod render;
