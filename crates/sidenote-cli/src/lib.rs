//! Command line front end for the sidenote note store

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
