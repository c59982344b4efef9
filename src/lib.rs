pub mod api;
pub mod app;
pub mod common;
pub mod config;
pub mod error;
pub mod event;
pub mod form;
pub mod logging;
pub mod pages;
pub mod query;
pub mod tui;
pub mod ui;
