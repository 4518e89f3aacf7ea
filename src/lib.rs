//! Meeting-time polling: a creator proposes dates and a daily window, participants
//! mark the half-hour slots that work for them, and the best-supported slots win.

pub mod code;
pub mod config;
pub mod display;
pub mod errors;
pub mod form;
pub mod schedule;
pub mod service;
pub mod store;
pub mod web;
