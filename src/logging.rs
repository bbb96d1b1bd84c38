//! Structured logging utilities for the state tracer.
//!
//! This module provides helper functions for consistent, structured
//! logging across the engine using the `tracing` crate.

use std::fmt;

/// Helper function to format and log multi-line output without structured fields.
pub fn log_display<D: fmt::Display>(message: D, level: LogLevel) {
    let msg = message.to_string();
    match level {
        LogLevel::Info => tracing::info!("{}", msg),
        LogLevel::Warn => tracing::warn!("{}", msg),
        LogLevel::Error => tracing::error!("{}", msg),
        LogLevel::Debug => tracing::debug!("{}", msg),
    }
}

/// Log levels matching tracing crate levels.
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// Log one-time source map engine setup.
pub fn log_engine_initialized(support_location: &str) {
    tracing::debug!(support_location, "Source map engine initialized");
}

/// Log a source map fetch owned by this caller.
pub fn log_map_fetch_start(url: &str) {
    tracing::debug!(url, "Fetching source map");
}

/// Log a successfully parsed source map.
pub fn log_map_resolved(url: &str, sources: usize) {
    tracing::debug!(url, sources, "Source map resolved");
}

/// Log a source map that failed and will not be retried.
pub fn log_map_failed(url: &str, reason: &str) {
    tracing::warn!(url, reason, "Source map unavailable, keeping generated positions");
}

/// Log a caller parked behind another caller's fetch.
pub fn log_waiting_for_fetch(url: &str) {
    tracing::trace!(url, "Waiting for in-flight fetch");
}

/// Log an original source text fetch.
pub fn log_source_fetch(url: &str) {
    tracing::debug!(url, "Fetching original source");
}

/// Log a generated position with no mapping.
pub fn log_position_unmapped(url: &str, line: u32, column: u32) {
    tracing::trace!(url, line, column, "No mapping for generated position");
}

/// Log a recorded state change.
pub fn log_change_recorded(property: &str, records: usize) {
    tracing::debug!(property, records, "State change recorded");
}

/// Log capture being switched on or off.
pub fn log_capture_toggled(capturing: bool) {
    tracing::info!(capturing, "State capture toggled");
}

/// Log installation of the process-wide recorder.
pub fn log_recorder_installed() {
    tracing::info!("Global state recorder installed");
}
