//! Core types and services for outlook-mcp.
//!
//! This crate wraps the Microsoft Graph Outlook Mail API: an authenticated
//! HTTP client, request body shaping, one control-plane method per Graph
//! operation, and the chunked upload-session protocol for large attachments.

pub mod client;
pub mod control;
pub mod error;
pub mod payload;
pub mod services;
pub mod upload;
