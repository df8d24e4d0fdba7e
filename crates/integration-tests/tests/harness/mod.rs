//! Shared test harness: config builder, mock upstreams, and server wrapper

#![allow(dead_code)]

pub mod config;
pub mod mock_chat;
pub mod mock_inference;
pub mod server;
