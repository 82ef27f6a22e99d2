// ABOUTME: Configuration module for the identity federation gateway
// ABOUTME: Re-exports environment-based configuration types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Configuration management

pub mod environment;

pub use environment::{AuthConfig, PolicyConfig, ProviderConfig, ProviderMode, ServerConfig};
