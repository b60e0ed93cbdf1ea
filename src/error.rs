// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for Prompter
//!
//! This module defines all error types used throughout the application.

use thiserror::Error;

/// Main error type for Prompter operations
#[derive(Error, Debug)]
pub enum PrompterError {
    /// Provider API errors (non-2xx responses, malformed bodies, stream faults)
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Missing or invalid configuration (absent credential, bad model config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure reaching a provider, wrapped with its display name
    #[error("{provider} network error: {message}")]
    Network { provider: String, message: String },

    /// Provider name not recognized at the string boundary (CLI, stored config)
    #[error("Provider not supported: {0}")]
    UnsupportedProvider(String),

    /// Session state errors (e.g. an operation is already in flight)
    #[error("Session error: {0}")]
    Session(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// API-specific error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// API returned an error status
    #[error("API error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The response carried no readable body
    #[error("The response body is empty")]
    EmptyBody,

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Streaming error
    #[error("Streaming error: {0}")]
    StreamError(String),
}

/// Result type alias used throughout Prompter
pub type Result<T> = std::result::Result<T, PrompterError>;
