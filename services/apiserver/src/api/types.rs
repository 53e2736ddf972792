//! HTTP API request/response types.
//!
//! # Purpose
//! Success envelopes (`{status, data, message}`), error bodies and the
//! payloads of the system and lexicon endpoints, shared with OpenAPI
//! generation.
use crate::model::{Category, Comment, Review};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: &str) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.to_string(),
        }
    }
}

macro_rules! envelope {
    ($name:ident, $data:ty) => {
        #[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
        pub struct $name {
            pub status: String,
            pub data: $data,
            pub message: String,
        }

        impl $name {
            pub fn success(data: $data, message: &str) -> Self {
                Self {
                    status: STATUS_SUCCESS.to_string(),
                    data,
                    message: message.to_string(),
                }
            }
        }
    };
}

envelope!(ReviewResponse, Review);
envelope!(ReviewListResponse, Vec<Review>);
envelope!(CommentResponse, Comment);
envelope!(CommentListResponse, Vec<Comment>);
envelope!(CategoryResponse, Category);
envelope!(CategoryListResponse, Vec<Category>);
envelope!(LexiconUpdateResponse, LexiconUpdate);

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct LexiconUpdateRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct LexiconUpdate {
    /// Words that were not already banned.
    pub added: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the process started.
    pub uptime: f64,
    pub timestamp: String,
    pub version: String,
}
