//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check endpoint
//! - `generate` - Sentence list to audio generation
//! - `download` - Artifact download endpoint
//! - `voices` - Voice and language listing endpoints
//! - `editor` - Interactive editor session

pub mod api;
pub mod download;
pub mod editor;
pub mod generate;
pub mod voices;
