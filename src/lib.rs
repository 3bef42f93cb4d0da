//! Servicedesk: issue tracking and product catalog backend.
//!
//! Customers report issues (optionally anonymously) with photos, staff move
//! them through a small lifecycle while exchanging messages, and reporters
//! are told about status changes by SMS. A product catalog with image
//! uploads shares the same media handling.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//! - **Services**: Orchestration of domain rules over ports
//!
//! # Modules
//!
//! - [`issue`]: Issue lifecycle, messaging and technician assignment
//! - [`catalog`]: Product catalog with listing, search and visibility
//! - [`media`]: Image storage behind a single upload contract
//! - [`notification`]: SMS delivery and message templates
//! - [`identity`]: Credential verification and user profiles
//! - [`http`]: Axum routes, extractors and the response envelope

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod issue;
pub mod logging;
pub mod media;
pub mod notification;
pub mod pagination;
pub mod persistence;
