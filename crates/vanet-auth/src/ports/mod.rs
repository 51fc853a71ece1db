//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that the simulation drives
//! - **Outbound (Driven)**: Where verification outcomes are reported

pub mod inbound;
pub mod outbound;
