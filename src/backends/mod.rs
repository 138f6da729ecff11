// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for capture sources
//!
//! The host graphics runtime implements [`camera::Camera`]; the capture
//! engine binds an off-screen target to it, renders, and reads back.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Capture Pipeline               │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐    ┌──────────────────┐   │
//! │  │ Host camera │    │  Bundled sources │   │
//! │  │  (trait)    │    │ pattern / image  │   │
//! │  └─────────────┘    └──────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Camera trait, render targets and the capture engine

pub mod camera;
