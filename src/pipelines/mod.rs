// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines
//!
//! # Pipeline Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │    Camera    │ ──▶ │  Capture Pipeline │ ──▶ │ name-N.png   │
//! │  (off-screen │     │  - Name resolve   │     │ name-N.jpg   │
//! │   render)    │     │  - Encoding       │     │ name-N.tga   │
//! │              │     │  - Counter + I/O  │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`capture`]: Capture orchestration, encoding and writing

pub mod capture;
