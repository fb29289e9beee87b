// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # rbscope
//!
//! Debugger-side decoding and pretty-printing of Ruby VALUE words, read out of a
//! paused target process without its cooperation.
//!
//! A `VALUE` is one machine word that is either an immediate scalar or a pointer
//! into the interpreter's heap. `rbscope` classifies such words, decodes the heap
//! objects behind them (strings, arrays, hashes, objects, classes, regexps, IO
//! objects, rationals, complex numbers) and renders them as bounded, cycle-safe
//! display strings suitable for a debugger's value pane.
//!
//! ## Design
//!
//! - **The target is hostile.** Every byte read out of the inferior may be stale,
//!   inconsistent or attacker-controlled. Decoders bounds-check lengths, cap
//!   iteration, and degrade one value to `<VALUE at remote 0xADDR>` instead of
//!   failing a traversal.
//! - **One profile per session.** Which bit patterns mean `true`, `nil` or a
//!   flonum changed between interpreter builds; [`EncodingProfile`] pins the
//!   variant down once, by observing the runtime's own `true` value.
//! - **Explicit traversal state.** Cycle detection and output bounding are
//!   threaded through every recursive call; there are no globals.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rbscope::prelude::*;
//!
//! // `host` implements rbscope::Inferior over your debugger's API
//! let session = Session::new(&host)?;
//! if let Some(printer) = session.printer_for("VALUE", RawValue(word)) {
//!     println!("{printer}");
//! }
//! # Ok::<(), rbscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`inferior`] - The host-debugger seam: memory reads, type layouts, symbols
//! - [`encoding`] - Encoding-variant detection and tagged-word classification
//! - [`value`] - The session, per-type decoders, and graph traversal
//! - [`tables`] - Readers for the runtime's internal `st_table`s and symbol table
//! - [`render`] - Bounded output accumulation and cycle detection
//! - [`printer`] - Registration seam toward the host's display layer

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

pub mod encoding;
pub mod inferior;
pub mod prelude;
pub mod printer;
pub mod render;
pub mod tables;
pub mod value;

/// The unified result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The unified error type covering everything this crate can fail with.
pub use error::Error;

pub use encoding::{EncodingProfile, RawValue, TypeTag};
pub use inferior::Inferior;
pub use printer::{ValuePrinter, MAX_OUTPUT_LEN};
pub use value::{DecodeKind, DecodedValue, ProxyValue, Session};
