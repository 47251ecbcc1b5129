//! A minimal stub DNS resolver for constrained networked devices.
//!
//! This crate turns host names into IPv4 addresses by sending UDP DNS
//! queries to a single configured recursive server, parsing the
//! responses, and invoking a caller-supplied completion callback. It is
//! written for small devices: there is no heap allocation and no
//! internal threading, nothing blocks, and all network I/O happens
//! through a narrow transport seam driven by the surrounding runtime.
//!
//! # Modules
//!
//! * [base] contains the protocol-level building blocks: wire-format
//!   parsing and composing, the message header, host names, and reading
//!   and building messages.
//! * [resolv] contains the resolver itself: the fixed-size query table,
//!   its configuration, and the [`StubResolver`][resolv::StubResolver]
//!   engine with its tick- and response-driven entry points.
//!
//! # Feature Flags
//!
//! * `std`: support for the Rust std library, enabled by default.
//!   Without it the crate is `no_std`; only the `std::error::Error`
//!   impls on the error types are lost.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
#[allow(unused_imports)]
#[macro_use]
extern crate std;

pub mod base;
pub mod resolv;
