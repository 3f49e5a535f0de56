//! Full-duplex relay between the two sides of a transparent proxy tunnel.
//!
//! A [`ports::RelayPort`] copies bytes in both directions between an inbound
//! `proxyserver` stream and an outbound `directserver` stream, counting
//! transport errors per role. [`adapters::CaptureRelay`] additionally writes
//! each direction's source bytes to a session file for offline inspection.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
