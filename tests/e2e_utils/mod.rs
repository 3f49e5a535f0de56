#![cfg(test)]
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod relay_fixture;
pub mod tcp_pair;

pub use relay_fixture::{capture_dir, RelayFixture};
pub use tcp_pair::TcpPair;
