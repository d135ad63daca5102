#![doc = include_str!("../README.md")]
// If this was in Cargo.toml, it would cover examples as well
#![warn(
    missing_docs,
    clippy::panic_in_result_fn,
    clippy::missing_assert_message,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

#[cfg(not(unix))]
compile_error!("polysock wraps POSIX socket primitives and only targets Unix-like systems");

#[macro_use]
mod macros;

mod misc;
pub(crate) use misc::*;

mod c_wrappers;

pub mod addr;

mod handle;
mod membuf;
mod socket;

pub use {
    addr::{Family, SockAddr},
    handle::*,
    membuf::*,
    socket::*,
};

#[cfg(test)]
#[path = "../tests/index.rs"]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]
mod tests;
