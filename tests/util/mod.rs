//! Test utilities for allocating unique socket addresses and reporting failures with context.
#![allow(dead_code, unused_macros)]

#[macro_use]
mod eyre;
#[macro_use]
mod namegen;
mod xorshift;

pub use {eyre::*, namegen::*, xorshift::*};

pub fn testinit() {
    eyre::install();
}
