#[path = "util/mod.rs"]
#[macro_use]
mod util;

mod addr;
mod lifecycle;
mod stream;
