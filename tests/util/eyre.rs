//! Failure reporting for the test suite.

use std::sync::Once;

/// What every test body returns. Failures render through color-eyre's report handler.
pub type TestResult<T = ()> = color_eyre::eyre::Result<T>;

static INSTALL: Once = Once::new();
pub(super) fn install() {
    // color_eyre::install errors out on a second call, so only the first test thread to get
    // here performs it.
    INSTALL.call_once(|| {
        let _ = color_eyre::install();
    });
}

/// `assert_eq!`, except the mismatch becomes an error report instead of a panic.
macro_rules! ensure_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let (l, r) = (&$left, &$right);
        ::color_eyre::eyre::ensure!(
            l == r,
            "equality check failed\n  left: `{:?}`\n right: `{:?}`",
            l,
            r,
        );
    }};
    ($left:expr, $right:expr, $($arg:tt)+) => {{
        let (l, r) = (&$left, &$right);
        ::color_eyre::eyre::ensure!(
            l == r,
            "equality check failed\n  left: `{:?}`\n right: `{:?}`\n{}",
            l,
            r,
            ::core::format_args!($($arg)+),
        );
    }};
}
