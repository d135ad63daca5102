use std::{
    env::{var as env_var, var_os as env_var_os},
    io::{self, Write},
};

fn main() {
    if is_unix() {
        let target = TargetTriplet::fetch();
        collect_socket_features(&target);
    }
}

fn is_unix() -> bool {
    env_var_os("CARGO_CFG_UNIX").is_some()
}

/// This can define the following:
/// - `sock_ext_msg_flags`, availability of the Linux-flavored `MSG_*` extensions
///   (`MSG_CONFIRM`, `MSG_MORE`, `MSG_ERRQUEUE`)
/// - `sock_msg_nosignal`, availability of `MSG_NOSIGNAL` (Apple platforms only have the
///   `SO_NOSIGPIPE` socket option instead)
/// - `sock_abstract_namespace`, support for the abstract Unix socket namespace
fn collect_socket_features(target: &TargetTriplet) {
    if target.os_any(&["linux", "android"]) {
        ldefine(&["sock_ext_msg_flags", "sock_abstract_namespace"]);
    }
    if !target.os_any(&["macos", "ios", "tvos", "watchos"]) {
        define("sock_msg_nosignal");
    }
}

fn define(cfg: &str) {
    ldefine(&[cfg]);
}
fn ldefine(cfgs: &[&str]) {
    let stdout_ = io::stdout();
    let mut stdout = stdout_.lock();
    for i in cfgs {
        stdout.write_all(b"cargo:rustc-cfg=").unwrap();
        stdout.write_all(i.as_ref()).unwrap();
        stdout.write_all(b"\n").unwrap();
    }
}

struct TargetTriplet {
    os: String,
}
impl TargetTriplet {
    fn fetch() -> Self {
        Self { os: env_var("CARGO_CFG_TARGET_OS").unwrap() }
    }
    fn os_any(&self, oses: &[&str]) -> bool {
        oses.iter().copied().any(|x| x == self.os)
    }
}
