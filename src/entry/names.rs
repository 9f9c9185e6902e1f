//! Names that Bitcoin Core writes inside the bracketed metadata of a log line.

// Thread names set through `ThreadRename` / `TraceThread`.
pub const THREAD_NAMES: &[&str] = &[
    "init",
    "http",
    "shutoff",
    "capnp-loop",
    "main",
    "qt-clientmodl",
    "qt-init",
    "qt-rpcconsole",
    "qt-walletctrl",
    "test",
    "initload",
    "mapport",
    "net",
    "dnsseed",
    "addcon",
    "opencon",
    "msghand",
    "i2paccept",
    "torcontrol",
];

/// Worker pools whose threads are named `<prefix>.<n>`.
pub const NUMBERED_THREAD_PREFIXES: &[&str] = &["scriptch", "httpworker"];

// See `LogCategories` in bitcoin/src/logging.cpp.
pub const LOG_CATEGORIES: &[&str] = &[
    "all",
    "net",
    "tor",
    "mempool",
    "http",
    "bench",
    "zmq",
    "walletdb",
    "rpc",
    "estimatefee",
    "addrman",
    "selectcoins",
    "reindex",
    "cmpctblock",
    "rand",
    "prune",
    "proxy",
    "mempoolrej",
    "libevent",
    "coindb",
    "qt",
    "leveldb",
    "validation",
    "i2p",
    "ipc",
    "lock",
    "blockstorage",
    "txreconciliation",
    "scan",
    "txpackages",
];

pub fn is_thread_name(name: &str) -> bool {
    if THREAD_NAMES.contains(&name) {
        return true;
    }

    name.split_once('.').is_some_and(|(prefix, index)| {
        NUMBERED_THREAD_PREFIXES.contains(&prefix) && is_digits(index)
    })
}

pub fn is_log_category(name: &str) -> bool {
    LOG_CATEGORIES.contains(&name)
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
