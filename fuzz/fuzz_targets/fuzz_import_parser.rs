//! Fuzz target: settings import and the value codec
//!
//! Drives arbitrary text through `parse_import`, the key decoder and the
//! flag/int parsers, asserting that nothing panics and that accepted
//! entries are well formed.
//!
//! cargo fuzz run fuzz_import_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use pongbot::app::router::Router;
use pongbot::app::sync::parse_import;
use pongbot::config::LauncherConfig;
use pongbot::remote::codec::{parse_flag, parse_int};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let cfg = LauncherConfig::default();
    let router = Router::new(cfg.controls, cfg.servo, cfg.motors);

    for entry in parse_import(text).flatten() {
        assert!(!entry.key.is_empty(), "parser yielded an empty key");
        let _ = router.decode_setting(entry.key, entry.value);
        let _ = parse_flag(entry.value);
        let _ = parse_int(entry.value);
    }
});
