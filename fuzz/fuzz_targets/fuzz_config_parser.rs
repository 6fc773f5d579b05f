//! Fuzz target for config parsing and rule chain resolution.
//!
//! Goal: parsing and resolving `authguard.toml` should **never panic** on any input.
//! Errors are fine.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data)
        && let Ok(cfg) = authguard_settings::parse_config_toml(text)
    {
        let _ = authguard_settings::resolve_config(cfg, authguard_settings::Overrides::default());
    }
});
