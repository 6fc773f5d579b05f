//! Fuzz target for evaluating arbitrary JSON resources against a fixed rule chain.
//!
//! Goal: evaluation should **never panic**, however odd the bundle. Malformed composites
//! must come back as `rejected` reports, not crashes.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_bundle_evaluation
//! ```

#![no_main]

use authguard_app::{run_authorize, AuthorizeInput};
use authguard_settings::Overrides;
use authguard_types::OperationKind;
use libfuzzer_sys::fuzz_target;

const CONFIG: &str = r#"
[[rules]]
name = "own data"
mode = "allow"
op = "read"
compartment = { name = "Patient", owners = ["Patient/1"] }

[[rules]]
name = "writes"
mode = "allow"
op = "write"
resources = ["Patient", "Observation"]

[[rules]]
name = "batches"
mode = "allow"
op = "batch"

[[rules]]
name = "transactions"
mode = "allow"
op = "transaction"
"#;

fuzz_target!(|data: &[u8]| {
    let Some((selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(resource) = serde_json::from_slice::<serde_json::Value>(rest) else {
        return;
    };
    let operation = OperationKind::ALL[*selector as usize % OperationKind::ALL.len()];

    for (input, output) in [(Some(&resource), None), (None, Some(&resource))] {
        let _ = run_authorize(AuthorizeInput {
            config_text: CONFIG,
            overrides: Overrides::default(),
            operation,
            input,
            output,
            request_id: None,
        });
    }
});
