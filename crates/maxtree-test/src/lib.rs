//! maxtree-test - Regression harness and synthetic images
//!
//! [`RegParams`] records numbered checks for one regression test and
//! reports them at the end. Image outputs are written under `tests/regout`
//! and handled according to `REGTEST_MODE`:
//!
//! - `generate` - the outputs become the golden files in `tests/golden`
//! - `compare` (default) - outputs must match existing golden files
//! - `display` - outputs are only written
//!
//! [`fixtures`] builds the test images in code.
//!
//! # Usage
//!
//! ```ignore
//! use maxtree_test::{RegParams, fixtures};
//!
//! let mut rp = RegParams::new("filter");
//! let image = fixtures::flat(3, 3, 100);
//! rp.compare_values(100.0, image.max_level() as f64, 0.0);
//! assert!(rp.cleanup(), "filter regression test failed");
//! ```

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

fn workspace_root() -> String {
    // crates/maxtree-test
    format!("{}/../..", env!("CARGO_MANIFEST_DIR"))
}

/// Directory of golden files
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Directory the regression outputs are written to
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
