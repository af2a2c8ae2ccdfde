//! Regression check bookkeeping

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use maxtree_core::GrayImage;
use maxtree_io::ImageFormat;
use std::fs;
use std::path::Path;

/// How `write_image_and_check` treats golden files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Overwrite golden files with the current outputs
    Generate,
    /// Check outputs against golden files (default)
    #[default]
    Compare,
    /// Only write outputs
    Display,
}

impl RegTestMode {
    /// Read the mode from `REGTEST_MODE`
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    /// Parse a mode name; anything unrecognized means `Compare`
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// State of one regression test
///
/// Every check bumps a counter, so a failure message names the check that
/// failed and golden files are numbered by the check that wrote them.
/// Failed checks are collected rather than panicking; the test asserts on
/// [`RegParams::cleanup`] at the end.
pub struct RegParams {
    /// Test name, used as the prefix of output and golden files
    pub test_name: String,
    /// Golden file handling
    pub mode: RegTestMode,
    checks: usize,
    failures: Vec<String>,
}

impl RegParams {
    /// Start a regression test
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "filter")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();
        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());
        eprintln!("\n--- {}_reg [{:?}] ---", test_name, mode);

        Self {
            test_name: test_name.to_string(),
            mode,
            checks: 0,
            failures: Vec::new(),
        }
    }

    /// Number of checks run so far
    pub fn index(&self) -> usize {
        self.checks
    }

    fn next_check(&mut self) -> usize {
        self.checks += 1;
        self.checks
    }

    fn fail(&mut self, check: usize, what: String) {
        let msg = format!("{}_reg check {}: {}", self.test_name, check, what);
        eprintln!("{}", msg);
        self.failures.push(msg);
    }

    /// Check that `actual` is within `delta` of `expected`
    ///
    /// A NaN on either side always fails.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        let check = self.next_check();
        let diff = (expected - actual).abs();
        let ok = diff <= delta;
        if !ok {
            self.fail(
                check,
                format!("expected {expected}, got {actual} (|diff| = {diff}, delta = {delta})"),
            );
        }
        ok
    }

    /// Check that two images have the same size and pixels
    pub fn compare_images(&mut self, expected: &GrayImage, actual: &GrayImage) -> bool {
        let check = self.next_check();
        if expected.dimensions() != actual.dimensions() {
            self.fail(
                check,
                format!(
                    "size {:?} differs from expected {:?}",
                    actual.dimensions(),
                    expected.dimensions()
                ),
            );
            return false;
        }

        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .enumerate()
            .find(|(_, (e, a))| e != a);
        match mismatch {
            Some((i, (&e, &a))) => {
                let (x, y) = expected.coords(i);
                self.fail(check, format!("pixel ({x}, {y}) is {a}, expected {e}"));
                false
            }
            None => true,
        }
    }

    /// Write `image` to the regression output directory and check it
    /// against its golden file
    ///
    /// In `Generate` mode the output becomes the golden file. In `Compare`
    /// mode a missing golden file is reported and skipped; an existing one
    /// must decode to the same pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written or a golden file
    /// cannot be read or created. Pixel differences are recorded as failed
    /// checks instead.
    pub fn write_image_and_check(
        &mut self,
        image: &GrayImage,
        format: ImageFormat,
    ) -> TestResult<()> {
        let check = self.next_check();
        let file_name = format!("{}.{:02}.{}", self.test_name, check, format.extension());
        let out_path = format!("{}/{}", regout_dir(), file_name);
        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            check,
            format.extension()
        );

        maxtree_io::write_image(image, &out_path, format).map_err(|source| {
            TestError::Output {
                path: out_path.clone(),
                source,
            }
        })?;

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(&out_path, &golden_path)?;
                eprintln!("  generated {}", golden_path);
            }
            RegTestMode::Compare if !Path::new(&golden_path).exists() => {
                eprintln!("  no golden file {}, skipped", golden_path);
            }
            RegTestMode::Compare => {
                if fs::read(&out_path)? != fs::read(&golden_path)?
                    && !same_pixels(&out_path, &golden_path)
                {
                    self.fail(check, format!("{} differs from {}", out_path, golden_path));
                }
            }
            RegTestMode::Display => {}
        }
        Ok(())
    }

    /// Report the outcome
    ///
    /// # Returns
    ///
    /// `true` if every check passed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("{}_reg: {} checks passed", self.test_name, self.checks);
            return true;
        }
        eprintln!(
            "{}_reg: {} of {} checks failed",
            self.test_name,
            self.failures.len(),
            self.checks
        );
        for failure in &self.failures {
            eprintln!("  {}", failure);
        }
        false
    }

    /// Whether no check has failed so far
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Messages of the failed checks
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Encoded bytes may differ while the decoded pixels agree
fn same_pixels(a: &str, b: &str) -> bool {
    match (maxtree_io::read_image(a), maxtree_io::read_image(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
