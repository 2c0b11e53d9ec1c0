//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary following matklad's best practices,
//! reducing linking overhead from 3x to 1x.
//!
//! Structure:
//! - helpers: Editor builder and event drivers shared by every test
//! - integration: Whole-gesture workflows driven through `Editor::dispatch`
//! - unit: Single-component unit tests

mod helpers;
mod integration;
mod unit;
