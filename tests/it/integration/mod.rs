//! Integration tests for Inkboard.
//!
//! These tests drive the editor through `dispatch` the way a host would and
//! check complete workflows end-to-end.

mod binding_tests;
mod clipboard_tests;
mod collaboration_tests;
mod keyboard_tests;
mod pointer_workflow_tests;
mod text_editing_tests;
mod touch_tests;
mod undo_redo_tests;
