//! Snapshot tests using the insta crate.
//!
//! Snapshots pin the JSON shapes hosts and collaborators depend on. They are
//! kept inline and free of floats and random values so they stay stable.
//!
//! To update snapshots after intentional changes:
//! ```sh
//! cargo insta test --accept
//! ```

use crate::helpers::*;
use inkboard::app_state::{AppState, HistoryAppState};
use inkboard::document::{parse_document, serialize_clipboard};
use inkboard::settings::Settings;
use inkboard::types::ElementType;
use std::collections::BTreeSet;

fn sorted_keys(value: &serde_json::Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

// ============================================================================
// History state
// ============================================================================

#[test]
fn snapshot_history_app_state() {
    let subset = HistoryAppState {
        selected_element_ids: BTreeSet::from([id("b"), id("a")]),
        selected_group_ids: BTreeSet::new(),
        editing_group_id: None,
        element_type: ElementType::Rectangle,
        editing_linear_element_id: None,
    };
    insta::assert_json_snapshot!(subset, @r#"
    {
      "selectedElementIds": [
        "a",
        "b"
      ],
      "selectedGroupIds": [],
      "editingGroupId": null,
      "elementType": "rectangle",
      "editingLinearElementId": null
    }
    "#);
}

#[test]
fn snapshot_history_subset_of_default_state() {
    let subset = AppState::default().history_subset();
    insta::assert_json_snapshot!(subset, @r#"
    {
      "selectedElementIds": [],
      "selectedGroupIds": [],
      "editingGroupId": null,
      "elementType": "selection",
      "editingLinearElementId": null
    }
    "#);
}

// ============================================================================
// Element fields
// ============================================================================

#[test]
fn snapshot_rectangle_fields() {
    let value = serde_json::to_value(filled_rect("a", 0.0, 0.0, 10.0, 10.0)).unwrap();
    insta::assert_json_snapshot!(sorted_keys(&value), @r#"
    [
      "angle",
      "backgroundColor",
      "boundElements",
      "fillStyle",
      "groupIds",
      "height",
      "id",
      "isDeleted",
      "opacity",
      "roughness",
      "seed",
      "strokeColor",
      "strokeSharpness",
      "strokeStyle",
      "strokeWidth",
      "type",
      "version",
      "versionNonce",
      "width",
      "x",
      "y"
    ]
    "#);
}

// ============================================================================
// Payloads
// ============================================================================

#[test]
fn snapshot_document_envelope() {
    let editor = TestEditorBuilder::new()
        .with_element(filled_rect("a", 0.0, 0.0, 100.0, 100.0))
        .build();
    let json = editor.serialize().unwrap();
    let document = parse_document(&json).unwrap();
    assert_eq!(document.elements.len(), 1);

    insta::assert_json_snapshot!(document, {
        ".source" => "[source]",
        ".elements" => "[elements]",
        ".appState" => "[app state]",
    }, @r#"
    {
      "type": "inkboard",
      "version": 2,
      "source": "[source]",
      "elements": "[elements]",
      "appState": "[app state]"
    }
    "#);
}

#[test]
fn snapshot_clipboard_envelope_keys() {
    let a = filled_rect("a", 0.0, 0.0, 100.0, 100.0);
    let payload = serialize_clipboard([&a]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["type"], "inkboard/clipboard");
    insta::assert_json_snapshot!(sorted_keys(&value), @r#"
    [
      "elements",
      "type"
    ]
    "#);
}

#[test]
fn snapshot_settings_keys() {
    let value = serde_json::to_value(Settings::default()).unwrap();
    insta::assert_json_snapshot!(sorted_keys(&value), @r#"
    [
      "binding_enabled",
      "element_locked",
      "grid_mode_enabled",
      "grid_size",
      "log_filter",
      "show_stats",
      "wheel_zoom_max_step",
      "zen_mode_enabled"
    ]
    "#);
}
