//! Group selection rules.
//!
//! An element's `group_ids` run innermost first. Selecting any member of a
//! group selects the outermost group below the one being edited, and with
//! it every member of that group.

use crate::app_state::AppState;
use crate::element::{Element, GroupId};
use std::collections::HashSet;

/// Mark `group_id` selected and add its members to the selection.
/// A group with fewer than two live members is not a group worth selecting.
pub fn select_group(group_id: &GroupId, state: &mut AppState, elements: &[Element]) {
    let members: Vec<&Element> = get_elements_in_group(elements, group_id).collect();
    if members.len() < 2 {
        state.selected_group_ids.remove(group_id);
        return;
    }
    state.selected_group_ids.insert(group_id.clone());
    for el in members {
        state.selected_element_ids.insert(el.id().clone());
    }
}

/// Recompute `selected_group_ids` from the selected elements and expand
/// the selection to whole groups.
pub fn select_groups_for_selected_elements(state: &mut AppState, elements: &[Element]) {
    state.selected_group_ids.clear();
    let group_ids: Vec<GroupId> = elements
        .iter()
        .filter(|el| !el.is_deleted && state.is_selected(el.id()))
        .filter_map(|el| {
            let ids = groups_below_editing(&el.group_ids, state.editing_group_id.as_ref());
            ids.last().cloned()
        })
        .collect();
    for group_id in group_ids {
        select_group(&group_id, state, elements);
    }
}

fn groups_below_editing<'a>(group_ids: &'a [GroupId], editing: Option<&GroupId>) -> &'a [GroupId] {
    match editing.and_then(|g| group_ids.iter().position(|id| id == g)) {
        Some(index) => &group_ids[..index],
        None => group_ids,
    }
}

pub fn is_selected_via_group(state: &AppState, element: &Element) -> bool {
    get_selected_group_for_element(state, element).is_some()
}

/// The selected group through which `element` is selected, ignoring the editing group.
pub fn get_selected_group_for_element<'a>(state: &AppState, element: &'a Element) -> Option<&'a GroupId> {
    element
        .group_ids
        .iter()
        .filter(|g| state.editing_group_id.as_ref() != Some(*g))
        .find(|g| state.selected_group_ids.contains(*g))
}

pub fn get_selected_group_ids(state: &AppState) -> Vec<GroupId> {
    state.selected_group_ids.iter().cloned().collect()
}

/// Enter the innermost group of `element` for editing, selecting only it.
pub fn edit_group_for_selected_element(state: &mut AppState, element: &Element) {
    state.editing_group_id = element.group_ids.first().cloned();
    state.selected_group_ids.clear();
    state.selected_element_ids.clear();
    state.selected_element_ids.insert(element.id().clone());
}

pub fn is_element_in_group(element: &Element, group_id: &GroupId) -> bool {
    element.group_ids.contains(group_id)
}

pub fn get_elements_in_group<'a>(
    elements: &'a [Element],
    group_id: &'a GroupId,
) -> impl Iterator<Item = &'a Element> + 'a {
    elements
        .iter()
        .filter(move |el| !el.is_deleted && is_element_in_group(el, group_id))
}

pub fn get_selected_group_id_for_element<'a>(
    element: &'a Element,
    selected_group_ids: &HashSet<GroupId>,
) -> Option<&'a GroupId> {
    element.group_ids.iter().find(|g| selected_group_ids.contains(*g))
}

/// Insert `new_group_id` just below the editing group, or outermost when not editing.
pub fn add_to_group(prev: &[GroupId], new_group_id: GroupId, editing_group_id: Option<&GroupId>) -> Vec<GroupId> {
    let mut group_ids = prev.to_vec();
    let position = editing_group_id
        .and_then(|g| group_ids.iter().position(|id| id == g))
        .unwrap_or(group_ids.len());
    group_ids.insert(position, new_group_id);
    group_ids
}

pub fn remove_from_selected_groups(group_ids: &[GroupId], selected_group_ids: &HashSet<GroupId>) -> Vec<GroupId> {
    group_ids
        .iter()
        .filter(|g| !selected_group_ids.contains(*g))
        .cloned()
        .collect()
}
