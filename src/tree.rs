//! Pruning of empty branches from a scene group tree.

use crate::model::SceneGroup;

/// Copy of `groups` without branches that hold no scenes.
///
/// Children are pruned first; a node survives if it still has a direct
/// scene or at least one surviving subgroup. The input is left untouched.
#[must_use]
pub fn filter_empty_groups(groups: &[SceneGroup]) -> Vec<SceneGroup> {
    groups
        .iter()
        .filter_map(|group| {
            let scene_group_list = filter_empty_groups(&group.scene_group_list);
            let keep =
                !group.scene_list.is_empty() || !scene_group_list.is_empty();
            keep.then(|| SceneGroup {
                scene_list: group.scene_list.clone(),
                scene_group_list,
                extra: group.extra.clone(),
            })
        })
        .collect()
}
