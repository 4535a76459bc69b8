// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building render plans from display lists.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use tessera_core::display_list::{DisplayContent, DisplayIdentity, DisplayList};

use crate::{DamageRegion, ItemChange, PlanStats, RenderItem, RenderPlan};

/// Flattens a display list into draw items in root coordinates.
///
/// Only fills produce items; groups, offsets, and opacity wrappers are folded
/// into the frames and opacities of the fills below them. Every returned
/// item is marked [`ItemChange::Inserted`].
#[must_use]
pub fn flatten(list: &DisplayList) -> Vec<RenderItem> {
    let mut items = Vec::new();
    list.visit(&mut |item, origin, opacity| {
        if let DisplayContent::Fill(style) = &item.content {
            items.push(RenderItem {
                identity: item.identity,
                version: item.version,
                frame: item.frame + origin,
                opacity,
                style: style.clone(),
                change: ItemChange::Inserted,
            });
        }
    });
    items
}

/// Builds the render plan for `new`, given the list drawn before it.
///
/// Without a previous list the whole output is damaged. Otherwise the damage
/// covers the old and new frames of every changed item, the new frames of
/// inserted items, and the old frames of removed items. A plan with no
/// changes has [`DamageRegion::None`].
#[must_use]
pub fn diff(old: Option<&DisplayList>, new: &DisplayList) -> RenderPlan {
    let mut items = flatten(new);
    let Some(old) = old else {
        let stats = PlanStats {
            inserted: items.len(),
            ..PlanStats::default()
        };
        return RenderPlan {
            items,
            damage: DamageRegion::Full,
            stats,
        };
    };

    let mut previous: BTreeMap<DisplayIdentity, RenderItem> = flatten(old)
        .into_iter()
        .map(|item| (item.identity, item))
        .collect();
    let mut damage = DamageRegion::None;
    let mut stats = PlanStats::default();

    for item in &mut items {
        item.change = match previous.remove(&item.identity) {
            None => {
                damage.add_rect(item.frame);
                stats.inserted += 1;
                ItemChange::Inserted
            }
            Some(prior)
                if prior.version == item.version
                    && prior.frame == item.frame
                    && prior.opacity == item.opacity =>
            {
                stats.unchanged += 1;
                ItemChange::Unchanged
            }
            Some(prior) => {
                damage.add_rect(prior.frame);
                damage.add_rect(item.frame);
                stats.changed += 1;
                ItemChange::Changed
            }
        };
    }
    for removed in previous.values() {
        damage.add_rect(removed.frame);
        stats.removed += 1;
    }

    RenderPlan {
        items,
        damage,
        stats,
    }
}
