//! Player vs collectible pickup detection
//!
//! Both the avatar and the collectibles are treated as circles. An item is
//! picked up once the circles overlap by more than `COLLISION_SLACK`.

use glam::Vec2;

use super::state::{Collectible, CollectibleType, Player};
use crate::consts::COLLISION_SLACK;

/// Result of resolving pickups for one step
#[derive(Debug, Clone, Default)]
pub struct CollisionOutcome {
    /// Items picked up this step
    pub collected: Vec<Collectible>,
    /// Items still on the field, in their original order
    pub remaining: Vec<Collectible>,
    /// Sum of the collected items' points
    pub points: u32,
}

/// Check whether an item of diameter `item_size` at `item_pos` is picked up
#[inline]
pub fn is_collected(player: &Player, item_pos: Vec2, item_size: f32) -> bool {
    let dist = item_pos.distance(player.pos);
    dist < item_size / 2.0 + player.radius() - COLLISION_SLACK
}

/// Split `items` into collected and remaining.
///
/// Items never interact, so the result does not depend on their order.
pub fn resolve(
    player: &Player,
    items: Vec<Collectible>,
    catalog: &[CollectibleType],
) -> CollisionOutcome {
    let (collected, remaining): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|item| is_collected(player, item.pos, catalog[item.kind].size));

    let points = collected.iter().map(|item| catalog[item.kind].points).sum();

    CollisionOutcome {
        collected,
        remaining,
        points,
    }
}
