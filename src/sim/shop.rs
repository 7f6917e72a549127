//! Shop inventory and purchases

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};
use crate::consts::SWORD_MIN_COOLDOWN;

/// Grouping used by the shop screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopCategory {
    Consumable,
    Upgrade,
    Weapon,
    /// Section title, never selectable or purchasable
    Header,
}

/// What buying an item does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShopEffect {
    Heal(i32),
    /// Shortens the sword cooldown while it is above the minimum
    SwordCooldown(f32),
    SwordReach(i32),
    Invincibility(f32),
    Crossbow,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u32,
    pub category: ShopCategory,
    pub effect: ShopEffect,
}

impl ShopItem {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        price: u32,
        category: ShopCategory,
        effect: ShopEffect,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            category,
            effect,
        }
    }

    pub fn is_header(&self) -> bool {
        self.category == ShopCategory::Header
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopState {
    pub selected: usize,
    pub inventory: Vec<ShopItem>,
}

impl Default for ShopState {
    fn default() -> Self {
        Self::stocked()
    }
}

impl ShopState {
    /// The standard inventory, selection at the top
    pub fn stocked() -> Self {
        use ShopCategory::*;
        let inventory = vec![
            ShopItem::new(
                "health_potion",
                "Health Potion",
                "Restores 25 health",
                10,
                Consumable,
                ShopEffect::Heal(25),
            ),
            ShopItem::new(
                "faster_sword",
                "Faster Sword",
                "Reduces sword cooldown by 0.2s",
                25,
                Upgrade,
                ShopEffect::SwordCooldown(0.2),
            ),
            ShopItem::new(
                "longer_sword",
                "Longer Sword",
                "Increases sword reach",
                30,
                Upgrade,
                ShopEffect::SwordReach(1),
            ),
            ShopItem::new(
                "temporary_invincibility",
                "Invincibility",
                "5 seconds of invincibility",
                50,
                Consumable,
                ShopEffect::Invincibility(5.0),
            ),
            ShopItem::new(
                "weapons_header",
                "--- Weapons ---",
                "",
                0,
                Header,
                ShopEffect::None,
            ),
            ShopItem::new(
                "ranged_crossbow",
                "Crossbow",
                "Fires bolts at enemies from a distance",
                75,
                Weapon,
                ShopEffect::Crossbow,
            ),
        ];
        Self {
            selected: 0,
            inventory,
        }
    }

    pub fn selected_item(&self) -> Option<&ShopItem> {
        self.inventory.get(self.selected)
    }

    /// Move the selection down, skipping headers; stays put at the bottom
    pub fn select_next(&mut self) {
        if let Some(i) = (self.selected + 1..self.inventory.len()).find(|&i| !self.inventory[i].is_header()) {
            self.selected = i;
        }
    }

    /// Move the selection up, skipping headers; stays put at the top
    pub fn select_prev(&mut self) {
        if let Some(i) = (0..self.selected).rev().find(|&i| !self.inventory[i].is_header()) {
            self.selected = i;
        }
    }
}

/// Buy the selected item if affordable. Returns true on a purchase.
pub fn purchase_selected(state: &mut GameState) -> bool {
    let Some(item) = state.shop.selected_item().cloned() else {
        return false;
    };
    if item.is_header() || state.player.gold < item.price {
        return false;
    }
    if item.effect == ShopEffect::Crossbow && state.crossbow.owned {
        log::debug!("Crossbow already owned");
        return false;
    }

    state.player.gold -= item.price;
    match item.effect {
        ShopEffect::Heal(amount) => state.player.heal(amount),
        ShopEffect::SwordCooldown(step) => {
            if state.sword.cooldown_duration > SWORD_MIN_COOLDOWN {
                state.sword.cooldown_duration -= step;
            }
        }
        ShopEffect::SwordReach(extra) => state.sword.reach += extra,
        ShopEffect::Invincibility(secs) => {
            state.player.invincibility_timer = state.player.invincibility_timer.max(secs)
        }
        ShopEffect::Crossbow => state.crossbow.owned = true,
        ShopEffect::None => {}
    }

    log::info!("Purchased {} for {}g ({}g left)", item.name, item.price, state.player.gold);
    state.events.push(GameEvent::ItemPurchased {
        id: item.id,
        price: item.price,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::MAX_HEALTH;
    use crate::sim::map::TileMap;

    fn state_with_gold(gold: u32) -> GameState {
        let map = TileMap::parse("......\n......\n......").unwrap();
        let mut state = GameState::new(map, Tuning::default(), 7);
        state.player.gold = gold;
        state
    }

    #[test]
    fn test_selection_skips_header() {
        let mut shop = ShopState::stocked();
        shop.selected = 3;
        shop.select_next();
        assert_eq!(shop.selected_item().unwrap().id, "ranged_crossbow");
        shop.select_prev();
        assert_eq!(shop.selected, 3);
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let mut shop = ShopState::stocked();
        shop.select_prev();
        assert_eq!(shop.selected, 0);
        shop.selected = 5;
        shop.select_next();
        assert_eq!(shop.selected, 5);
    }

    #[test]
    fn test_purchase_requires_gold() {
        let mut state = state_with_gold(5);
        assert!(!purchase_selected(&mut state));
        assert_eq!(state.player.gold, 5);
    }

    #[test]
    fn test_potion_heals_clamped() {
        let mut state = state_with_gold(10);
        state.player.health = 3;
        assert!(purchase_selected(&mut state));
        assert_eq!(state.player.gold, 0);
        assert_eq!(state.player.health, MAX_HEALTH);
    }

    #[test]
    fn test_faster_sword_respects_floor() {
        let mut state = state_with_gold(1000);
        state.shop.selected = 1;
        for _ in 0..10 {
            purchase_selected(&mut state);
        }
        assert!(state.sword.cooldown_duration > 0.1);
        assert!(state.sword.cooldown_duration <= SWORD_MIN_COOLDOWN + 0.001);
    }

    #[test]
    fn test_crossbow_sold_once() {
        let mut state = state_with_gold(200);
        state.shop.selected = 5;
        assert!(purchase_selected(&mut state));
        assert!(state.crossbow.owned);
        assert!(!purchase_selected(&mut state));
        assert_eq!(state.player.gold, 125);
    }
}
