//! Persisted kit state.

use super::MenuFlags;

/// Everything a kit keeps across a save. Beam and flight state are transient
/// and come back idle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KitSave {
    pub charge: f32,
    pub cooldown_ticks: u32,
    pub exhausted: bool,
    pub powers_menu: bool,
    pub misc_menu: bool,
}

impl KitSave {
    pub fn menus(&self) -> MenuFlags {
        let mut menus = MenuFlags::empty();
        menus.set(MenuFlags::POWERS, self.powers_menu);
        // misc is only reachable through the powers menu
        menus.set(MenuFlags::MISC, self.powers_menu && self.misc_menu);
        menus
    }
}
