//! Damage descriptions exchanged with the host damage pipeline.

use bitflags::bitflags;

use super::EntityId;

bitflags! {
    /// Classification flags the mitigation policy cares about.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DamageTraits: u8 {
        /// Heat or fire damage (flames, burns, acid, vaporization).
        const HEAT = 0b0000_0001;
        /// Blast damage from explosions.
        const EXPLOSIVE = 0b0000_0010;
        /// Explosions that also carry heat energy into the cell.
        const HEAT_BLAST = Self::HEAT.bits() | Self::EXPLOSIVE.bits();
    }
}

/// Damage kinds known to the kit.
///
/// Hosts with their own damage tables map them onto these, using `Custom`
/// with explicit traits for anything that does not fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    Flame,
    Burn,
    AcidBurn,
    Vaporize,
    Bomb,
    Blunt,
    Cut,
    Stab,
    Bullet,
    Bite,
    Custom { id: u16, traits: DamageTraits },
}

impl DamageKind {
    pub fn traits(self) -> DamageTraits {
        match self {
            DamageKind::Flame | DamageKind::Burn | DamageKind::AcidBurn | DamageKind::Vaporize => {
                DamageTraits::HEAT
            }
            DamageKind::Bomb => DamageTraits::HEAT_BLAST,
            DamageKind::Blunt
            | DamageKind::Cut
            | DamageKind::Stab
            | DamageKind::Bullet
            | DamageKind::Bite => DamageTraits::empty(),
            DamageKind::Custom { traits, .. } => traits,
        }
    }

    /// Heat/fire-class or explosive damage.
    pub fn is_heat_or_explosive(self) -> bool {
        self.traits()
            .intersects(DamageTraits::HEAT | DamageTraits::EXPLOSIVE)
    }
}

/// Damage the kit asks the host to apply to an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageInfo {
    pub kind: DamageKind,
    pub amount: f32,
    pub armor_penetration: f32,
    pub instigator: Option<EntityId>,
}

impl DamageInfo {
    pub fn new(kind: DamageKind, amount: f32, armor_penetration: f32) -> Self {
        Self {
            kind,
            amount,
            armor_penetration,
            instigator: None,
        }
    }

    pub fn with_instigator(mut self, instigator: EntityId) -> Self {
        self.instigator = Some(instigator);
        self
    }
}

/// Damage the host is about to apply to a capability holder.
///
/// `kind` is optional because hosts may deliver untyped damage; untyped damage
/// is never mitigated.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncomingDamage {
    pub kind: Option<DamageKind>,
    pub amount: f32,
}

impl IncomingDamage {
    pub fn new(kind: DamageKind, amount: f32) -> Self {
        Self {
            kind: Some(kind),
            amount,
        }
    }

    pub fn untyped(amount: f32) -> Self {
        Self { kind: None, amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_kinds_are_classified() {
        for kind in [
            DamageKind::Flame,
            DamageKind::Burn,
            DamageKind::AcidBurn,
            DamageKind::Vaporize,
            DamageKind::Bomb,
        ] {
            assert!(kind.is_heat_or_explosive(), "{kind:?} should be heat-class");
        }
        assert!(!DamageKind::Cut.is_heat_or_explosive());
        assert!(!DamageKind::Bullet.is_heat_or_explosive());
    }

    #[test]
    fn custom_kinds_carry_their_own_traits() {
        let thermite = DamageKind::Custom {
            id: 7,
            traits: DamageTraits::HEAT,
        };
        let shrapnel = DamageKind::Custom {
            id: 8,
            traits: DamageTraits::EXPLOSIVE,
        };
        let psychic = DamageKind::Custom {
            id: 9,
            traits: DamageTraits::empty(),
        };
        assert!(thermite.is_heat_or_explosive());
        assert!(shrapnel.is_heat_or_explosive());
        assert!(!psychic.is_heat_or_explosive());
    }
}
