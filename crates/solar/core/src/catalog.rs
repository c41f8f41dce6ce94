//! Ability parameter tables.
//!
//! The catalog is built once (from [`AbilityCatalog::standard`] or from data
//! via the content loaders) and never mutated afterwards. Lookups are
//! exhaustive over the closed tier enums; the only runtime failure is an entry
//! that was disabled because its definition failed validation.

use bitflags::bitflags;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::error::{ErrorSeverity, KitError};

/// Power levels of the continuous beam.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BeamTier {
    Low,
    Medium,
    High,
    Lethal,
}

impl BeamTier {
    const fn index(self) -> usize {
        self as usize
    }
}

/// Abilities resolved entirely within one activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OneShotKind {
    ConeFreeze,
    AreaStun,
    Reveal,
    Nova,
}

/// Any catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityTier {
    Beam(BeamTier),
    OneShot(OneShotKind),
}

impl AbilityTier {
    /// Every entry, beams first.
    pub fn all() -> impl Iterator<Item = AbilityTier> {
        BeamTier::iter()
            .map(AbilityTier::Beam)
            .chain(OneShotKind::iter().map(AbilityTier::OneShot))
    }

    pub fn flag(self) -> AbilitySet {
        match self {
            AbilityTier::Beam(BeamTier::Low) => AbilitySet::BEAM_LOW,
            AbilityTier::Beam(BeamTier::Medium) => AbilitySet::BEAM_MEDIUM,
            AbilityTier::Beam(BeamTier::High) => AbilitySet::BEAM_HIGH,
            AbilityTier::Beam(BeamTier::Lethal) => AbilitySet::BEAM_LETHAL,
            AbilityTier::OneShot(OneShotKind::ConeFreeze) => AbilitySet::CONE_FREEZE,
            AbilityTier::OneShot(OneShotKind::AreaStun) => AbilitySet::AREA_STUN,
            AbilityTier::OneShot(OneShotKind::Reveal) => AbilitySet::REVEAL,
            AbilityTier::OneShot(OneShotKind::Nova) => AbilitySet::NOVA,
        }
    }
}

impl core::fmt::Display for AbilityTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AbilityTier::Beam(tier) => write!(f, "beam_{tier}"),
            AbilityTier::OneShot(kind) => write!(f, "{kind}"),
        }
    }
}

impl From<BeamTier> for AbilityTier {
    fn from(tier: BeamTier) -> Self {
        AbilityTier::Beam(tier)
    }
}

impl From<OneShotKind> for AbilityTier {
    fn from(kind: OneShotKind) -> Self {
        AbilityTier::OneShot(kind)
    }
}

bitflags! {
    /// Set of catalog entries, used to track disabled abilities.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AbilitySet: u8 {
        const BEAM_LOW = 1 << 0;
        const BEAM_MEDIUM = 1 << 1;
        const BEAM_HIGH = 1 << 2;
        const BEAM_LETHAL = 1 << 3;
        const CONE_FREEZE = 1 << 4;
        const AREA_STUN = 1 << 5;
        const REVEAL = 1 << 6;
        const NOVA = 1 << 7;
    }
}

/// Parameters of one beam tier. Rates are per second of channeling.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeamDescriptor {
    pub charge_cost_per_second: f32,
    pub damage_per_second: f32,
    pub ignite_chance_per_second: f32,
    pub armor_penetration: f32,
    /// Glow size hint for the presenter.
    pub visual_scale: f32,
    /// Size of fires the beam starts.
    pub effect_size: f32,
}

impl BeamDescriptor {
    pub const fn new(
        charge_cost_per_second: f32,
        damage_per_second: f32,
        ignite_chance_per_second: f32,
        armor_penetration: f32,
        visual_scale: f32,
        effect_size: f32,
    ) -> Self {
        Self {
            charge_cost_per_second,
            damage_per_second,
            ignite_chance_per_second,
            armor_penetration,
            visual_scale,
            effect_size,
        }
    }

    pub fn validate(&self, tier: BeamTier) -> Result<(), CatalogError> {
        let tier = AbilityTier::Beam(tier);
        non_negative(tier, "charge_cost_per_second", self.charge_cost_per_second)?;
        non_negative(tier, "damage_per_second", self.damage_per_second)?;
        probability(tier, "ignite_chance_per_second", self.ignite_chance_per_second)?;
        non_negative(tier, "armor_penetration", self.armor_penetration)?;
        non_negative(tier, "visual_scale", self.visual_scale)?;
        non_negative(tier, "effect_size", self.effect_size)
    }
}

/// Cone of frost breathed toward an aim cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConeFreezeDescriptor {
    pub charge_cost: f32,
    pub radius: f32,
    /// Maximum angle between the aim direction and a cell, in degrees.
    pub half_angle_degrees: f32,
    /// Heat pushed into each cell (negative cools).
    pub heat_delta: f32,
    pub stun_ticks: u32,
    /// Hypothermia severity added per cast.
    pub severity_step: f32,
}

impl ConeFreezeDescriptor {
    pub fn validate(&self) -> Result<(), CatalogError> {
        let tier = AbilityTier::OneShot(OneShotKind::ConeFreeze);
        non_negative(tier, "charge_cost", self.charge_cost)?;
        non_negative(tier, "radius", self.radius)?;
        if !(0.0..=180.0).contains(&self.half_angle_degrees) {
            return Err(CatalogError::invalid(
                tier,
                "half_angle_degrees",
                "must be within [0, 180]",
            ));
        }
        probability(tier, "severity_step", self.severity_step)
    }
}

/// Long stun on a single character.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaStunDescriptor {
    pub charge_cost: f32,
    pub stun_ticks: u32,
}

impl AreaStunDescriptor {
    pub fn validate(&self) -> Result<(), CatalogError> {
        non_negative(
            AbilityTier::OneShot(OneShotKind::AreaStun),
            "charge_cost",
            self.charge_cost,
        )
    }
}

/// Fog removal around the owner.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevealDescriptor {
    pub charge_cost: f32,
    pub radius: f32,
}

impl RevealDescriptor {
    pub fn validate(&self) -> Result<(), CatalogError> {
        let tier = AbilityTier::OneShot(OneShotKind::Reveal);
        non_negative(tier, "charge_cost", self.charge_cost)?;
        non_negative(tier, "radius", self.radius)
    }
}

/// The ultimate. Costs all remaining charge; radius comes from the caster.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NovaDescriptor {
    /// Damage of the primary blast covering the whole radius.
    pub blast_damage: f32,
    /// Fraction of the radius that forms the lethal inner band.
    pub inner_band_fraction: f32,
    /// Fraction of the radius the heat pulse reaches (capped at the max radius).
    pub outer_band_fraction: f32,
    pub lethal_damage: f32,
    pub lethal_armor_penetration: f32,
    /// Ash left in every inner-band cell.
    pub ash_per_cell: u32,
    pub fire_size: f32,
    pub fire_heat: f32,
    pub pulse_heat: f32,
    pub volatile_chance: f32,
    pub volatile_radius: f32,
    pub volatile_damage: f32,
    /// Self-inflicted stun on the caster.
    pub recoil_stun_ticks: u32,
}

impl NovaDescriptor {
    pub fn validate(&self) -> Result<(), CatalogError> {
        let tier = AbilityTier::OneShot(OneShotKind::Nova);
        probability(tier, "inner_band_fraction", self.inner_band_fraction)?;
        if !(self.outer_band_fraction >= 1.0) {
            return Err(CatalogError::invalid(
                tier,
                "outer_band_fraction",
                "must be at least 1.0",
            ));
        }
        non_negative(tier, "blast_damage", self.blast_damage)?;
        non_negative(tier, "lethal_damage", self.lethal_damage)?;
        probability(tier, "volatile_chance", self.volatile_chance)?;
        non_negative(tier, "volatile_radius", self.volatile_radius)
    }
}

/// Read-only table of every ability's parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCatalog {
    beams: [BeamDescriptor; 4],
    cone_freeze: ConeFreezeDescriptor,
    area_stun: AreaStunDescriptor,
    reveal: RevealDescriptor,
    nova: NovaDescriptor,
    disabled: AbilitySet,
}

impl AbilityCatalog {
    /// The built-in balance table.
    pub fn standard() -> Self {
        Self {
            beams: [
                Self::standard_beam(BeamTier::Low),
                Self::standard_beam(BeamTier::Medium),
                Self::standard_beam(BeamTier::High),
                Self::standard_beam(BeamTier::Lethal),
            ],
            cone_freeze: ConeFreezeDescriptor {
                charge_cost: 0.5,
                radius: 7.0,
                half_angle_degrees: 45.0,
                heat_delta: -30.0,
                stun_ticks: 180,
                severity_step: 0.1,
            },
            area_stun: AreaStunDescriptor {
                charge_cost: 2.0,
                stun_ticks: 300,
            },
            reveal: RevealDescriptor {
                charge_cost: 1.0,
                radius: 30.0,
            },
            nova: NovaDescriptor {
                blast_damage: 500.0,
                inner_band_fraction: 0.6,
                outer_band_fraction: 1.2,
                lethal_damage: 9999.0,
                lethal_armor_penetration: 10.0,
                ash_per_cell: 3,
                fire_size: 1.2,
                fire_heat: 2000.0,
                pulse_heat: 500.0,
                volatile_chance: 0.2,
                volatile_radius: 5.0,
                volatile_damage: 300.0,
                recoil_stun_ticks: 600,
            },
            disabled: AbilitySet::empty(),
        }
    }

    pub const fn standard_beam(tier: BeamTier) -> BeamDescriptor {
        match tier {
            BeamTier::Low => BeamDescriptor::new(0.1, 18.0, 0.25, 0.2, 0.6, 0.18),
            BeamTier::Medium => BeamDescriptor::new(0.3, 40.0, 0.5, 0.35, 0.8, 0.28),
            BeamTier::High => BeamDescriptor::new(0.7, 80.0, 0.8, 0.55, 1.05, 0.45),
            BeamTier::Lethal => BeamDescriptor::new(1.5, 150.0, 1.0, 0.9, 1.25, 0.65),
        }
    }

    pub fn with_beam(mut self, tier: BeamTier, descriptor: BeamDescriptor) -> Self {
        self.beams[tier.index()] = descriptor;
        self
    }

    pub fn with_cone_freeze(mut self, descriptor: ConeFreezeDescriptor) -> Self {
        self.cone_freeze = descriptor;
        self
    }

    pub fn with_area_stun(mut self, descriptor: AreaStunDescriptor) -> Self {
        self.area_stun = descriptor;
        self
    }

    pub fn with_reveal(mut self, descriptor: RevealDescriptor) -> Self {
        self.reveal = descriptor;
        self
    }

    pub fn with_nova(mut self, descriptor: NovaDescriptor) -> Self {
        self.nova = descriptor;
        self
    }

    /// Marks an entry unavailable. Lookups of it fail with [`CatalogError::Disabled`].
    pub fn disable(mut self, tier: AbilityTier) -> Self {
        self.disabled |= tier.flag();
        self
    }

    pub fn disabled(&self) -> AbilitySet {
        self.disabled
    }

    pub fn is_enabled(&self, tier: AbilityTier) -> bool {
        !self.disabled.contains(tier.flag())
    }

    fn ensure_enabled(&self, tier: AbilityTier) -> Result<(), CatalogError> {
        if self.is_enabled(tier) {
            Ok(())
        } else {
            Err(CatalogError::Disabled(tier))
        }
    }

    pub fn beam(&self, tier: BeamTier) -> Result<&BeamDescriptor, CatalogError> {
        self.ensure_enabled(tier.into())?;
        Ok(&self.beams[tier.index()])
    }

    pub fn cone_freeze(&self) -> Result<&ConeFreezeDescriptor, CatalogError> {
        self.ensure_enabled(OneShotKind::ConeFreeze.into())?;
        Ok(&self.cone_freeze)
    }

    pub fn area_stun(&self) -> Result<&AreaStunDescriptor, CatalogError> {
        self.ensure_enabled(OneShotKind::AreaStun.into())?;
        Ok(&self.area_stun)
    }

    pub fn reveal(&self) -> Result<&RevealDescriptor, CatalogError> {
        self.ensure_enabled(OneShotKind::Reveal.into())?;
        Ok(&self.reveal)
    }

    pub fn nova(&self) -> Result<&NovaDescriptor, CatalogError> {
        self.ensure_enabled(OneShotKind::Nova.into())?;
        Ok(&self.nova)
    }

    /// Validates every entry and disables the ones that fail.
    ///
    /// Returns the sanitized catalog together with the failures.
    pub fn sanitized(mut self) -> (Self, Vec<CatalogError>) {
        let mut failures = Vec::new();
        for tier in AbilityTier::all() {
            if let Err(error) = self.validate_entry(tier) {
                self.disabled |= tier.flag();
                failures.push(error);
            }
        }
        (self, failures)
    }

    fn validate_entry(&self, tier: AbilityTier) -> Result<(), CatalogError> {
        match tier {
            AbilityTier::Beam(beam) => self.beams[beam.index()].validate(beam),
            AbilityTier::OneShot(OneShotKind::ConeFreeze) => self.cone_freeze.validate(),
            AbilityTier::OneShot(OneShotKind::AreaStun) => self.area_stun.validate(),
            AbilityTier::OneShot(OneShotKind::Reveal) => self.reveal.validate(),
            AbilityTier::OneShot(OneShotKind::Nova) => self.nova.validate(),
        }
    }
}

impl Default for AbilityCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn non_negative(tier: AbilityTier, field: &'static str, value: f32) -> Result<(), CatalogError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::invalid(tier, field, "must be finite and non-negative"))
    }
}

fn probability(tier: AbilityTier, field: &'static str, value: f32) -> Result<(), CatalogError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CatalogError::invalid(tier, field, "must be within [0, 1]"))
    }
}

/// Configuration faults in the ability table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("ability {0} is disabled")]
    Disabled(AbilityTier),

    #[error("ability {0} has no definition")]
    Missing(AbilityTier),

    #[error("ability {tier}: {field} {reason}")]
    InvalidValue {
        tier: AbilityTier,
        field: &'static str,
        reason: &'static str,
    },
}

impl CatalogError {
    pub fn invalid(tier: AbilityTier, field: &'static str, reason: &'static str) -> Self {
        Self::InvalidValue {
            tier,
            field,
            reason,
        }
    }

    pub fn tier(&self) -> AbilityTier {
        match self {
            CatalogError::Disabled(tier) | CatalogError::Missing(tier) => *tier,
            CatalogError::InvalidValue { tier, .. } => *tier,
        }
    }
}

impl KitError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::Disabled(_) => ErrorSeverity::Validation,
            CatalogError::Missing(_) | CatalogError::InvalidValue { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Disabled(_) => "CATALOG_DISABLED",
            CatalogError::Missing(_) => "CATALOG_MISSING",
            CatalogError::InvalidValue { .. } => "CATALOG_INVALID_VALUE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_beam_tiers_match_table() {
        let catalog = AbilityCatalog::standard();
        let lethal = catalog.beam(BeamTier::Lethal).unwrap();
        assert_eq!(lethal.charge_cost_per_second, 1.5);
        assert_eq!(lethal.damage_per_second, 150.0);
        assert_eq!(lethal.ignite_chance_per_second, 1.0);

        let low = catalog.beam(BeamTier::Low).unwrap();
        assert_eq!(low.charge_cost_per_second, 0.1);
        assert_eq!(low.effect_size, 0.18);
    }

    #[test]
    fn every_tier_has_a_distinct_flag() {
        let mut seen = AbilitySet::empty();
        for tier in AbilityTier::all() {
            assert!(!seen.intersects(tier.flag()), "{tier} reuses a flag");
            seen |= tier.flag();
        }
        assert_eq!(seen, AbilitySet::all());
    }

    #[test]
    fn disabled_entries_fail_lookup() {
        let catalog = AbilityCatalog::standard().disable(OneShotKind::Nova.into());
        assert_eq!(
            catalog.nova().unwrap_err(),
            CatalogError::Disabled(AbilityTier::OneShot(OneShotKind::Nova))
        );
        assert!(catalog.reveal().is_ok());
    }

    #[test]
    fn sanitize_disables_invalid_entries() {
        let broken = BeamDescriptor {
            ignite_chance_per_second: 3.0,
            ..AbilityCatalog::standard_beam(BeamTier::High)
        };
        let (catalog, failures) = AbilityCatalog::standard()
            .with_beam(BeamTier::High, broken)
            .sanitized();

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tier(), AbilityTier::Beam(BeamTier::High));
        assert!(!catalog.is_enabled(BeamTier::High.into()));
        assert!(catalog.is_enabled(BeamTier::Medium.into()));
    }

    #[test]
    fn standard_catalog_is_valid() {
        let (_, failures) = AbilityCatalog::standard().sanitized();
        assert!(failures.is_empty(), "{failures:?}");
    }
}
