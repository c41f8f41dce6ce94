use super::{MapOracle, OracleError};
use crate::state::{DamageInfo, EntityId, Position};

/// Mutating half of the host simulation.
///
/// Every call is a narrow request into host systems (combat, fire, temperature,
/// fog). The kit never assumes a request succeeded unless the call returns
/// `Ok`.
pub trait World: MapOracle {
    /// Applies damage through the host's regular damage pipeline.
    fn apply_damage(&mut self, target: EntityId, damage: DamageInfo) -> Result<(), OracleError>;

    /// Stuns the target for `ticks`. Stuns never shorten an existing one.
    fn stun(
        &mut self,
        target: EntityId,
        ticks: u32,
        instigator: Option<EntityId>,
    ) -> Result<(), OracleError>;

    /// Attempts to start a fire of the given size. Returns whether a fire started.
    fn try_ignite(
        &mut self,
        cell: Position,
        size: f32,
        instigator: Option<EntityId>,
    ) -> Result<bool, OracleError>;

    /// Adds (or with a negative value removes) heat energy at the cell.
    fn push_heat(&mut self, cell: Position, energy: f32) -> Result<(), OracleError>;

    /// Puts out any fire burning in the cell.
    fn extinguish(&mut self, cell: Position) -> Result<(), OracleError>;

    /// Current severity of a condition on the target, `None` if absent.
    fn condition_severity(&self, target: EntityId, condition: Condition) -> Option<f32>;

    /// Adds the condition if absent and sets its severity.
    fn set_condition_severity(
        &mut self,
        target: EntityId,
        condition: Condition,
        severity: f32,
    ) -> Result<(), OracleError>;

    /// Removes fog of war from the cell.
    fn unfog(&mut self, cell: Position) -> Result<(), OracleError>;

    /// Destroys a destructible object outright.
    fn destroy(&mut self, target: EntityId) -> Result<(), OracleError>;

    /// Replaces the cell's floor with scorched ground.
    fn scorch(&mut self, cell: Position) -> Result<(), OracleError>;

    /// Leaves residue (ash, filth) in the cell.
    fn spawn_residue(
        &mut self,
        cell: Position,
        residue: Residue,
        amount: u32,
    ) -> Result<(), OracleError>;

    /// Runs a host explosion (blast damage, sound, visuals).
    fn explode(&mut self, explosion: Explosion) -> Result<(), OracleError>;

    /// Shows or hides the exhaustion debuff on the owner.
    ///
    /// Called exactly once on entering and once on leaving exhaustion.
    fn set_exhaustion_marker(&mut self, owner: EntityId, active: bool);

    /// Asks the host to bring a dead owner back. Returns whether it worked.
    fn try_resurrect(&mut self, owner: EntityId) -> Result<bool, OracleError>;

    /// Turns the owner toward a cell. Cosmetic; hosts may ignore it.
    fn face_toward(&mut self, _owner: EntityId, _cell: Position) {}
}

/// Conditions the kit reads and writes on characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Cold exposure applied by the freezing breath.
    Hypothermia,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Residue {
    Ash,
}

/// Explosion request forwarded to the host.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Explosion {
    pub center: Position,
    pub radius: f32,
    pub damage: DamageInfo,
    /// Residue scattered over the blast area, if any.
    pub residue: Option<Residue>,
}
