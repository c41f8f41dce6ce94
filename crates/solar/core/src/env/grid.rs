//! In-memory host for tests, tools, and the sandbox binary.
//!
//! [`GridWorld`] keeps just enough simulation state (entities, health, stuns,
//! fire, heat, fog, residue) to observe every request the kit makes.
//! [`RecordingPresenter`] logs presentation requests instead of rendering them.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    Condition, Cue, EntityKind, EntityView, Explosion, MapDimensions, MapOracle, Message,
    OracleError, Presenter, Residue, SustainerHandle, SustainerKind, Visual, World,
};
use crate::state::{DamageInfo, EntityId, Position};

/// Host-side record of one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct GridEntity {
    pub view: EntityView,
    pub health: f32,
    pub max_health: f32,
    pub stun_ticks: u32,
    pub conditions: BTreeMap<Condition, f32>,
}

/// Mutating [`World`] calls that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorldOp {
    Damage,
    Stun,
    Ignite,
    Heat,
    Extinguish,
    Condition,
    Unfog,
    Destroy,
    Scorch,
    Residue,
    Explode,
    Resurrect,
}

/// Grid map with entities and the environmental layers the kit touches.
#[derive(Clone, Debug)]
pub struct GridWorld {
    dimensions: MapDimensions,
    sun_glow: f32,
    roofs: BTreeSet<Position>,
    walls: BTreeSet<Position>,
    entities: BTreeMap<EntityId, GridEntity>,
    next_id: u32,
    fires: BTreeMap<Position, f32>,
    heat: BTreeMap<Position, f32>,
    revealed: BTreeSet<Position>,
    scorched: BTreeSet<Position>,
    residue: BTreeMap<(Position, Residue), u32>,
    explosions: Vec<Explosion>,
    damage_log: Vec<(EntityId, DamageInfo)>,
    markers: BTreeSet<EntityId>,
    marker_log: Vec<(EntityId, bool)>,
    facing: BTreeMap<EntityId, Position>,
    resurrection_allowed: bool,
    injected_fault: Option<OracleError>,
    failing: BTreeMap<WorldOp, OracleError>,
}

impl GridWorld {
    pub const DEFAULT_HEALTH: f32 = 100.0;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
            sun_glow: 1.0,
            roofs: BTreeSet::new(),
            walls: BTreeSet::new(),
            entities: BTreeMap::new(),
            next_id: 1,
            fires: BTreeMap::new(),
            heat: BTreeMap::new(),
            revealed: BTreeSet::new(),
            scorched: BTreeSet::new(),
            residue: BTreeMap::new(),
            explosions: Vec::new(),
            damage_log: Vec::new(),
            markers: BTreeSet::new(),
            marker_log: Vec::new(),
            facing: BTreeMap::new(),
            resurrection_allowed: true,
            injected_fault: None,
            failing: BTreeMap::new(),
        }
    }

    // ===== setup =====

    pub fn set_sun_glow(&mut self, sun_glow: f32) {
        self.sun_glow = sun_glow;
    }

    pub fn set_roof(&mut self, cell: Position, roofed: bool) {
        if roofed {
            self.roofs.insert(cell);
        } else {
            self.roofs.remove(&cell);
        }
    }

    pub fn add_wall(&mut self, cell: Position) {
        self.walls.insert(cell);
    }

    pub fn set_resurrection_allowed(&mut self, allowed: bool) {
        self.resurrection_allowed = allowed;
    }

    /// The next mutating call fails with `error`.
    pub fn inject_fault(&mut self, error: OracleError) {
        self.injected_fault = Some(error);
    }

    /// Every call of `op` fails with `error` until [`GridWorld::restore_op`].
    pub fn fail_op(&mut self, op: WorldOp, error: OracleError) {
        self.failing.insert(op, error);
    }

    pub fn restore_op(&mut self, op: WorldOp) {
        self.failing.remove(&op);
    }

    pub fn spawn_character(&mut self, position: Position) -> EntityId {
        self.spawn(position, EntityKind::Character)
    }

    pub fn spawn_object(&mut self, position: Position, destructible: bool, volatile: bool) -> EntityId {
        self.spawn(
            position,
            EntityKind::Object {
                destructible,
                volatile,
            },
        )
    }

    pub fn spawn_corpse(&mut self, position: Position, inner: EntityId) -> EntityId {
        self.spawn(position, EntityKind::Corpse { inner })
    }

    fn spawn(&mut self, position: Position, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            GridEntity {
                view: EntityView {
                    id,
                    position,
                    kind,
                    dead: false,
                    downed: false,
                },
                health: Self::DEFAULT_HEALTH,
                max_health: Self::DEFAULT_HEALTH,
                stun_ticks: 0,
                conditions: BTreeMap::new(),
            },
        );
        id
    }

    pub fn move_entity(&mut self, id: EntityId, position: Position) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.view.position = position;
        }
    }

    pub fn kill(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.health = 0.0;
            entity.view.dead = true;
        }
    }

    pub fn set_downed(&mut self, id: EntityId, downed: bool) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.view.downed = downed;
        }
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<GridEntity> {
        self.entities.remove(&id)
    }

    /// Advances host timers (stuns) by one tick.
    pub fn tick(&mut self) {
        for entity in self.entities.values_mut() {
            entity.stun_ticks = entity.stun_ticks.saturating_sub(1);
        }
    }

    // ===== observation =====

    pub fn entity_state(&self, id: EntityId) -> Option<&GridEntity> {
        self.entities.get(&id)
    }

    pub fn health(&self, id: EntityId) -> Option<f32> {
        self.entities.get(&id).map(|entity| entity.health)
    }

    pub fn stun_ticks(&self, id: EntityId) -> u32 {
        self.entities.get(&id).map_or(0, |entity| entity.stun_ticks)
    }

    pub fn fire_at(&self, cell: Position) -> Option<f32> {
        self.fires.get(&cell).copied()
    }

    pub fn fires(&self) -> impl Iterator<Item = Position> + '_ {
        self.fires.keys().copied()
    }

    pub fn heat_at(&self, cell: Position) -> f32 {
        self.heat.get(&cell).copied().unwrap_or(0.0)
    }

    pub fn is_revealed(&self, cell: Position) -> bool {
        self.revealed.contains(&cell)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_scorched(&self, cell: Position) -> bool {
        self.scorched.contains(&cell)
    }

    pub fn residue_at(&self, cell: Position, residue: Residue) -> u32 {
        self.residue.get(&(cell, residue)).copied().unwrap_or(0)
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn damage_log(&self) -> &[(EntityId, DamageInfo)] {
        &self.damage_log
    }

    pub fn has_marker(&self, owner: EntityId) -> bool {
        self.markers.contains(&owner)
    }

    /// Every marker call in order: `(owner, active)`.
    pub fn marker_log(&self) -> &[(EntityId, bool)] {
        &self.marker_log
    }

    pub fn facing(&self, owner: EntityId) -> Option<Position> {
        self.facing.get(&owner).copied()
    }

    // ===== internals =====

    fn check_fault(&mut self, op: WorldOp) -> Result<(), OracleError> {
        if let Some(error) = self.injected_fault.take() {
            return Err(error);
        }
        match self.failing.get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn check_cell(&self, cell: Position) -> Result<(), OracleError> {
        if self.dimensions.contains(cell) {
            Ok(())
        } else {
            Err(OracleError::PositionOutOfBounds(cell))
        }
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut GridEntity, OracleError> {
        self.entities
            .get_mut(&id)
            .ok_or(OracleError::EntityNotFound(id))
    }
}

impl MapOracle for GridWorld {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn is_roofed(&self, position: Position) -> bool {
        self.roofs.contains(&position)
    }

    fn blocks_sight(&self, position: Position) -> bool {
        self.walls.contains(&position)
    }

    fn sun_glow(&self) -> f32 {
        self.sun_glow
    }

    fn entity(&self, id: EntityId) -> Option<EntityView> {
        self.entities.get(&id).map(|entity| entity.view)
    }

    fn occupants(&self, position: Position) -> Vec<EntityView> {
        self.entities
            .values()
            .filter(|entity| entity.view.position == position)
            .map(|entity| entity.view)
            .collect()
    }
}

impl World for GridWorld {
    fn apply_damage(&mut self, target: EntityId, damage: DamageInfo) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Damage)?;
        let entity = self.entity_mut(target)?;
        entity.health = (entity.health - damage.amount).max(0.0);
        let destroyed = if entity.health <= 0.0 {
            match entity.view.kind {
                EntityKind::Character => {
                    entity.view.dead = true;
                    false
                }
                EntityKind::Object { .. } => true,
                EntityKind::Corpse { .. } => false,
            }
        } else {
            false
        };
        if destroyed {
            self.entities.remove(&target);
        }
        self.damage_log.push((target, damage));
        Ok(())
    }

    fn stun(
        &mut self,
        target: EntityId,
        ticks: u32,
        _instigator: Option<EntityId>,
    ) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Stun)?;
        let entity = self.entity_mut(target)?;
        entity.stun_ticks = entity.stun_ticks.max(ticks);
        Ok(())
    }

    fn try_ignite(
        &mut self,
        cell: Position,
        size: f32,
        _instigator: Option<EntityId>,
    ) -> Result<bool, OracleError> {
        self.check_fault(WorldOp::Ignite)?;
        self.check_cell(cell)?;
        if self.walls.contains(&cell) || self.fires.contains_key(&cell) {
            return Ok(false);
        }
        self.fires.insert(cell, size);
        Ok(true)
    }

    fn push_heat(&mut self, cell: Position, energy: f32) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Heat)?;
        self.check_cell(cell)?;
        *self.heat.entry(cell).or_insert(0.0) += energy;
        Ok(())
    }

    fn extinguish(&mut self, cell: Position) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Extinguish)?;
        self.fires.remove(&cell);
        Ok(())
    }

    fn condition_severity(&self, target: EntityId, condition: Condition) -> Option<f32> {
        self.entities
            .get(&target)
            .and_then(|entity| entity.conditions.get(&condition).copied())
    }

    fn set_condition_severity(
        &mut self,
        target: EntityId,
        condition: Condition,
        severity: f32,
    ) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Condition)?;
        self.entity_mut(target)?
            .conditions
            .insert(condition, severity);
        Ok(())
    }

    fn unfog(&mut self, cell: Position) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Unfog)?;
        self.check_cell(cell)?;
        self.revealed.insert(cell);
        Ok(())
    }

    fn destroy(&mut self, target: EntityId) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Destroy)?;
        self.entities
            .remove(&target)
            .map(|_| ())
            .ok_or(OracleError::EntityNotFound(target))
    }

    fn scorch(&mut self, cell: Position) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Scorch)?;
        self.check_cell(cell)?;
        self.scorched.insert(cell);
        Ok(())
    }

    fn spawn_residue(
        &mut self,
        cell: Position,
        residue: Residue,
        amount: u32,
    ) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Residue)?;
        self.check_cell(cell)?;
        *self.residue.entry((cell, residue)).or_insert(0) += amount;
        Ok(())
    }

    fn explode(&mut self, explosion: Explosion) -> Result<(), OracleError> {
        self.check_fault(WorldOp::Explode)?;
        self.explosions.push(explosion);
        Ok(())
    }

    fn set_exhaustion_marker(&mut self, owner: EntityId, active: bool) {
        if active {
            self.markers.insert(owner);
        } else {
            self.markers.remove(&owner);
        }
        self.marker_log.push((owner, active));
    }

    fn try_resurrect(&mut self, owner: EntityId) -> Result<bool, OracleError> {
        self.check_fault(WorldOp::Resurrect)?;
        if !self.resurrection_allowed {
            return Ok(false);
        }
        let entity = self.entity_mut(owner)?;
        if !entity.view.dead {
            return Ok(false);
        }
        entity.view.dead = false;
        entity.view.downed = false;
        entity.health = entity.max_health;
        Ok(true)
    }

    fn face_toward(&mut self, owner: EntityId, cell: Position) {
        self.facing.insert(owner, cell);
    }
}

/// One presentation request.
#[derive(Clone, Debug, PartialEq)]
pub enum Presented {
    Cue(Cue, Option<Position>),
    Visual(Visual, Position, f32),
    Message(Message),
    SustainerStarted(SustainerHandle),
    SustainerEnded(SustainerHandle),
    CameraShake(f32),
}

/// Presenter that records every request.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    log: Vec<Presented>,
    next_handle: u64,
    live: BTreeSet<SustainerHandle>,
    maintained: u64,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &[Presented] {
        &self.log
    }

    pub fn messages(&self) -> Vec<Message> {
        self.log
            .iter()
            .filter_map(|entry| match entry {
                Presented::Message(message) => Some(*message),
                _ => None,
            })
            .collect()
    }

    pub fn live_sustainers(&self) -> usize {
        self.live.len()
    }

    pub fn maintain_count(&self) -> u64 {
        self.maintained
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn play_cue(&mut self, cue: Cue, at: Option<Position>) {
        self.log.push(Presented::Cue(cue, at));
    }

    fn spawn_visual(&mut self, visual: Visual, at: Position, scale: f32) {
        self.log.push(Presented::Visual(visual, at, scale));
    }

    fn message(&mut self, message: Message) {
        self.log.push(Presented::Message(message));
    }

    fn start_sustainer(&mut self, _kind: SustainerKind, _at: Position) -> Option<SustainerHandle> {
        self.next_handle += 1;
        let handle = SustainerHandle(self.next_handle);
        self.live.insert(handle);
        self.log.push(Presented::SustainerStarted(handle));
        Some(handle)
    }

    fn maintain_sustainer(&mut self, _handle: SustainerHandle) {
        self.maintained += 1;
    }

    fn end_sustainer(&mut self, handle: SustainerHandle) {
        self.live.remove(&handle);
        self.log.push(Presented::SustainerEnded(handle));
    }

    fn shake_camera(&mut self, magnitude: f32) {
        self.log.push(Presented::CameraShake(magnitude));
    }
}
