#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative plant state for the Breath Garden engine.
//!
//! [`PlantState`] exclusively owns every stem, basal shoot, leaf and flower.
//! Stems live in an append-only arena: leaves refer back to their host by
//! arena index, so stems are never removed or reordered while the plant is
//! alive. Only [`apply`] mutates the state; [`query`] exposes read-only views.

use breath_garden_core::{
    Command, Event, FlowerBlueprint, FlowerColor, FlowerId, Genetics, GroupId, LeafHost,
    LeafPlacement, LeafRole, LeafSide, SegmentCursor, ShootBlueprint, ShootId, StemBlueprint,
    StemId, StemPoint,
};

/// Aggregate owning all plant structures of one manager.
#[derive(Clone, Debug, Default)]
pub struct PlantState {
    stems: Vec<Stem>,
    leaves: Vec<Leaf>,
    groups: Vec<GroupId>,
    active_group: Option<GroupId>,
}

impl PlantState {
    /// Creates an empty plant with no groups.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn is_planted(&self, group: GroupId) -> bool {
        self.groups.contains(&group)
    }

    fn has_leaves(&self, host: LeafHost, role: LeafRole) -> bool {
        self.leaves
            .iter()
            .any(|leaf| leaf.host == host && leaf.role == role)
    }

    fn host_height(&self, host: LeafHost) -> Option<f32> {
        let stem = self.stems.get(host.stem_index)?;
        match host.shoot_index {
            None => Some(stem.current_height),
            Some(shoot_index) => stem
                .shoots
                .get(shoot_index)
                .map(|shoot| shoot.current_height),
        }
    }
}

/// Primary stem grown while its group holds the growth turn.
#[derive(Clone, Debug)]
pub struct Stem {
    id: StemId,
    group: GroupId,
    base_x: f32,
    base_y: f32,
    points: Vec<StemPoint>,
    current_height: f32,
    max_height: f32,
    growth_speed_multiplier: f32,
    lean: f32,
    base_thickness: f32,
    tip_thickness: f32,
    cursor: SegmentCursor,
    shoots: Vec<BasalShoot>,
    spike: FlowerSpike,
}

impl Stem {
    fn from_blueprint(group: GroupId, blueprint: StemBlueprint) -> Self {
        let base = StemPoint::new(blueprint.base_x, blueprint.base_y, blueprint.base_thickness);
        let shoots = blueprint
            .shoots
            .into_iter()
            .map(|shoot| BasalShoot::from_blueprint(blueprint.base_x, blueprint.base_y, shoot))
            .collect();
        Self {
            id: blueprint.id,
            group,
            base_x: blueprint.base_x,
            base_y: blueprint.base_y,
            points: vec![base],
            current_height: 0.0,
            max_height: blueprint.max_height,
            growth_speed_multiplier: blueprint.growth_speed_multiplier,
            lean: blueprint.lean,
            base_thickness: blueprint.base_thickness,
            tip_thickness: blueprint.tip_thickness,
            cursor: SegmentCursor::at_base(blueprint.first_segment_length),
            shoots,
            spike: FlowerSpike::new(blueprint.spike_max_length),
        }
    }

    /// Stable identifier of the stem.
    #[must_use]
    pub const fn id(&self) -> StemId {
        self.id
    }

    /// Activation group the stem was planted with.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Base position of the stem.
    #[must_use]
    pub const fn base(&self) -> (f32, f32) {
        (self.base_x, self.base_y)
    }

    /// Polyline vertices from base to tip; never empty.
    #[must_use]
    pub fn points(&self) -> &[StemPoint] {
        &self.points
    }

    /// Most recent vertex of the polyline.
    #[must_use]
    pub fn tip(&self) -> StemPoint {
        self.points.last().copied().unwrap_or(StemPoint::new(
            self.base_x,
            self.base_y,
            self.base_thickness,
        ))
    }

    /// Height grown so far.
    #[must_use]
    pub const fn current_height(&self) -> f32 {
        self.current_height
    }

    /// Height at which the stem stops growing.
    #[must_use]
    pub const fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Per-stem growth speed factor.
    #[must_use]
    pub const fn growth_speed_multiplier(&self) -> f32 {
        self.growth_speed_multiplier
    }

    /// Horizontal drift per unit of height.
    #[must_use]
    pub const fn lean(&self) -> f32 {
        self.lean
    }

    /// Thickness of the polyline at the provided height.
    #[must_use]
    pub fn thickness_at(&self, height: f32) -> f32 {
        taper(self.base_thickness, self.tip_thickness, height, self.max_height)
    }

    /// Segment progress of the polyline.
    #[must_use]
    pub const fn cursor(&self) -> SegmentCursor {
        self.cursor
    }

    /// Reports whether the stem reached its maximum height.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.current_height >= self.max_height
    }

    /// Basal shoots sprouting from the stem base.
    #[must_use]
    pub fn shoots(&self) -> &[BasalShoot] {
        &self.shoots
    }

    /// Flower spike carried by the stem.
    #[must_use]
    pub const fn spike(&self) -> &FlowerSpike {
        &self.spike
    }
}

/// Secondary axis growing from the base of a primary stem.
#[derive(Clone, Debug)]
pub struct BasalShoot {
    id: ShootId,
    angle: f32,
    base_x: f32,
    base_y: f32,
    points: Vec<StemPoint>,
    current_height: f32,
    max_height: f32,
    growth_speed_multiplier: f32,
    base_thickness: f32,
    tip_thickness: f32,
    cursor: SegmentCursor,
}

impl BasalShoot {
    fn from_blueprint(base_x: f32, base_y: f32, blueprint: ShootBlueprint) -> Self {
        Self {
            id: blueprint.id,
            angle: blueprint.angle,
            base_x,
            base_y,
            points: vec![StemPoint::new(base_x, base_y, blueprint.base_thickness)],
            current_height: 0.0,
            max_height: blueprint.max_height,
            growth_speed_multiplier: blueprint.growth_speed_multiplier,
            base_thickness: blueprint.base_thickness,
            tip_thickness: blueprint.tip_thickness,
            cursor: SegmentCursor::at_base(blueprint.first_segment_length),
        }
    }

    /// Stable identifier of the shoot.
    #[must_use]
    pub const fn id(&self) -> ShootId {
        self.id
    }

    /// Growth direction in radians from vertical, fixed at spawn.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Base position shared with the parent stem.
    #[must_use]
    pub const fn base(&self) -> (f32, f32) {
        (self.base_x, self.base_y)
    }

    /// Polyline vertices from base to tip; never empty.
    #[must_use]
    pub fn points(&self) -> &[StemPoint] {
        &self.points
    }

    /// Length grown so far.
    #[must_use]
    pub const fn current_height(&self) -> f32 {
        self.current_height
    }

    /// Length at which the shoot stops growing.
    #[must_use]
    pub const fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Per-shoot growth speed factor.
    #[must_use]
    pub const fn growth_speed_multiplier(&self) -> f32 {
        self.growth_speed_multiplier
    }

    /// Thickness of the polyline at the provided length.
    #[must_use]
    pub fn thickness_at(&self, height: f32) -> f32 {
        taper(self.base_thickness, self.tip_thickness, height, self.max_height)
    }

    /// Segment progress of the polyline.
    #[must_use]
    pub const fn cursor(&self) -> SegmentCursor {
        self.cursor
    }

    /// Reports whether the shoot reached its maximum length.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.current_height >= self.max_height
    }
}

/// Flower spike owned by a stem.
#[derive(Clone, Debug)]
pub struct FlowerSpike {
    flowers: Vec<Flower>,
    has_started_blooming: bool,
    max_length: f32,
}

impl FlowerSpike {
    fn new(max_length: f32) -> Self {
        Self {
            flowers: Vec::new(),
            has_started_blooming: false,
            max_length,
        }
    }

    /// Flowers ordered from the base of the spike to its tip.
    #[must_use]
    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    /// Reports whether the spike bloomed; latches once set.
    #[must_use]
    pub const fn has_started_blooming(&self) -> bool {
        self.has_started_blooming
    }

    /// Length of the spike along which flowers are distributed.
    #[must_use]
    pub const fn max_length(&self) -> f32 {
        self.max_length
    }
}

/// Flower attached to a spike at a fixed position.
#[derive(Clone, Debug)]
pub struct Flower {
    id: FlowerId,
    x: f32,
    y: f32,
    current_size: f32,
    max_size: f32,
    color: FlowerColor,
    genetics: Option<Genetics>,
    visible: bool,
}

impl Flower {
    fn from_blueprint(blueprint: FlowerBlueprint) -> Self {
        Self {
            id: blueprint.id,
            x: blueprint.x,
            y: blueprint.y,
            current_size: 0.0,
            max_size: blueprint.max_size.max(0.0),
            color: blueprint.color,
            genetics: blueprint.genetics,
            visible: false,
        }
    }

    /// Stable identifier of the flower.
    #[must_use]
    pub const fn id(&self) -> FlowerId {
        self.id
    }

    /// Position fixed when the flower spawned.
    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Size grown so far.
    #[must_use]
    pub const fn current_size(&self) -> f32 {
        self.current_size
    }

    /// Size the flower grows toward.
    #[must_use]
    pub const fn max_size(&self) -> f32 {
        self.max_size
    }

    /// Colour of the flower.
    #[must_use]
    pub const fn color(&self) -> FlowerColor {
        self.color
    }

    /// Genetics bundle, for species that track them.
    #[must_use]
    pub const fn genetics(&self) -> Option<&Genetics> {
        self.genetics.as_ref()
    }

    /// Reports whether the flower crossed its visibility threshold.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Leaf attached to a stem or basal shoot.
#[derive(Clone, Debug)]
pub struct Leaf {
    host: LeafHost,
    role: LeafRole,
    height_ratio: f32,
    attach_height: f32,
    current_size: f32,
    max_size: f32,
    angle: f32,
    side: LeafSide,
}

impl Leaf {
    fn from_placement(
        host: LeafHost,
        role: LeafRole,
        host_height: f32,
        placement: LeafPlacement,
    ) -> Self {
        let height_ratio = if placement.height_ratio.is_nan() {
            0.0
        } else {
            placement.height_ratio.clamp(0.0, 1.0)
        };
        Self {
            host,
            role,
            height_ratio,
            attach_height: height_ratio * host_height,
            current_size: 0.0,
            max_size: placement.max_size.max(0.0),
            angle: placement.angle,
            side: placement.side,
        }
    }

    /// Host the leaf is attached to.
    #[must_use]
    pub const fn host(&self) -> LeafHost {
        self.host
    }

    /// Index of the host stem.
    #[must_use]
    pub const fn stem_index(&self) -> usize {
        self.host.stem_index
    }

    /// Index of the host shoot, if any.
    #[must_use]
    pub const fn shoot_index(&self) -> Option<usize> {
        self.host.shoot_index
    }

    /// Category of the leaf.
    #[must_use]
    pub const fn role(&self) -> LeafRole {
        self.role
    }

    /// Reports whether the leaf sits on a basal shoot.
    #[must_use]
    pub const fn is_basal_shoot(&self) -> bool {
        self.role.is_basal_shoot()
    }

    /// Reports whether the leaf belongs to a sub-floral cluster.
    #[must_use]
    pub const fn is_sub_floral(&self) -> bool {
        self.role.is_sub_floral()
    }

    /// Attachment fraction of the host height at spawn time.
    #[must_use]
    pub const fn height_ratio(&self) -> f32 {
        self.height_ratio
    }

    /// Attachment height resolved at spawn time; never re-evaluated.
    #[must_use]
    pub const fn attach_height(&self) -> f32 {
        self.attach_height
    }

    /// Size grown so far.
    #[must_use]
    pub const fn current_size(&self) -> f32 {
        self.current_size
    }

    /// Size the leaf grows toward.
    #[must_use]
    pub const fn max_size(&self) -> f32 {
        self.max_size
    }

    /// Unfolding angle in radians.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Side of the host the leaf unfolds toward.
    #[must_use]
    pub const fn side(&self) -> LeafSide {
        self.side
    }
}

/// Applies the provided command to the plant, mutating state deterministically.
pub fn apply(state: &mut PlantState, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlantGroup { group, stems } => {
            if state.is_planted(group) {
                return;
            }

            let count = stems.len();
            for blueprint in stems {
                let stem_index = state.stems.len();
                let stem = Stem::from_blueprint(group, blueprint);
                out_events.push(Event::StemCreated {
                    id: stem.id,
                    stem_index,
                    x: stem.base_x,
                    y: stem.base_y,
                });
                state.stems.push(stem);
            }
            state.groups.push(group);
            out_events.push(Event::GroupPlanted {
                group,
                stems: count,
            });
        }
        Command::ActivateGroup { group } => {
            if !state.is_planted(group) {
                return;
            }
            state.active_group = Some(group);
            out_events.push(Event::GroupActivated { group });
        }
        Command::ExtendStem {
            stem_index,
            height,
            points,
            cursor,
        } => {
            let Some(active) = state.active_group else {
                return;
            };
            let Some(stem) = state.stems.get_mut(stem_index) else {
                return;
            };
            if stem.group != active {
                return;
            }

            let target = clamp_height(height, stem.current_height, stem.max_height);
            if target <= stem.current_height {
                return;
            }
            stem.current_height = target;
            stem.points.extend(points);
            stem.cursor = cursor;
            out_events.push(Event::StemGrew {
                stem_index,
                height: target,
            });
        }
        Command::ExtendShoot {
            stem_index,
            shoot_index,
            height,
            points,
            cursor,
        } => {
            let Some(shoot) = state
                .stems
                .get_mut(stem_index)
                .and_then(|stem| stem.shoots.get_mut(shoot_index))
            else {
                return;
            };

            let target = clamp_height(height, shoot.current_height, shoot.max_height);
            if target <= shoot.current_height {
                return;
            }
            shoot.current_height = target;
            shoot.points.extend(points);
            shoot.cursor = cursor;
        }
        Command::SpawnLeaves { host, role, leaves } => {
            if leaves.is_empty() || state.has_leaves(host, role) {
                return;
            }
            let Some(host_height) = state.host_height(host) else {
                return;
            };

            let count = leaves.len();
            state.leaves.extend(
                leaves
                    .into_iter()
                    .map(|placement| Leaf::from_placement(host, role, host_height, placement)),
            );
            out_events.push(Event::LeavesSpawned { host, role, count });
        }
        Command::StartBlooming {
            stem_index,
            flowers,
        } => {
            let Some(stem) = state.stems.get_mut(stem_index) else {
                return;
            };
            if stem.spike.has_started_blooming {
                return;
            }

            let count = flowers.len();
            stem.spike.has_started_blooming = true;
            stem.spike
                .flowers
                .extend(flowers.into_iter().map(Flower::from_blueprint));
            out_events.push(Event::BloomingStarted {
                stem_index,
                flowers: count,
            });
        }
        Command::GrowLeaves { increment } => {
            if !(increment > 0.0) {
                return;
            }
            for leaf in state.leaves.iter_mut() {
                leaf.current_size = grow_size(leaf.current_size, leaf.max_size, increment);
            }
        }
        Command::GrowFlowers {
            increment,
            visibility_fraction,
        } => {
            if !(increment > 0.0) {
                return;
            }
            let flowers = state
                .stems
                .iter_mut()
                .flat_map(|stem| stem.spike.flowers.iter_mut());
            for flower in flowers {
                flower.current_size = grow_size(flower.current_size, flower.max_size, increment);
                let threshold = flower.max_size * visibility_fraction;
                if !flower.visible && flower.current_size > 0.0 && flower.current_size >= threshold
                {
                    flower.visible = true;
                    out_events.push(Event::FlowerBecameVisible {
                        id: flower.id,
                        x: flower.x,
                        y: flower.y,
                    });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the plant state.
pub mod query {
    use breath_garden_core::{GroupId, LeafHost, LeafRole};

    use super::{Flower, Leaf, PlantState, Stem};

    /// Provides read-only access to the stem arena.
    #[must_use]
    pub fn stems(state: &PlantState) -> &[Stem] {
        &state.stems
    }

    /// Provides read-only access to every spawned leaf.
    #[must_use]
    pub fn leaves(state: &PlantState) -> &[Leaf] {
        &state.leaves
    }

    /// Iterates every flower across all spikes.
    pub fn flowers(state: &PlantState) -> impl Iterator<Item = &Flower> {
        state.stems.iter().flat_map(|stem| stem.spike.flowers.iter())
    }

    /// Group currently holding the primary growth turn, if any.
    #[must_use]
    pub fn active_group(state: &PlantState) -> Option<GroupId> {
        state.active_group
    }

    /// Groups in the order they were planted.
    #[must_use]
    pub fn planted_groups(state: &PlantState) -> &[GroupId] {
        &state.groups
    }

    /// Reports whether the group was planted.
    #[must_use]
    pub fn is_planted(state: &PlantState, group: GroupId) -> bool {
        state.is_planted(group)
    }

    /// Iterates the stems tagged with the provided group, with their arena indices.
    pub fn stems_in_group(
        state: &PlantState,
        group: GroupId,
    ) -> impl Iterator<Item = (usize, &Stem)> {
        state
            .stems
            .iter()
            .enumerate()
            .filter(move |(_, stem)| stem.group == group)
    }

    /// Reports whether the host already received a batch of the provided role.
    #[must_use]
    pub fn has_leaves(state: &PlantState, host: LeafHost, role: LeafRole) -> bool {
        state.has_leaves(host, role)
    }

    /// Captures a read-only snapshot for the rendering collaborator.
    #[must_use]
    pub fn snapshot(state: &PlantState) -> PlantSnapshot<'_> {
        PlantSnapshot {
            stems: &state.stems,
            leaves: &state.leaves,
        }
    }

    /// Borrowed view of every plant structure.
    #[derive(Clone, Copy, Debug)]
    pub struct PlantSnapshot<'a> {
        stems: &'a [Stem],
        leaves: &'a [Leaf],
    }

    impl<'a> PlantSnapshot<'a> {
        /// Stems in arena order.
        #[must_use]
        pub fn stems(&self) -> &'a [Stem] {
            self.stems
        }

        /// Leaves in spawn order.
        #[must_use]
        pub fn leaves(&self) -> &'a [Leaf] {
            self.leaves
        }

        /// Flowers in stem order, then spike order.
        pub fn flowers(&self) -> impl Iterator<Item = &'a Flower> + 'a {
            self.stems
                .iter()
                .flat_map(|stem| stem.spike().flowers().iter())
        }

        /// Reports whether the plant holds no stems.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.stems.is_empty()
        }
    }
}

fn clamp_height(requested: f32, current: f32, max: f32) -> f32 {
    requested.max(current).min(max)
}

fn grow_size(current: f32, max: f32, increment: f32) -> f32 {
    (current + increment * max).clamp(0.0, max)
}

fn taper(base: f32, tip: f32, height: f32, max_height: f32) -> f32 {
    if max_height <= 0.0 {
        return base;
    }
    let progress = (height / max_height).clamp(0.0, 1.0);
    base + (tip - base) * progress
}
