#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Breath Garden growth engine.
//!
//! This crate defines the message surface that connects the plant manager,
//! the authoritative plant state, and the pure growth systems. Systems read
//! immutable views of the plant, draw every stochastic decision from an
//! injected [`RandomSource`], and respond exclusively with [`Command`] batches.
//! The plant state executes those commands through its `apply` entry point and
//! reports [`Event`] values that the manager forwards to a [`GrowthObserver`].

mod clock;
mod config;
mod genetics;
mod observer;
mod random;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use clock::{Clock, FixedStepClock, ManualClock};
pub use config::{
    BreathTuning, ConfigError, FlowerTuning, LeafTuning, PaletteEntry, ShootTuning, Species,
    SpeciesConfig, StemTuning,
};
pub use genetics::{Genetics, Pattern, RarityTier, SizeCategory};
pub use observer::{GrowthObserver, NoopObserver};
pub use random::{seeded, shuffle, weighted_index, RandomSource};

/// Normalises a raw breath sample so the engine never observes invalid force.
///
/// Negative, NaN and infinite samples collapse to zero force.
#[must_use]
pub fn sanitize_force(force: f32) -> f32 {
    if force.is_finite() && force > 0.0 {
        force
    } else {
        0.0
    }
}

/// Identifier of an activation group. Group `0` is the initial group.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GroupId(u32);

impl GroupId {
    /// Reserved identifier of the group planted by `initialize`.
    pub const INITIAL: GroupId = GroupId(0);

    /// Creates a new group identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether this is the reserved initial group.
    #[must_use]
    pub const fn is_initial(&self) -> bool {
        self.0 == 0
    }
}

macro_rules! labelled_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "-{}"), self.0)
            }
        }
    };
}

labelled_id!(
    /// Stable identifier assigned to a primary stem.
    StemId,
    "stem"
);
labelled_id!(
    /// Stable identifier assigned to a basal shoot.
    ShootId,
    "branch"
);
labelled_id!(
    /// Stable identifier assigned to a flower.
    FlowerId,
    "flower"
);

/// Monotonic identifier counters owned by a single plant manager.
///
/// Counters are never rewound, so identifiers stay unique across resets of
/// the owning manager.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    stems: u32,
    shoots: u32,
    flowers: u32,
}

impl IdAllocator {
    /// Creates an allocator whose counters all start at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next stem identifier.
    pub fn next_stem(&mut self) -> StemId {
        let id = StemId::new(self.stems);
        self.stems = self.stems.saturating_add(1);
        id
    }

    /// Allocates the next basal shoot identifier.
    pub fn next_shoot(&mut self) -> ShootId {
        let id = ShootId::new(self.shoots);
        self.shoots = self.shoots.saturating_add(1);
        id
    }

    /// Allocates the next flower identifier.
    pub fn next_flower(&mut self) -> FlowerId {
        let id = FlowerId::new(self.flowers);
        self.flowers = self.flowers.saturating_add(1);
        id
    }
}

/// One vertex of a stem or shoot polyline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StemPoint {
    /// Horizontal canvas coordinate.
    pub x: f32,
    /// Vertical canvas coordinate; height grows toward smaller values.
    pub y: f32,
    /// Rendered thickness of the polyline at this vertex.
    pub thickness: f32,
}

impl StemPoint {
    /// Creates a new stem point.
    #[must_use]
    pub const fn new(x: f32, y: f32, thickness: f32) -> Self {
        Self { x, y, thickness }
    }
}

/// Tracks how far along the current polyline segment a growing axis is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentCursor {
    /// Height (or length along the axis) of the most recent point.
    pub last_point_height: f32,
    /// Length the axis must gain past the last point before the next vertex.
    pub next_segment_length: f32,
}

impl SegmentCursor {
    /// Creates a cursor anchored at the base of an axis.
    #[must_use]
    pub const fn at_base(first_segment_length: f32) -> Self {
        Self {
            last_point_height: 0.0,
            next_segment_length: first_segment_length,
        }
    }
}

/// Visual colour of a flower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowerColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl FlowerColor {
    /// Creates a new flower colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Host of a leaf, referenced by index into the append-only stem arena.
///
/// Indices stay valid because stems and shoots are never removed while a
/// plant is alive; a reset discards leaves together with their hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LeafHost {
    /// Index of the owning stem.
    pub stem_index: usize,
    /// Index of the basal shoot within the stem, when the leaf sits on a shoot.
    pub shoot_index: Option<usize>,
}

impl LeafHost {
    /// Host describing the primary axis of a stem.
    #[must_use]
    pub const fn stem(stem_index: usize) -> Self {
        Self {
            stem_index,
            shoot_index: None,
        }
    }

    /// Host describing a basal shoot of a stem.
    #[must_use]
    pub const fn shoot(stem_index: usize, shoot_index: usize) -> Self {
        Self {
            stem_index,
            shoot_index: Some(shoot_index),
        }
    }
}

/// Disjoint leaf categories; each host receives at most one batch per role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LeafRole {
    /// Leaves spread along a primary stem.
    Stem,
    /// Leaves clustered beneath a blooming flower spike.
    SubFloral,
    /// Leaves carried by a basal shoot.
    BasalShoot,
}

impl LeafRole {
    /// Reports whether the leaf belongs to a basal shoot.
    #[must_use]
    pub const fn is_basal_shoot(self) -> bool {
        matches!(self, Self::BasalShoot)
    }

    /// Reports whether the leaf belongs to the sub-floral cluster.
    #[must_use]
    pub const fn is_sub_floral(self) -> bool {
        matches!(self, Self::SubFloral)
    }
}

/// Side of its host a leaf unfolds toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LeafSide {
    /// Leaf points toward decreasing x.
    Left,
    /// Leaf points toward increasing x.
    Right,
}

impl LeafSide {
    /// Alternates sides by position within a batch.
    #[must_use]
    pub const fn alternating(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Activation resolved from a breath saccade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// A group that already exists regains the growth turn.
    Reactivate(GroupId),
    /// A new group must be planted and then receives the growth turn.
    Plant(GroupId),
}

impl Activation {
    /// Group that becomes active once the activation is applied.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        match self {
            Self::Reactivate(group) | Self::Plant(group) => *group,
        }
    }
}

/// Fully resolved description of a basal shoot to create.
#[derive(Clone, Debug, PartialEq)]
pub struct ShootBlueprint {
    /// Identifier allocated to the shoot.
    pub id: ShootId,
    /// Growth direction in radians from vertical; positive leans right.
    pub angle: f32,
    /// Length at which the shoot stops growing.
    pub max_height: f32,
    /// Per-shoot growth speed factor.
    pub growth_speed_multiplier: f32,
    /// Length of the first polyline segment.
    pub first_segment_length: f32,
    /// Thickness at the base of the shoot.
    pub base_thickness: f32,
    /// Thickness at the tip of a fully grown shoot.
    pub tip_thickness: f32,
}

/// Fully resolved description of a primary stem to create.
#[derive(Clone, Debug, PartialEq)]
pub struct StemBlueprint {
    /// Identifier allocated to the stem.
    pub id: StemId,
    /// Horizontal base position.
    pub base_x: f32,
    /// Vertical base position.
    pub base_y: f32,
    /// Height at which the stem becomes growth-terminal.
    pub max_height: f32,
    /// Per-stem growth speed factor.
    pub growth_speed_multiplier: f32,
    /// Horizontal drift per unit of height.
    pub lean: f32,
    /// Length of the first polyline segment.
    pub first_segment_length: f32,
    /// Thickness at the base of the stem.
    pub base_thickness: f32,
    /// Thickness at the tip of a fully grown stem.
    pub tip_thickness: f32,
    /// Length of the flower spike carried by the stem.
    pub spike_max_length: f32,
    /// Basal shoots sprouting from the stem base.
    pub shoots: Vec<ShootBlueprint>,
}

/// Placement of a single leaf inside a spawn batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafPlacement {
    /// Attachment point as a fraction of host height at spawn time.
    pub height_ratio: f32,
    /// Final size the leaf grows toward.
    pub max_size: f32,
    /// Unfolding angle in radians relative to the host.
    pub angle: f32,
    /// Side of the host the leaf unfolds toward.
    pub side: LeafSide,
}

/// Fully resolved description of a flower to create on a spike.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowerBlueprint {
    /// Identifier allocated to the flower.
    pub id: FlowerId,
    /// Horizontal position, fixed for the lifetime of the flower.
    pub x: f32,
    /// Vertical position, fixed for the lifetime of the flower.
    pub y: f32,
    /// Final size the flower grows toward.
    pub max_size: f32,
    /// Colour of the flower.
    pub color: FlowerColor,
    /// Genetics bundle for species that track them.
    pub genetics: Option<Genetics>,
}

/// Commands that express all permissible plant mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Creates a new activation group from resolved stem blueprints.
    PlantGroup {
        /// Identifier of the group being planted.
        group: GroupId,
        /// Stems composing the group.
        stems: Vec<StemBlueprint>,
    },
    /// Grants the primary growth turn to an existing group.
    ActivateGroup {
        /// Group that becomes active.
        group: GroupId,
    },
    /// Extends a primary stem of the active group.
    ExtendStem {
        /// Index of the stem in the arena.
        stem_index: usize,
        /// New height requested for the stem.
        height: f32,
        /// Polyline points completed by the extension.
        points: Vec<StemPoint>,
        /// Segment progress after the extension.
        cursor: SegmentCursor,
    },
    /// Extends a basal shoot.
    ExtendShoot {
        /// Index of the parent stem in the arena.
        stem_index: usize,
        /// Index of the shoot within its parent.
        shoot_index: usize,
        /// New length requested for the shoot.
        height: f32,
        /// Polyline points completed by the extension.
        points: Vec<StemPoint>,
        /// Segment progress after the extension.
        cursor: SegmentCursor,
    },
    /// Spawns one batch of leaves of a single role on a single host.
    SpawnLeaves {
        /// Host receiving the batch.
        host: LeafHost,
        /// Category of the batch.
        role: LeafRole,
        /// Leaves composing the batch.
        leaves: Vec<LeafPlacement>,
    },
    /// Latches a stem's flower spike into bloom and attaches its flowers.
    StartBlooming {
        /// Index of the stem whose spike blooms.
        stem_index: usize,
        /// Flowers attached to the spike.
        flowers: Vec<FlowerBlueprint>,
    },
    /// Grows every spawned leaf toward its maximum size.
    GrowLeaves {
        /// Growth applied this tick as a fraction of each leaf's maximum size.
        increment: f32,
    },
    /// Grows every spawned flower toward its maximum size.
    GrowFlowers {
        /// Growth applied this tick as a fraction of each flower's maximum size.
        increment: f32,
        /// Fraction of maximum size at which a flower becomes visible.
        visibility_fraction: f32,
    },
}

/// Events reported by the plant state after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new activation group was planted.
    GroupPlanted {
        /// Identifier of the planted group.
        group: GroupId,
        /// Number of stems created for the group.
        stems: usize,
    },
    /// Announces that a group received the primary growth turn.
    GroupActivated {
        /// Group that became active.
        group: GroupId,
    },
    /// Confirms that a stem was created.
    StemCreated {
        /// Identifier of the new stem.
        id: StemId,
        /// Index of the stem in the arena.
        stem_index: usize,
        /// Horizontal base position.
        x: f32,
        /// Vertical base position.
        y: f32,
    },
    /// Reports growth of a primary stem.
    StemGrew {
        /// Index of the stem in the arena.
        stem_index: usize,
        /// Height after the extension.
        height: f32,
    },
    /// Confirms that a batch of leaves was spawned.
    LeavesSpawned {
        /// Host receiving the batch.
        host: LeafHost,
        /// Category of the batch.
        role: LeafRole,
        /// Number of leaves spawned.
        count: usize,
    },
    /// Announces that a stem's flower spike started blooming.
    BloomingStarted {
        /// Index of the stem in the arena.
        stem_index: usize,
        /// Number of flowers attached to the spike.
        flowers: usize,
    },
    /// Announces that a flower grew past its visibility threshold.
    FlowerBecameVisible {
        /// Identifier of the flower.
        id: FlowerId,
        /// Horizontal position of the flower.
        x: f32,
        /// Vertical position of the flower.
        y: f32,
    },
}
