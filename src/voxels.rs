//! Voxel world synthesis: turns a maze into unit cube placements.
//!
//! The world has three layer groups that never overlap:
//!
//! * a plank floor at `y = 1` covering the maze footprint,
//! * wall stacks from `y = 2` upwards: stone brick posts at every grid line crossing and brick
//!   segments for every closed maze wall,
//! * an island of grass (`y = 0`) and dirt (below) around and under the maze, deepest in the middle.
//!
//! The maze `x` axis is the world `x` axis and the maze `y` axis is the world `z` axis. One maze
//! cell is `cell_size` units wide with a one unit wall line on each side, so grid lines are `pitch`
//! (`cell_size + 1`) units apart.
//!
//! Tops of walls and the bottom of the island are eroded with repeated random trials, so the exact
//! block count depends on the random source. `block_count_bounds` gives the range it always falls in.

use std::convert::TryFrom;

use itertools::iproduct;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::maze::Maze;
use crate::randomness::{eroded_height, Odds, RandomSource};
use crate::units::BlocksCount;

pub const ISLAND_TOP_LEVEL: i32 = 0;
pub const FLOOR_LEVEL: i32 = 1;
pub const WALL_BASE_LEVEL: i32 = 2;

pub const MAX_CELL_SIZE: u32 = 1024;
pub const MAX_WALL_HEIGHT: u32 = 1024;
pub const MAX_ISLAND_PADDING: u32 = 4096;
pub const MAX_EROSION_DEPTH: u32 = 1024;
/// Most blocks a single world may hold.
pub const MAX_BLOCKS: usize = 1 << 26;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum BlockType {
    Grass,
    Dirt,
    Plank,
    Brick,
    StoneBrick,
}

impl BlockType {
    pub const ALL: [BlockType; 5] = [BlockType::Grass,
                                     BlockType::Dirt,
                                     BlockType::Plank,
                                     BlockType::Brick,
                                     BlockType::StoneBrick];
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct VoxelCoordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoordinate {
    pub fn new(x: i32, y: i32, z: i32) -> VoxelCoordinate {
        VoxelCoordinate { x, y, z }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub struct BlockPlacement {
    pub position: VoxelCoordinate,
    pub block: BlockType,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct SynthesisParams {
    /// Width of a cell interior in world units.
    pub cell_size: u32,
    /// Blocks in an uneroded wall stack.
    pub wall_height: u32,
    /// Island margin around the maze footprint.
    pub island_padding: u32,
    /// Most blocks erosion may remove from one stack.
    pub erosion_depth: u32,
    /// Chance that each erosion step stops.
    pub erosion_odds: Odds,
}

impl Default for SynthesisParams {
    fn default() -> SynthesisParams {
        SynthesisParams {
            cell_size: 3,
            wall_height: 5,
            island_padding: 6,
            erosion_depth: 2,
            erosion_odds: Odds::new(1, 3),
        }
    }
}

impl SynthesisParams {
    #[inline]
    pub fn pitch(&self) -> u32 {
        self.cell_size + 1
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if self.cell_size == 0 || self.cell_size > MAX_CELL_SIZE {
            Some(format!("cell size {} must be between 1 and {}", self.cell_size, MAX_CELL_SIZE))
        } else if self.wall_height == 0 || self.wall_height > MAX_WALL_HEIGHT {
            Some(format!("wall height {} must be between 1 and {}",
                         self.wall_height, MAX_WALL_HEIGHT))
        } else if self.island_padding > MAX_ISLAND_PADDING {
            Some(format!("island padding {} must be at most {}",
                         self.island_padding, MAX_ISLAND_PADDING))
        } else if self.erosion_depth > MAX_EROSION_DEPTH {
            Some(format!("erosion depth {} must be at most {}",
                         self.erosion_depth, MAX_EROSION_DEPTH))
        } else if !self.erosion_odds.is_valid() {
            Some(format!("erosion odds {}/{} are not a probability",
                         self.erosion_odds.numerator, self.erosion_odds.denominator))
        } else {
            None
        };

        match problem {
            Some(reason) => Err(ErrorKind::InvalidParameters(reason).into()),
            None => Ok(()),
        }
    }

    /// Walls always keep at least their bottom block.
    #[inline]
    fn wall_max_omitted(&self) -> u32 {
        self.erosion_depth.min(self.wall_height - 1)
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisParamsBuilder {
    params: SynthesisParams,
}

impl Default for SynthesisParamsBuilder {
    fn default() -> SynthesisParamsBuilder {
        SynthesisParamsBuilder::new()
    }
}

impl SynthesisParamsBuilder {
    pub fn new() -> SynthesisParamsBuilder {
        SynthesisParamsBuilder { params: SynthesisParams::default() }
    }

    pub fn cell_size(mut self, cell_size: u32) -> Self {
        self.params.cell_size = cell_size;
        self
    }

    pub fn wall_height(mut self, wall_height: u32) -> Self {
        self.params.wall_height = wall_height;
        self
    }

    pub fn island_padding(mut self, island_padding: u32) -> Self {
        self.params.island_padding = island_padding;
        self
    }

    pub fn erosion_depth(mut self, erosion_depth: u32) -> Self {
        self.params.erosion_depth = erosion_depth;
        self
    }

    pub fn erosion_odds(mut self, erosion_odds: Odds) -> Self {
        self.params.erosion_odds = erosion_odds;
        self
    }

    pub fn build(self) -> Result<SynthesisParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}

/// The inclusive range the number of synthesized blocks always falls in.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct BlockCountBounds {
    pub minimum: BlocksCount,
    pub maximum: BlocksCount,
}

impl BlockCountBounds {
    pub fn contains(&self, count: usize) -> bool {
        self.minimum.0 <= count && count <= self.maximum.0
    }
}

/// One vertical stack of wall blocks at `(x, z)`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
struct WallColumn {
    x: i32,
    z: i32,
    block: BlockType,
}

/// One column of the island at `(x, z)` with its depth before erosion.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
struct IslandColumn {
    x: i32,
    z: i32,
    nominal_depth: u32,
}

/// World space layout of a maze: the footprint spans `[0, x_extent] x [0, z_extent]` and the
/// island `[-padding, extent + padding]` on both axes. Every coordinate fits an `i32`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
struct Footprint {
    pitch: i32,
    lines_x: i32,
    lines_z: i32,
    x_extent: i32,
    z_extent: i32,
    padding: i32,
}

impl Footprint {
    fn new(maze: &Maze, params: &SynthesisParams) -> Result<Footprint> {
        params.validate()?;

        let out_of_range = || -> Error {
            ErrorKind::WorldTooLarge(format!("a {}x{} maze with cell size {} and padding {} \
                                              exceeds the world coordinate range",
                                             maze.width(), maze.height(),
                                             params.cell_size, params.island_padding)).into()
        };
        let to_i32 = |n: usize| i32::try_from(n).map_err(|_| out_of_range());

        let pitch = to_i32(params.pitch() as usize)?;
        let padding = to_i32(params.island_padding as usize)?;
        let lines_x = to_i32(maze.width())?;
        let lines_z = to_i32(maze.height())?;
        let x_extent = lines_x.checked_mul(pitch).ok_or_else(out_of_range)?;
        let z_extent = lines_z.checked_mul(pitch).ok_or_else(out_of_range)?;
        x_extent.checked_add(padding).ok_or_else(out_of_range)?;
        z_extent.checked_add(padding).ok_or_else(out_of_range)?;

        let footprint = Footprint { pitch, lines_x, lines_z, x_extent, z_extent, padding };
        let columns = footprint.island_column_count();
        if columns > MAX_BLOCKS {
            return Err(ErrorKind::WorldTooLarge(format!("{} island columns exceed the limit of \
                                                         {} blocks",
                                                        columns, MAX_BLOCKS)).into());
        }
        Ok(footprint)
    }

    /// Floor columns, one per `(x, z)` of the footprint.
    fn floor_count(&self) -> usize {
        (self.x_extent as usize + 1) * (self.z_extent as usize + 1)
    }

    fn island_column_count(&self) -> usize {
        let side = |extent: i32| extent as usize + 2 * self.padding as usize + 1;
        side(self.x_extent).saturating_mul(side(self.z_extent))
    }
}

/// Is the wall along grid line `(line_x, line_z)` in direction `side` closed?
///
/// Grid lines are numbered `0..=width` and `0..=height`; the last line is the far side of the
/// last column or row of cells.
fn is_grid_wall_closed(maze: &Maze, cell_x: usize, cell_y: usize, side: CompassPrimary) -> bool {
    let (w, h) = (maze.width(), maze.height());
    let coord = |x: usize, y: usize| Coordinate::new(x as u32, y as u32);
    match side {
        CompassPrimary::North if cell_y == h => maze.is_wall_closed(coord(cell_x, h - 1),
                                                                    CompassPrimary::South),
        CompassPrimary::West if cell_x == w => maze.is_wall_closed(coord(w - 1, cell_y),
                                                                   CompassPrimary::East),
        _ => maze.is_wall_closed(coord(cell_x, cell_y), side),
    }
}

fn wall_columns(maze: &Maze, footprint: &Footprint) -> Vec<WallColumn> {
    let pitch = footprint.pitch;
    let (w, h) = (footprint.lines_x, footprint.lines_z);
    let mut columns = Vec::new();

    for line_z in 0..=h {
        for line_x in 0..=w {
            let (x0, z0) = (line_x * pitch, line_z * pitch);
            let (cell_x, cell_y) = (line_x as usize, line_z as usize);

            // Posts stand regardless of which walls are open
            columns.push(WallColumn { x: x0, z: z0, block: BlockType::StoneBrick });

            if line_x < w && is_grid_wall_closed(maze, cell_x, cell_y, CompassPrimary::North) {
                for k in 1..pitch {
                    columns.push(WallColumn { x: x0 + k, z: z0, block: BlockType::Brick });
                }
            }
            if line_z < h && is_grid_wall_closed(maze, cell_x, cell_y, CompassPrimary::West) {
                for k in 1..pitch {
                    columns.push(WallColumn { x: x0, z: z0 + k, block: BlockType::Brick });
                }
            }
        }
    }
    columns
}

fn island_columns(footprint: &Footprint) -> Vec<IslandColumn> {
    let padding = footprint.padding;
    let (min_x, max_x) = (-padding, footprint.x_extent + padding);
    let (min_z, max_z) = (-padding, footprint.z_extent + padding);

    iproduct!(min_z..=max_z, min_x..=max_x)
        .map(|(z, x)| {
            let min_distance = (x - min_x).min(max_x - x)
                                          .min(z - min_z)
                                          .min(max_z - z);
            IslandColumn { x, z, nominal_depth: min_distance as u32 + 1 }
        })
        .collect()
}

fn within_block_limit(count: Option<usize>) -> Result<usize> {
    match count {
        Some(count) if count <= MAX_BLOCKS => Ok(count),
        _ => Err(ErrorKind::WorldTooLarge(format!("more than {} blocks", MAX_BLOCKS)).into()),
    }
}

/// Fewest and most blocks `synthesize` can emit for this maze, before any random draw.
pub fn block_count_bounds(maze: &Maze, params: &SynthesisParams) -> Result<BlockCountBounds> {
    let footprint = Footprint::new(maze, params)?;
    bounds_for(maze, params, &footprint)
}

fn bounds_for(maze: &Maze, params: &SynthesisParams, footprint: &Footprint)
              -> Result<BlockCountBounds> {
    let floor = footprint.floor_count();

    let walls = wall_columns(maze, footprint).len();
    let wall_max = walls.checked_mul(params.wall_height as usize);
    let wall_min = walls.checked_mul((params.wall_height - params.wall_max_omitted()) as usize);

    let (island_min, island_max) = island_columns(footprint)
        .iter()
        .fold((Some(0usize), Some(0usize)), |(min, max), column| {
            let depth = column.nominal_depth as usize;
            let erodable = params.erosion_depth.min(column.nominal_depth) as usize;
            (min.and_then(|m| m.checked_add(depth - erodable)),
             max.and_then(|m| m.checked_add(depth)))
        });

    let total = |walls: Option<usize>, island: Option<usize>| {
        within_block_limit(walls.and_then(|w| w.checked_add(floor))
                             .and_then(|n| island.and_then(|i| n.checked_add(i))))
    };
    Ok(BlockCountBounds {
        minimum: BlocksCount(total(wall_min, island_min)?),
        maximum: BlocksCount(total(wall_max, island_max)?),
    })
}

/// Output buffer sized to the precomputed maximum that refuses to grow past it.
struct BlockBuffer {
    blocks: Vec<BlockPlacement>,
    maximum: usize,
}

impl BlockBuffer {
    fn with_bound(maximum: usize) -> Result<BlockBuffer> {
        let mut blocks = Vec::new();
        blocks.try_reserve_exact(maximum).map_err(|_| -> Error {
            ErrorKind::WorldTooLarge(format!("cannot allocate room for {} blocks", maximum)).into()
        })?;
        Ok(BlockBuffer { blocks, maximum })
    }

    #[inline]
    fn push(&mut self, x: i32, y: i32, z: i32, block: BlockType) -> Result<()> {
        if self.blocks.len() >= self.maximum {
            return Err(ErrorKind::BlockBudgetExceeded(self.maximum).into());
        }
        self.blocks.push(BlockPlacement { position: VoxelCoordinate { x, y, z }, block });
        Ok(())
    }
}

/// Build the voxel world for a maze.
pub fn synthesize<R>(maze: &Maze, params: &SynthesisParams, rng: &mut R)
                     -> Result<Vec<BlockPlacement>>
    where R: RandomSource + ?Sized
{
    let footprint = Footprint::new(maze, params)?;
    let bounds = bounds_for(maze, params, &footprint)?;
    let mut buffer = BlockBuffer::with_bound(bounds.maximum.0)?;
    let odds = params.erosion_odds;

    // Floor
    for (z, x) in iproduct!(0..=footprint.z_extent, 0..=footprint.x_extent) {
        buffer.push(x, FLOOR_LEVEL, z, BlockType::Plank)?;
    }

    // Walls, eroded from the top
    let wall_max_omitted = params.wall_max_omitted();
    for column in wall_columns(maze, &footprint) {
        let height = eroded_height(rng, params.wall_height, wall_max_omitted, odds) as i32;
        for y in WALL_BASE_LEVEL..WALL_BASE_LEVEL + height {
            buffer.push(column.x, y, column.z, column.block)?;
        }
    }

    // Island, eroded from the bottom
    for column in island_columns(&footprint) {
        let depth = eroded_height(rng, column.nominal_depth, params.erosion_depth, odds) as i32;
        for level in 0..depth {
            let block = if level == 0 { BlockType::Grass } else { BlockType::Dirt };
            buffer.push(column.x, ISLAND_TOP_LEVEL - level, column.z, block)?;
        }
    }

    let mut blocks = buffer.blocks;
    if !bounds.contains(blocks.len()) {
        return Err(ErrorKind::BlockCountMismatch(blocks.len(),
                                                 bounds.minimum.0,
                                                 bounds.maximum.0).into());
    }
    debug!("synthesized {} blocks for a {}x{} maze (bounds {}..={})",
           blocks.len(), maze.width(), maze.height(), bounds.minimum.0, bounds.maximum.0);
    blocks.shrink_to_fit();
    Ok(blocks)
}
