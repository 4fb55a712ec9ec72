//! **maze_voxels** generates perfect mazes with recursive division, solves them and turns them into
//! a voxel world of walls, a plank floor and an eroded floating island.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod maze;
pub mod maze_displays;
pub mod maze_iterators;
pub mod navigation;
pub mod pathing;
pub mod randomness;
pub mod renderers;
pub mod units;
pub mod voxels;
