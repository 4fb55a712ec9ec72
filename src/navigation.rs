//! Automated walking of a solved maze, and the session state a viewer keeps between mazes.

use log::debug;

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::generators;
use crate::maze::Maze;
use crate::pathing;
use crate::randomness::RandomSource;
use crate::units::{Height, Width};
use crate::voxels::{self, BlockPlacement, SynthesisParams};

/// A single move between two adjacent cells.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Step {
    pub from: Coordinate,
    pub to: Coordinate,
    pub heading: CompassPrimary,
}

/// Hands out the moves along a path one at a time, so whatever animates the traveller can pull
/// the next move when the previous one has finished.
#[derive(Debug, Clone)]
pub struct Autopilot {
    path: Vec<Coordinate>,
    index: usize,
}

impl Autopilot {
    pub fn new(path: Vec<Coordinate>) -> Autopilot {
        Autopilot { path, index: 0 }
    }

    /// Where the traveller stands now, `None` for an empty path.
    pub fn position(&self) -> Option<Coordinate> {
        self.path.get(self.index).cloned()
    }

    pub fn remaining(&self) -> usize {
        self.path.len().saturating_sub(self.index + 1)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }
}

impl Iterator for Autopilot {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let from = *self.path.get(self.index)?;
        let to = *self.path.get(self.index + 1)?;
        let heading = from.direction_to(to)?;
        self.index += 1;
        Some(Step { from, to, heading })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

/// The current maze together with everything derived from it.
#[derive(Debug, Default)]
pub struct MazeSession {
    maze: Option<Maze>,
    path: Vec<Coordinate>,
    blocks: Vec<BlockPlacement>,
}

impl MazeSession {
    pub fn new() -> MazeSession {
        MazeSession::default()
    }

    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    /// Mutable access for attaching a cell display.
    pub fn maze_mut(&mut self) -> Option<&mut Maze> {
        self.maze.as_mut()
    }

    /// Entrance to exit path of the current maze.
    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn blocks(&self) -> &[BlockPlacement] {
        &self.blocks
    }

    /// Replace the current maze with a new one, solving it and building its voxel world.
    ///
    /// The previous maze, path and blocks are released before the new maze is allocated. On
    /// error the session is left empty.
    pub fn regenerate<R>(&mut self,
                         width: Width,
                         height: Height,
                         params: &SynthesisParams,
                         rng: &mut R)
                         -> Result<()>
        where R: RandomSource + ?Sized
    {
        self.clear();

        let maze = generators::generate(width, height, rng)?;
        let path = entrance_path(&maze)?;
        let blocks = voxels::synthesize(&maze, params, rng)?;
        debug!("session holds a {}x{} maze, {} step path, {} blocks",
               maze.width(), maze.height(), path.len(), blocks.len());

        self.maze = Some(maze);
        self.path = path;
        self.blocks = blocks;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.maze = None;
        self.path = Vec::new();
        self.blocks = Vec::new();
    }

    /// Autopilot along the entrance to exit path.
    pub fn autopilot(&self) -> Autopilot {
        Autopilot::new(self.path.clone())
    }

    /// Autopilot to the exit from wherever the traveller currently stands.
    ///
    /// `Ok(None)` when there is no maze or no way out from `current`.
    pub fn autopilot_from(&self, current: Coordinate) -> Result<Option<Autopilot>> {
        match self.maze {
            Some(ref maze) => Ok(pathing::solve_from(maze, current)?.map(Autopilot::new)),
            None => Ok(None),
        }
    }
}

/// A generated maze is perfect, so a missing path means the maze is broken.
fn entrance_path(maze: &Maze) -> Result<Vec<Coordinate>> {
    let exit = maze.exit();
    pathing::solve_from_entrance(maze)?
        .ok_or_else(|| ErrorKind::ExitUnreachable(exit.x, exit.y).into())
}

#[cfg(test)]
mod tests {

    use quickcheck::quickcheck;

    use super::*;
    use crate::randomness::seeded_rng;

    fn gc(x: u32, y: u32) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn session(w: usize, h: usize, seed: u64) -> MazeSession {
        let mut session = MazeSession::new();
        session.regenerate(Width(w), Height(h), &SynthesisParams::default(), &mut seeded_rng(seed))
               .unwrap();
        session
    }

    #[test]
    fn autopilot_steps_along_path() {
        let path = vec![gc(0, 0), gc(1, 0), gc(1, 1), gc(0, 1)];
        let mut autopilot = Autopilot::new(path);
        assert_eq!(autopilot.position(), Some(gc(0, 0)));
        assert_eq!(autopilot.remaining(), 3);

        assert_eq!(autopilot.next(),
                   Some(Step { from: gc(0, 0), to: gc(1, 0), heading: CompassPrimary::East }));
        assert_eq!(autopilot.next().map(|s| s.heading), Some(CompassPrimary::South));
        assert_eq!(autopilot.next().map(|s| s.heading), Some(CompassPrimary::West));
        assert_eq!(autopilot.position(), Some(gc(0, 1)));
        assert!(autopilot.is_finished());
        assert_eq!(autopilot.next(), None);
    }

    #[test]
    fn empty_and_single_cell_paths() {
        let mut empty = Autopilot::new(vec![]);
        assert_eq!(empty.position(), None);
        assert_eq!(empty.remaining(), 0);
        assert_eq!(empty.next(), None);

        let mut single = Autopilot::new(vec![gc(2, 2)]);
        assert_eq!(single.position(), Some(gc(2, 2)));
        assert_eq!(single.next(), None);
    }

    #[test]
    fn regenerate_fills_the_session() {
        let s = session(5, 4, 77);
        let maze = s.maze().unwrap();
        assert_eq!((maze.width(), maze.height()), (5, 4));
        assert_eq!(s.path().first(), Some(&gc(0, 0)));
        assert_eq!(s.path().last(), Some(&gc(4, 3)));
        let bounds = voxels::block_count_bounds(maze, &SynthesisParams::default()).unwrap();
        assert!(bounds.contains(s.blocks().len()));
    }

    #[test]
    fn regenerate_replaces_previous_maze() {
        let mut s = session(3, 3, 1);
        s.regenerate(Width(6), Height(2), &SynthesisParams::default(), &mut seeded_rng(2))
         .unwrap();
        assert_eq!(s.maze().map(|m| m.size()), Some(12));
        assert_eq!(s.path().last(), Some(&gc(5, 1)));
    }

    #[test]
    fn failed_regenerate_leaves_session_empty() {
        let mut s = session(3, 3, 1);
        let result = s.regenerate(Width(0), Height(3), &SynthesisParams::default(),
                                  &mut seeded_rng(2));
        assert!(result.is_err());
        assert!(s.maze().is_none());
        assert!(s.path().is_empty());
        assert!(s.blocks().is_empty());
        assert!(s.autopilot_from(gc(0, 0)).unwrap().is_none());
    }

    #[test]
    fn walled_off_exit_is_an_error() {
        let mut maze = Maze::new(Width(2), Height(1)).unwrap();
        assert_eq!(entrance_path(&maze).unwrap(), vec![gc(0, 0), gc(1, 0)]);

        maze.set_wall(gc(0, 0), CompassPrimary::East, true).unwrap();
        let err = entrance_path(&maze).expect_err("exit walled off");
        match *err.kind() {
            ErrorKind::ExitUnreachable(1, 0) => {}
            ref other => panic!("expected unreachable exit, got {:?}", other),
        }
    }

    #[test]
    fn autopilot_from_out_of_bounds_is_an_error() {
        let s = session(3, 3, 4);
        assert!(s.autopilot_from(gc(3, 0)).is_err());
    }

    #[test]
    fn autopilot_reaches_the_exit_from_anywhere() {
        fn p(w: u8, h: u8, seed: u64, x: u8, y: u8) -> bool {
            let (w, h) = (1 + (w % 8) as usize, 1 + (h % 8) as usize);
            let s = session(w, h, seed);
            let start = gc(x as u32 % w as u32, y as u32 % h as u32);
            let autopilot = match s.autopilot_from(start) {
                Ok(Some(autopilot)) => autopilot,
                _ => return false,
            };
            let maze = s.maze().unwrap();
            let expected_steps = autopilot.remaining();
            let steps = autopilot.collect::<Vec<_>>();
            let last = steps.last().map(|step| step.to).unwrap_or(start);
            steps.len() == expected_steps &&
            last == maze.exit() &&
            steps.iter().all(|step| maze.is_linked(step.from, step.to))
        }
        quickcheck(p as fn(u8, u8, u64, u8, u8) -> bool);
    }
}
