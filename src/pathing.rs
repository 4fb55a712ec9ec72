use bit_set::BitSet;
use fnv::FnvHashMap;
use log::debug;
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::maze::Maze;

/// Order in which the solver tries the ways out of a cell: up, down, left, right.
pub const SEARCH_PRIORITY: [CompassPrimary; 4] = [CompassPrimary::North,
                                                  CompassPrimary::South,
                                                  CompassPrimary::West,
                                                  CompassPrimary::East];

/// One cell of the current depth first search branch.
#[derive(Debug, Copy, Clone)]
struct SearchFrame {
    coord: Coordinate,
    came_from: Option<CompassPrimary>,
    next_direction: usize,
}

/// Depth first search from `start` to the maze exit.
///
/// `came_from` is the side of `start` the traveller entered through; it is never searched. Returns
/// `Ok(None)` when no path exists, which can only happen for a maze that was not fully generated.
/// In a perfect maze there is exactly one simple path, so the first one found is also the shortest.
pub fn solve(maze: &Maze,
             start: Coordinate,
             came_from: Option<CompassPrimary>)
             -> Result<Option<Vec<Coordinate>>> {

    let start_index = maze.coordinate_to_index(start)
                          .ok_or_else(|| ErrorKind::CoordinateOutOfBounds(start.x, start.y))?;
    let exit = maze.exit();

    // Cells on the current branch. Perfect mazes have no loops, but a hand edited one might.
    let mut on_branch = BitSet::with_capacity(maze.size());
    on_branch.insert(start_index);
    let mut branch = vec![SearchFrame {
                              coord: start,
                              came_from,
                              next_direction: 0,
                          }];

    while let Some(frame) = branch.last_mut() {
        if frame.coord == exit {
            let path = branch.iter().map(|frame| frame.coord).collect::<Vec<_>>();
            debug!("solved path from {:?} with {} steps", start, path.len());
            return Ok(Some(path));
        }

        let mut advance = None;
        while frame.next_direction < SEARCH_PRIORITY.len() {
            let dir = SEARCH_PRIORITY[frame.next_direction];
            frame.next_direction += 1;

            if Some(dir) == frame.came_from || !maze.is_passage_open(frame.coord, dir) {
                continue;
            }
            if let Some(next) = maze.neighbour_at_direction(frame.coord, dir) {
                let next_index = next.y as usize * maze.width() + next.x as usize;
                if !on_branch.contains(next_index) {
                    advance = Some((next, next_index, dir));
                    break;
                }
            }
        }

        match advance {
            Some((next, next_index, dir)) => {
                on_branch.insert(next_index);
                branch.push(SearchFrame {
                    coord: next,
                    came_from: Some(dir.opposite()),
                    next_direction: 0,
                });
            }
            None => {
                // Dead end, backtrack
                if let Some(dead_end) = branch.pop() {
                    let index = dead_end.coord.y as usize * maze.width() + dead_end.coord.x as usize;
                    on_branch.remove(index);
                }
            }
        }
    }

    debug!("no path from {:?} to the exit", start);
    Ok(None)
}

/// Path from the maze entrance, which is entered from the west.
pub fn solve_from_entrance(maze: &Maze) -> Result<Option<Vec<Coordinate>>> {
    solve(maze, maze.entrance(), Some(CompassPrimary::West))
}

/// Path to the exit from wherever the traveller currently stands.
pub fn solve_from(maze: &Maze, current: Coordinate) -> Result<Option<Vec<Coordinate>>> {
    solve(maze, current, None)
}

/// Steps from a start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Coordinate,
    distances: FnvHashMap<Coordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Breadth first flood fill over the open passages of the maze.
    pub fn for_maze(maze: &Maze, start_coordinate: Coordinate) -> Result<Distances> {

        if !maze.is_valid_coordinate(start_coordinate) {
            return Err(ErrorKind::CoordinateOutOfBounds(start_coordinate.x,
                                                        start_coordinate.y).into());
        }

        let mut max = 0;
        let mut distances =
            FnvHashMap::with_capacity_and_hasher(maze.size(), Default::default());
        distances.insert(start_coordinate, 0);

        // Every step is one from the previous cell, so the first distance recorded for a cell
        // is already the shortest and the map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                if let Some(links) = maze.links(*cell_coord) {
                    for link_coordinate in &*links {
                        if !distances.contains_key(link_coordinate) {
                            distances.insert(*link_coordinate, distance_to_cell + 1);
                            new_frontier.push(*link_coordinate);
                        }
                    }
                }
            }
            frontier = new_frontier;
        }

        Ok(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Coordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_to(&self, coord: Coordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    pub fn furthest_points(&self) -> SmallVec<[Coordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
                               .iter()
                               .filter(|&(_, distance)| *distance == furthest_distance)
                               .map(|(coord, _)| *coord)
                               .collect::<SmallVec<[Coordinate; 8]>>();
        furthest.sort();
        furthest
    }
}
