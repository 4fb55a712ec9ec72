use std::fmt;
use std::rc::Rc;

use log::trace;
use petgraph::algo::connected_components;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;
use smallvec::SmallVec;

use crate::cells::{Cell, CompassPrimary, Coordinate, CoordinateOptionSmallVec,
                   CoordinateSmallVec};
use crate::errors::*;
use crate::maze_displays::GridDisplay;
use crate::maze_iterators::{BatchIter, BatchIterType, CellIter};
use crate::units::{EdgesCount, Height, NodesCount, Width};

pub type PassageGraph = Graph<Coordinate, (), Undirected>;

/// The at most two passages a cell owns: east and south.
type PassagePairs = SmallVec<[(Coordinate, Coordinate); 2]>;

/// A rectangular grid of cells with walls between them.
///
/// A fresh maze has every interior wall open, every border wall closed, and two border openings:
/// the entrance on the west side of `(0, 0)` and the exit on the east side of
/// `(width - 1, height - 1)`.
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Maze :: width: {:?}, height: {:?}, passages: {:?}",
               self.width, self.height, self.passages_count())
    }
}

impl Maze {
    pub fn new(width: Width, height: Height) -> Result<Maze> {
        let (Width(w), Height(h)) = (width, height);
        let representable = w <= u32::MAX as usize && h <= u32::MAX as usize &&
                            w.checked_mul(h).is_some();
        if w == 0 || h == 0 || !representable {
            return Err(ErrorKind::InvalidDimensions(w as i64, h as i64).into());
        }

        let mut cells = vec![Cell::default(); w * h];
        for x in 0..w {
            cells[x].set(CompassPrimary::North, true);
            cells[(h - 1) * w + x].set(CompassPrimary::South, true);
        }
        for y in 0..h {
            cells[y * w].set(CompassPrimary::West, true);
            cells[y * w + w - 1].set(CompassPrimary::East, true);
        }

        // Open the entrance and exit
        cells[0].set(CompassPrimary::West, false);
        cells[w * h - 1].set(CompassPrimary::East, false);

        Ok(Maze {
            width: w,
            height: h,
            cells,
            grid_display: None,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// `(cells, passages)` of a fully generated maze, a spanning tree over the cells.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        (NodesCount(self.size()), EdgesCount(self.size() - 1))
    }

    #[inline]
    pub fn entrance(&self) -> Coordinate {
        Coordinate::new(0, 0)
    }

    #[inline]
    pub fn exit(&self) -> Coordinate {
        Coordinate::new(self.width as u32 - 1, self.height as u32 - 1)
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    /// Is the grid coordinate valid for this maze - within the maze's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        (coord.x as usize) < self.width && (coord.y as usize) < self.height
    }

    /// Convert a coordinate to a one dimensional row-major index in the range 0...maze.size().
    /// Returns None if the coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_coordinate(&self, index: usize) -> Coordinate {
        Coordinate::new((index % self.width) as u32, (index / self.width) as u32)
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Coordinate,
                                  direction: CompassPrimary)
                                  -> Option<Coordinate> {
        coord.offset(direction)
             .and_then(|neighbour_coord| if self.is_valid_coordinate(neighbour_coord) {
                 Some(neighbour_coord)
             } else {
                 None
             })
    }

    pub fn neighbours_at_directions(&self,
                                    coord: Coordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    /// Cells that are to the North, South, East or West of a particular cell, but not
    /// necessarily reachable through an open wall.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        if !self.is_valid_coordinate(coord) {
            return CoordinateSmallVec::new();
        }
        CompassPrimary::ALL.iter()
                           .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                           .collect()
    }

    /// Is the wall on the given side of a cell closed? Invalid coordinates have no way through.
    pub fn is_wall_closed(&self, coord: Coordinate, side: CompassPrimary) -> bool {
        self.cell(coord).map_or(true, |cell| cell.wall(side))
    }

    /// Can we step from the cell to its neighbour in `direction`? Border openings lead out of the
    /// maze rather than to a neighbour, so they are not passages.
    pub fn is_passage_open(&self, coord: Coordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() &&
        !self.is_wall_closed(coord, direction)
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, coord: Coordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        let linked = CompassPrimary::ALL.iter()
                                        .filter(|dir| self.is_passage_open(coord, **dir))
                                        .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                                        .collect();
        Some(linked)
    }

    /// Are two cells in the maze linked by a passage?
    pub fn is_linked(&self, a: Coordinate, b: Coordinate) -> bool {
        a.direction_to(b)
         .map_or(false, |dir| self.is_passage_open(a, dir))
    }

    /// Open or close one wall.
    ///
    /// Both cells sharing the wall are updated together. A wall on the outer border has no
    /// neighbour and only the one cell changes, which is how the entrance and exit are made.
    pub fn set_wall(&mut self,
                    coord: Coordinate,
                    side: CompassPrimary,
                    closed: bool)
                    -> Result<()> {
        let index = self.coordinate_to_index(coord)
                        .ok_or_else(|| ErrorKind::CoordinateOutOfBounds(coord.x, coord.y))?;
        self.cells[index].set(side, closed);

        if let Some(neighbour) = self.neighbour_at_direction(coord, side) {
            let neighbour_index = neighbour.y as usize * self.width + neighbour.x as usize;
            self.cells[neighbour_index].set(side.opposite(), closed);
        }
        trace!("wall {:?} of {:?} closed: {}", side, coord, closed);
        Ok(())
    }

    /// Number of open walls between pairs of cells inside the maze.
    pub fn passages_count(&self) -> usize {
        self.iter_passages().count()
    }

    /// Every open passage once, as `(cell, eastern or southern neighbour)`.
    pub fn iter_passages<'a>(&'a self) -> impl Iterator<Item = (Coordinate, Coordinate)> + 'a {
        self.iter().flat_map(move |coord| {
            [CompassPrimary::East, CompassPrimary::South]
                .iter()
                .filter(move |dir| self.is_passage_open(coord, **dir))
                .filter_map(move |dir| self.neighbour_at_direction(coord, *dir))
                .map(move |neighbour| (coord, neighbour))
                .collect::<PassagePairs>()
        })
    }

    /// Do both sides of every interior wall agree?
    pub fn walls_are_symmetric(&self) -> bool {
        self.iter().all(|coord| {
            [CompassPrimary::East, CompassPrimary::South].iter().all(|dir| {
                self.neighbour_at_direction(coord, *dir).map_or(true, |neighbour| {
                    self.is_wall_closed(coord, *dir) == self.is_wall_closed(neighbour, dir.opposite())
                })
            })
        })
    }

    /// The open passages as an undirected graph. Node indices are the row-major cell indices.
    pub fn passage_graph(&self) -> PassageGraph {
        let mut graph = PassageGraph::with_capacity(self.size(), self.size());
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_passages() {
            let a_index = self.coordinate_to_index(a).map(NodeIndex::new);
            let b_index = self.coordinate_to_index(b).map(NodeIndex::new);
            if let (Some(a_index), Some(b_index)) = (a_index, b_index) {
                let _ = graph.add_edge(a_index, b_index, ());
            }
        }
        graph
    }

    /// Is the passage graph a spanning tree: every cell reachable and no loops?
    pub fn is_perfect(&self) -> bool {
        let graph = self.passage_graph();
        graph.edge_count() == self.size() - 1 && connected_components(&graph) == 1
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.size())
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::new(BatchIterType::Row, self.width, self.height)
    }

    #[inline]
    pub fn iter_column(&self) -> BatchIter {
        BatchIter::new(BatchIterType::Column, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;

    fn empty_maze(w: usize, h: usize) -> Maze {
        Maze::new(Width(w), Height(h)).expect("valid maze dimensions")
    }

    fn gc(x: u32, y: u32) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for &(w, h) in &[(0, 0), (0, 4), (4, 0)] {
            let err = Maze::new(Width(w), Height(h)).expect_err("zero sized maze");
            match *err.kind() {
                ErrorKind::InvalidDimensions(_, _) => {}
                ref other => panic!("expected invalid dimensions, got {:?}", other),
            }
        }
    }

    #[test]
    fn empty_maze_has_closed_border_with_entrance_and_exit() {
        let m = empty_maze(3, 2);
        for coord in m.iter() {
            let cell = m.cell(coord).unwrap();
            assert_eq!(cell.top(), coord.y == 0);
            assert_eq!(cell.bottom(), coord.y == 1);
            let is_entrance = coord == gc(0, 0);
            let is_exit = coord == gc(2, 1);
            assert_eq!(cell.left(), coord.x == 0 && !is_entrance);
            assert_eq!(cell.right(), coord.x == 2 && !is_exit);
        }
        assert_eq!(m.entrance(), gc(0, 0));
        assert_eq!(m.exit(), gc(2, 1));
    }

    #[test]
    fn single_cell_maze_opens_both_sides() {
        let m = empty_maze(1, 1);
        let cell = m.cell(gc(0, 0)).unwrap();
        assert!(cell.top() && cell.bottom());
        assert!(!cell.left() && !cell.right());
        assert_eq!(m.passages_count(), 0);
        assert!(m.is_perfect());
    }

    #[test]
    fn neighbour_cells() {
        let m = empty_maze(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Coordinate]| {
            let neighbours: Vec<Coordinate> = m.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<Coordinate> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        assert!(m.neighbours(gc(10, 10)).is_empty());
    }

    #[test]
    fn neighbours_at_dirs() {
        let m = empty_maze(2, 2);
        let n = m.neighbours_at_directions(gc(0, 0), &[CompassPrimary::West, CompassPrimary::South]);
        assert_eq!(&*n, &[None, Some(gc(0, 1))]);
        let n = m.neighbours_at_directions(gc(1, 1), &[CompassPrimary::North, CompassPrimary::East]);
        assert_eq!(&*n, &[Some(gc(1, 0)), None]);
    }

    #[test]
    fn coordinate_as_index() {
        let m = empty_maze(3, 3);
        let indices = m.iter()
                       .map(|coord| m.coordinate_to_index(coord))
                       .collect::<Vec<_>>();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);
        for i in 0..9 {
            assert_eq!(m.coordinate_to_index(m.index_to_coordinate(i)), Some(i));
        }

        assert_eq!(m.coordinate_to_index(gc(2, 3)), None);
        assert_eq!(m.coordinate_to_index(gc(3, 2)), None);
        assert_eq!(m.coordinate_to_index(gc(u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn cell_iter() {
        let m = empty_maze(2, 2);
        assert_eq!(m.iter().len(), 4);
        assert_eq!(m.iter().collect::<Vec<Coordinate>>(),
                   &[gc(0, 0), gc(1, 0), gc(0, 1), gc(1, 1)]);
    }

    #[test]
    fn row_and_column_iter() {
        let m = empty_maze(2, 3);
        assert_eq!(m.iter_row().collect::<Vec<Vec<Coordinate>>>(),
                   vec![vec![gc(0, 0), gc(1, 0)],
                        vec![gc(0, 1), gc(1, 1)],
                        vec![gc(0, 2), gc(1, 2)]]);
        assert_eq!(m.iter_column().collect::<Vec<Vec<Coordinate>>>(),
                   vec![vec![gc(0, 0), gc(0, 1), gc(0, 2)],
                        vec![gc(1, 0), gc(1, 1), gc(1, 2)]]);
    }

    #[test]
    fn set_wall_updates_both_cells() {
        let mut m = empty_maze(3, 3);
        let a = gc(1, 1);

        for dir in &CompassPrimary::ALL {
            m.set_wall(a, *dir, true).expect("valid coordinate");
            let neighbour = m.neighbour_at_direction(a, *dir).unwrap();
            assert!(m.is_wall_closed(a, *dir));
            assert!(m.is_wall_closed(neighbour, dir.opposite()));
            assert!(!m.is_linked(a, neighbour));
            assert!(!m.is_linked(neighbour, a));
            assert!(m.walls_are_symmetric());
        }
        assert_eq!(m.links(a).unwrap().len(), 0);

        m.set_wall(gc(1, 0), CompassPrimary::South, false).expect("valid coordinate");
        assert!(!m.is_wall_closed(a, CompassPrimary::North));
        assert!(m.is_linked(a, gc(1, 0)));
        assert_eq!(&*m.links(a).unwrap(), &[gc(1, 0)]);
        assert!(m.walls_are_symmetric());
    }

    #[test]
    fn border_walls_only_touch_one_cell() {
        let mut m = empty_maze(2, 2);
        m.set_wall(gc(0, 0), CompassPrimary::West, true).expect("valid coordinate");
        assert!(m.is_wall_closed(gc(0, 0), CompassPrimary::West));
        m.set_wall(gc(1, 1), CompassPrimary::East, true).expect("valid coordinate");
        assert!(m.is_wall_closed(gc(1, 1), CompassPrimary::East));
        assert!(m.walls_are_symmetric());
    }

    #[test]
    fn set_wall_rejects_invalid_coordinates() {
        let mut m = empty_maze(2, 2);
        let err = m.set_wall(gc(5, 0), CompassPrimary::North, true).expect_err("outside the maze");
        match *err.kind() {
            ErrorKind::CoordinateOutOfBounds(5, 0) => {}
            ref other => panic!("expected out of bounds, got {:?}", other),
        }
    }

    #[test]
    fn open_grid_is_not_perfect() {
        // Every interior wall open: connected but full of loops.
        let m = empty_maze(3, 3);
        assert_eq!(m.passages_count(), 12);
        assert!(!m.is_perfect());
    }

    #[test]
    fn passage_graph_mirrors_open_walls() {
        let mut m = empty_maze(2, 2);
        m.set_wall(gc(0, 0), CompassPrimary::East, true).unwrap();
        let graph = m.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph[NodeIndex::new(3)], gc(1, 1));
        assert!(m.is_perfect());

        let passages = m.iter_passages().collect::<Vec<_>>();
        assert_eq!(passages, vec![(gc(0, 0), gc(0, 1)),
                                  (gc(1, 0), gc(1, 1)),
                                  (gc(0, 1), gc(1, 1))]);
    }

    #[test]
    fn passages_are_listed_once_east_then_south() {
        // The entrance and exit lead out of the maze and are not passages.
        let m = empty_maze(2, 2);
        let passages = m.iter_passages().collect::<Vec<_>>();
        assert_eq!(passages, vec![(gc(0, 0), gc(1, 0)),
                                  (gc(0, 0), gc(0, 1)),
                                  (gc(1, 0), gc(1, 1)),
                                  (gc(0, 1), gc(1, 1))]);
        assert_eq!(m.passages_count(), 4);

        let single = empty_maze(1, 1);
        assert_eq!(single.iter_passages().count(), 0);
    }
}
