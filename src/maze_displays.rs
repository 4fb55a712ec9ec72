use std::fmt;

use fnv::FnvHashSet;

use crate::cells::{CompassPrimary, Coordinate, CoordinateSmallVec};
use crate::maze::Maze;
use crate::pathing::Distances;

pub trait GridDisplay {
    /// Render the contents of a maze cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Coordinate) -> String {
        String::from("   ")
    }
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if let Some(d) = self.distance_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Coordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Coordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: Coordinate) -> String {

        let contains_coordinate =
            |coordinates: &CoordinateSmallVec| coordinates.iter().any(|&c| c == coord);

        if contains_coordinate(&self.start_coordinates) {
            String::from(" S ")
        } else if contains_coordinate(&self.end_coordinates) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// Plain ASCII drawing of the walls: `+---+` for closed top walls, `|` for closed side walls.
/// The entrance and exit show up as gaps in the outer border.
impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const CORNER: &str = "+";
        const WALL_LR_3: &str = "---";
        const OPEN_3: &str = "   ";
        const WALL_UD: &str = "|";
        const OPEN_1: &str = " ";
        let default_cell_body = String::from("   ");

        let mut output = String::new();
        let side = |open_text: &'static str, wall_text: &'static str, closed: bool| {
            if closed { wall_text } else { open_text }
        };

        for row in self.iter_row() {

            // Each cell draws its own top wall; the bottom wall of the last row closes the drawing
            let mut row_top_section_render = String::new();
            let mut row_middle_section_render = String::new();

            for cell_coord in &row {
                let north_closed = self.is_wall_closed(*cell_coord, CompassPrimary::North);
                let west_closed = self.is_wall_closed(*cell_coord, CompassPrimary::West);
                row_top_section_render.push_str(CORNER);
                row_top_section_render.push_str(side(OPEN_3, WALL_LR_3, north_closed));
                row_middle_section_render.push_str(side(OPEN_1, WALL_UD, west_closed));

                // Cell Body
                if let Some(ref displayer) = *self.grid_display() {
                    row_middle_section_render.push_str(displayer.render_cell_body(*cell_coord)
                        .as_str());
                } else {
                    row_middle_section_render.push_str(default_cell_body.as_str());
                }
            }

            if let Some(last_coord) = row.last() {
                let east_closed = self.is_wall_closed(*last_coord, CompassPrimary::East);
                row_middle_section_render.push_str(side(OPEN_1, WALL_UD, east_closed));
            }
            row_top_section_render.push_str(CORNER);

            output.push_str(row_top_section_render.as_ref());
            output.push('\n');
            output.push_str(row_middle_section_render.as_ref());
            output.push('\n');
        }

        if let Some(last_row) = self.iter_row().last() {
            for cell_coord in &last_row {
                let south_closed = self.is_wall_closed(*cell_coord, CompassPrimary::South);
                output.push_str(CORNER);
                output.push_str(side(OPEN_3, WALL_LR_3, south_closed));
            }
            output.push_str(CORNER);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
