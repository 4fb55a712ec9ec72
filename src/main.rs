use docopt::Docopt;
use error_chain::bail;
use log::info;
use maze_voxels::{
    cells::Coordinate,
    maze::Maze,
    maze_displays::{GridDisplay, PathDisplay},
    navigation::MazeSession,
    randomness,
    renderers,
    units::{Height, Width},
    voxels::SynthesisParamsBuilder,
};
use rand::Rng;
use serde::Deserialize;
use std::{
    convert::TryFrom,
    fs::File,
    io,
    io::prelude::*,
    io::BufWriter,
    rc::Rc,
};

const USAGE: &str = "Maze Voxels

Usage:
    maze_voxels_driver -h | --help
    maze_voxels_driver prompt [options]
    maze_voxels_driver [options]

Options:
    -h --help               Show this screen.
    --width=<w>             Maze width in cells [default: 8].
    --height=<h>            Maze height in cells [default: 8].
    --seed=<n>              Seed for the random number generator. A random seed is chosen and logged if not given.
    --show-path             Mark the path from the entrance to the exit in the text rendering.
    --text-out=<path>       Output file path for the text rendering of the maze. Printed to stdout if not given.
    --blocks-out=<path>     Output file path for the voxel block placements as JSON.
    --path-out=<path>       Output file path for the entrance to exit path as JSON.
    --image-out=<path>      Output file path for a top down image of the voxel world. Always PNG format.
    --block-pixels=<n>      Pixel length of one block column in the top down image [default: 4].
    --save-edges=<path>     Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --wall-height=<n>       Blocks in an uneroded wall [default: 5].
    --island-padding=<n>    Island margin around the maze in blocks [default: 6].
    --erosion-depth=<n>     Most blocks erosion may remove from a wall or island column [default: 2].

The prompt command reads the width and height as 'W H' from stdin instead.
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_prompt: bool,
    flag_width: i64,
    flag_height: i64,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_text_out: String,
    flag_blocks_out: String,
    flag_path_out: String,
    flag_image_out: String,
    flag_block_pixels: u32,
    flag_save_edges: String,
    flag_wall_height: u32,
    flag_island_padding: u32,
    flag_erosion_depth: u32,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::maze_voxels::errors::Error, ::maze_voxels::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            JsonFailure(::serde_json::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: DriverArgs = match Docopt::new(USAGE).and_then(|d| d.deserialize()) {
        Ok(args) => args,
        Err(e) if e.fatal() => return Err(e.into()),
        Err(e) => e.exit(),
    };

    let (width, height) = if args.cmd_prompt {
        prompt_dimensions()?
    } else {
        validate_dimensions(args.flag_width, args.flag_height)?
    };

    let params = SynthesisParamsBuilder::new().wall_height(args.flag_wall_height)
                                              .island_padding(args.flag_island_padding)
                                              .erosion_depth(args.flag_erosion_depth)
                                              .build()?;

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("maze seed {}", seed);
    let mut rng = randomness::seeded_rng(seed);

    let mut session = MazeSession::new();
    session.regenerate(width, height, &params, &mut rng)?;

    if !args.flag_save_edges.is_empty() {
        if let Some(maze) = session.maze() {
            save_maze_graph(maze, &args.flag_save_edges)?;
        }
    }

    if !args.flag_path_out.is_empty() {
        write_json(session.path(), &args.flag_path_out)
            .chain_err(|| format!("Failed to write path to {}", args.flag_path_out))?;
    }

    if !args.flag_blocks_out.is_empty() {
        write_json(session.blocks(), &args.flag_blocks_out)
            .chain_err(|| format!("Failed to write blocks to {}", args.flag_blocks_out))?;
    }

    if !args.flag_image_out.is_empty() {
        renderers::save_top_down_png(session.blocks(), args.flag_block_pixels, &args.flag_image_out)
            .chain_err(|| format!("Failed to write image to {}", args.flag_image_out))?;
    }

    let path_display = if args.flag_show_path {
        Some(Rc::new(PathDisplay::new(session.path())) as Rc<dyn GridDisplay>)
    } else {
        None
    };
    if let Some(maze) = session.maze_mut() {
        maze.set_grid_display(path_display);
        if args.flag_text_out.is_empty() {
            println!("{}", maze);
        } else {
            write_text_to_file(&format!("{}", maze), &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    Ok(())
}

/// Read "W H" from stdin.
fn prompt_dimensions() -> Result<(Width, Height)> {
    print!("Maze width and height: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    parse_dimensions(&line)
}

/// Two whitespace separated whole numbers, both at least 1.
fn parse_dimensions(line: &str) -> Result<(Width, Height)> {
    let numbers = line.split_whitespace()
                      .map(|word| word.parse::<i64>())
                      .collect::<::std::result::Result<Vec<_>, _>>()
                      .chain_err(|| format!("Expected two whole numbers 'W H', got '{}'", line.trim()))?;
    match numbers.as_slice() {
        [w, h] => validate_dimensions(*w, *h),
        _ => bail!("Expected two whole numbers 'W H', got '{}'", line.trim()),
    }
}

fn validate_dimensions(width: i64, height: i64) -> Result<(Width, Height)> {
    match (usize::try_from(width), usize::try_from(height)) {
        (Ok(w), Ok(h)) if w >= 1 && h >= 1 => Ok((Width(w), Height(h))),
        _ => {
            let err: maze_voxels::errors::Error =
                maze_voxels::errors::ErrorKind::InvalidDimensions(width, height).into();
            Err(err.into())
        }
    }
}

fn write_json<T: serde::Serialize + ?Sized>(data: &T, file_name: &str) -> Result<()> {
    let writer = BufWriter::new(File::create(file_name)?);
    serde_json::to_writer(writer, data)?;
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze: &Maze, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", maze.size(), maze.passages_count()));

    let index_of = |coord: Coordinate| {
        maze.coordinate_to_index(coord)
            .ok_or_else(|| {
                maze_voxels::errors::Error::from(
                    maze_voxels::errors::ErrorKind::CoordinateOutOfBounds(coord.x, coord.y))
            })
    };
    for (src, dst) in maze.iter_passages() {
        let src_as_1_based_index = index_of(src)? + 1;
        let dst_as_1_based_index = index_of(dst)? + 1;
        graph_data.push_str(&format!("{} {}\n", src_as_1_based_index, dst_as_1_based_index));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;

    fn is_invalid_dimensions(err: &Error, width: i64, height: i64) -> bool {
        match *err.kind() {
            ErrorKind::Maze(maze_voxels::errors::ErrorKind::InvalidDimensions(w, h)) => {
                w == width && h == height
            }
            _ => false,
        }
    }

    #[test]
    fn dimensions_from_text() {
        let (w, h) = parse_dimensions("8 5\n").unwrap();
        assert_eq!((w, h), (Width(8), Height(5)));
        let (w, h) = parse_dimensions("  1\t12  ").unwrap();
        assert_eq!((w, h), (Width(1), Height(12)));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        for &(line, w, h) in &[("0 4", 0, 4), ("3 0", 3, 0), ("-2 3", -2, 3), ("-1 -1", -1, -1)] {
            let err = parse_dimensions(line).expect_err("non positive dimensions");
            assert!(is_invalid_dimensions(&err, w, h), "unexpected error {:?}", err.kind());
        }
        let err = validate_dimensions(0, 8).expect_err("zero width flag");
        assert!(is_invalid_dimensions(&err, 0, 8));
    }

    #[test]
    fn malformed_dimensions_are_rejected() {
        for line in &["", "\n", "7", "7 8 9", "a b", "3 x", "2.5 4"] {
            assert!(parse_dimensions(line).is_err(), "accepted {:?}", line);
        }
    }
}
