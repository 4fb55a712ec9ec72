// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
use error_chain::error_chain;

error_chain! {

    errors {
        InvalidDimensions(width: i64, height: i64) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}: width and height must both be at least 1",
                    width, height)
        }

        CoordinateOutOfBounds(x: u32, y: u32) {
            description("coordinate outside of the maze")
            display("coordinate ({}, {}) is outside of the maze", x, y)
        }

        InvalidParameters(reason: String) {
            description("invalid voxel synthesis parameters")
            display("invalid voxel synthesis parameters: {}", reason)
        }

        // Emitting past the precomputed bound means the bound calculation and the
        // emission loops disagree about the geometry.
        BlockBudgetExceeded(maximum: usize) {
            description("voxel synthesis emitted more blocks than its precomputed bound")
            display("voxel synthesis emitted more than the precomputed maximum of {} blocks",
                    maximum)
        }

        ExitUnreachable(x: u32, y: u32) {
            description("the maze exit cannot be reached from the entrance")
            display("no path from the entrance to the exit at ({}, {})", x, y)
        }

        WorldTooLarge(reason: String) {
            description("voxel world does not fit the world coordinate or block limits")
            display("voxel world too large: {}", reason)
        }

        BlockCountMismatch(emitted: usize, minimum: usize, maximum: usize) {
            description("voxel synthesis emitted a block count outside its precomputed bounds")
            display("voxel synthesis emitted {} blocks, expected between {} and {}",
                    emitted, minimum, maximum)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        ImageError(::image::ImageError);
    }
}
