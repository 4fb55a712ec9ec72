use std::path::Path;

use fnv::FnvHashMap;
use image::{Rgb, RgbImage};
use log::debug;

use crate::errors::*;
use crate::voxels::{BlockPlacement, BlockType, VoxelCoordinate};

const BACKGROUND: Rgb<u8> = Rgb([0x1e, 0x3a, 0x5f]);

pub fn block_colour(block: BlockType) -> Rgb<u8> {
    match block {
        BlockType::Grass => Rgb([0x4c, 0x9a, 0x2a]),
        BlockType::Dirt => Rgb([0x79, 0x55, 0x3a]),
        BlockType::Plank => Rgb([0xc8, 0xa0, 0x64]),
        BlockType::Brick => Rgb([0x96, 0x4b, 0x3c]),
        BlockType::StoneBrick => Rgb([0x7a, 0x7a, 0x7a]),
    }
}

/// Look straight down on a voxel world: each `(x, z)` column becomes a `pixels_per_block` square
/// coloured by its highest block. Columns without blocks show the background.
///
/// A `pixels_per_block` of 0 is treated as 1.
pub fn render_top_down(blocks: &[BlockPlacement], pixels_per_block: u32) -> RgbImage {
    let scale = pixels_per_block.max(1);

    let first = match blocks.first() {
        Some(b) => b.position,
        None => return RgbImage::from_pixel(scale, scale, BACKGROUND),
    };
    let (mut min_x, mut max_x, mut min_z, mut max_z) = (first.x, first.x, first.z, first.z);

    let mut tops: FnvHashMap<(i32, i32), (i32, BlockType)> =
        FnvHashMap::with_capacity_and_hasher(blocks.len(), Default::default());
    for &BlockPlacement { position: VoxelCoordinate { x, y, z }, block } in blocks {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_z = min_z.min(z);
        max_z = max_z.max(z);
        let top = tops.entry((x, z)).or_insert((y, block));
        if y > top.0 {
            *top = (y, block);
        }
    }

    let columns_wide = (max_x - min_x + 1) as u32;
    let columns_deep = (max_z - min_z + 1) as u32;
    let mut image = RgbImage::from_pixel(columns_wide * scale, columns_deep * scale, BACKGROUND);

    for (&(x, z), &(_, block)) in &tops {
        let colour = block_colour(block);
        let px = (x - min_x) as u32 * scale;
        let pz = (z - min_z) as u32 * scale;
        for dz in 0..scale {
            for dx in 0..scale {
                image.put_pixel(px + dx, pz + dz, colour);
            }
        }
    }

    debug!("rendered {} columns into a {}x{} image",
           tops.len(), image.width(), image.height());
    image
}

pub fn save_top_down_png<P: AsRef<Path>>(blocks: &[BlockPlacement],
                                         pixels_per_block: u32,
                                         path: P)
                                         -> Result<()> {
    let image = render_top_down(blocks, pixels_per_block);
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
