use std::fmt;

use crate::cells::Coordinate;

/// Row-major iteration over every cell coordinate of a maze.
#[derive(Clone)]
pub struct CellIter {
    row_length: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(row_length: usize, cells_count: usize) -> CellIter {
        CellIter {
            row_length,
            current_cell_number: 0,
            cells_count,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Coordinate::new((self.current_cell_number % self.row_length) as u32,
                                        (self.current_cell_number / self.row_length) as u32);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatchIterType {
    Row,
    Column,
}

/// Iteration over whole rows or whole columns of a maze, each batch in ascending order.
#[derive(Debug, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    width: usize,
    height: usize,
}

impl BatchIter {
    pub(crate) fn new(iter_type: BatchIterType, width: usize, height: usize) -> BatchIter {
        BatchIter {
            iter_type,
            current_index: 0,
            width,
            height,
        }
    }

    fn batches_count(&self) -> usize {
        match self.iter_type {
            BatchIterType::Row => self.height,
            BatchIterType::Column => self.width,
        }
    }
}

impl ExactSizeIterator for BatchIter {}
impl Iterator for BatchIter {
    type Item = Vec<Coordinate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count() {
            return None;
        }

        let index = self.current_index as u32;
        let batch = match self.iter_type {
            BatchIterType::Row => {
                (0..self.width as u32).map(|x| Coordinate::new(x, index)).collect()
            }
            BatchIterType::Column => {
                (0..self.height as u32).map(|y| Coordinate::new(index, y)).collect()
            }
        };
        self.current_index += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batches_count() - self.current_index;
        (remaining, Some(remaining))
    }
}
