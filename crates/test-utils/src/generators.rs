//! Cell buffer generators for building grids in tests.
//!
//! Every generator returns a `Vec<Option<f64>>` in flat grid order: I varies
//! fastest, then J, then K. Feed the result to `Grid::from_cells` together
//! with a structure of the same shape.

/// Cells numbered `1, 2, 3, ...` in flat order.
///
/// # Example
///
/// ```
/// use test_utils::sequential_cells;
///
/// let cells = sequential_cells(3, 3, 1);
/// assert_eq!(cells.len(), 9);
/// assert_eq!(cells[4], Some(5.0)); // (1, 1) of a 3x3 grid
/// ```
pub fn sequential_cells(i_count: usize, j_count: usize, k_count: usize) -> Vec<Option<f64>> {
    (1..=i_count * j_count * k_count)
        .map(|v| Some(v as f64))
        .collect()
}

/// Cells whose value encodes their index: `i * 10000 + j * 100 + k`.
///
/// Makes it easy to tell where a value came from after a region extraction
/// or a resample.
pub fn coded_cells(i_count: usize, j_count: usize, k_count: usize) -> Vec<Option<f64>> {
    let mut cells = Vec::with_capacity(i_count * j_count * k_count);
    for k in 0..k_count {
        for j in 0..j_count {
            for i in 0..i_count {
                cells.push(Some((i * 10000 + j * 100 + k) as f64));
            }
        }
    }
    cells
}

/// A constant 2D field.
pub fn constant_cells(i_count: usize, j_count: usize, value: f64) -> Vec<Option<f64>> {
    vec![Some(value); i_count * j_count]
}

/// A smooth porosity-like 2D field in roughly `[0.05, 0.35]`.
pub fn porosity_field(i_count: usize, j_count: usize) -> Vec<Option<f64>> {
    let mut cells = Vec::with_capacity(i_count * j_count);
    for j in 0..j_count {
        for i in 0..i_count {
            let x = i as f64 / i_count.max(1) as f64;
            let y = j as f64 / j_count.max(1) as f64;
            let wave = (x * std::f64::consts::PI * 3.0).sin() * (y * std::f64::consts::PI * 2.0).cos();
            cells.push(Some(0.2 + 0.15 * wave));
        }
    }
    cells
}

/// A 2D facies-like field of integer codes `0..codes`, deterministic for a
/// given seed.
pub fn facies_field(i_count: usize, j_count: usize, codes: u32, seed: u32) -> Vec<Option<f64>> {
    let mut cells = Vec::with_capacity(i_count * j_count);
    for j in 0..j_count {
        for i in 0..i_count {
            let code = simple_hash(i as u32, j as u32, seed) % codes.max(1);
            cells.push(Some(f64::from(code)));
        }
    }
    cells
}

/// Empty every cell whose flat offset is a multiple of `every`.
///
/// Returns the number of cells emptied.
pub fn punch_holes(cells: &mut [Option<f64>], every: usize) -> usize {
    let mut emptied = 0;
    for (offset, cell) in cells.iter_mut().enumerate() {
        if every > 0 && offset % every == 0 && cell.is_some() {
            *cell = None;
            emptied += 1;
        }
    }
    emptied
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_cells() {
        let cells = sequential_cells(2, 2, 2);
        assert_eq!(cells.first(), Some(&Some(1.0)));
        assert_eq!(cells.last(), Some(&Some(8.0)));
    }

    #[test]
    fn test_coded_cells_flat_order() {
        let cells = coded_cells(3, 2, 2);
        assert_eq!(cells[1], Some(10000.0));
        assert_eq!(cells[3], Some(100.0));
        assert_eq!(cells[6], Some(1.0));
    }

    #[test]
    fn test_porosity_field_range() {
        let cells = porosity_field(20, 10);
        assert!(cells
            .iter()
            .flatten()
            .all(|&v| (0.05 - 1e-9..=0.35 + 1e-9).contains(&v)));
    }

    #[test]
    fn test_facies_field_deterministic() {
        let a = facies_field(8, 8, 3, 7);
        assert_eq!(a, facies_field(8, 8, 3, 7));
        assert!(a.iter().flatten().all(|&v| v == 0.0 || v == 1.0 || v == 2.0));
    }

    #[test]
    fn test_punch_holes() {
        let mut cells = constant_cells(3, 3, 1.0);
        assert_eq!(punch_holes(&mut cells, 4), 3);
        assert_eq!(cells.iter().filter(|c| c.is_none()).count(), 3);
        assert_eq!(punch_holes(&mut cells, 0), 0);
    }
}
