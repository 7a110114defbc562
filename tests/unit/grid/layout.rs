//! Tests for cell partition arithmetic and clipped neighborhoods

#[cfg(test)]
mod tests {
    use preemptive_grid::GridError;
    use preemptive_grid::grid::CellLayout;
    use preemptive_grid::io::configuration::MAX_IMAGE_SIDE;

    fn layout(height: usize, width: usize, stride: usize) -> CellLayout {
        CellLayout::new(height, width, stride)
            .unwrap_or_else(|error| panic!("layout {height}x{width}/{stride}: {error}"))
    }

    // Tests cell counts round up partial cells
    // Verified by replacing div_ceil with plain division
    #[test]
    fn test_cell_dimensions_round_up() {
        let grid = layout(10, 17, 4);
        assert_eq!(grid.cell_rows(), 3);
        assert_eq!(grid.cell_cols(), 5);
        assert_eq!(grid.cell_count(), 15);

        let exact = layout(8, 8, 4);
        assert_eq!(exact.cell_rows(), 2);
        assert_eq!(exact.cell_cols(), 2);
    }

    // Tests cells tile the image with no gaps or overlaps for many shapes
    #[test]
    fn test_cells_partition_image_exactly() {
        for (height, width, stride) in [(4, 4, 2), (10, 17, 4), (1, 1, 3), (31, 7, 5), (64, 48, 16)]
        {
            let grid = layout(height, width, stride);
            let mut covered = vec![0u8; height * width];

            for cell_row in 0..grid.cell_rows() {
                for cell_col in 0..grid.cell_cols() {
                    for y in grid.pixel_rows(cell_row) {
                        for x in grid.pixel_cols(cell_col) {
                            if let Some(hits) = covered.get_mut(y * width + x) {
                                *hits += 1;
                            }
                        }
                    }
                }
            }

            assert!(
                covered.iter().all(|&hits| hits == 1),
                "{height}x{width}/{stride} is not covered exactly once"
            );
        }
    }

    // Tests last row and column of cells shrink to the remainder
    // Verified by removing the min() clamp in pixel_rows
    #[test]
    fn test_edge_cells_are_truncated() {
        let grid = layout(10, 17, 4);
        assert_eq!(grid.pixel_rows(2), 8..10);
        assert_eq!(grid.pixel_cols(4), 16..17);
        assert_eq!(grid.cell_area(2, 4), 2);
        assert_eq!(grid.cell_area(0, 0), 16);

        let exact = layout(8, 8, 4);
        assert_eq!(exact.pixel_rows(1).len(), 4);
    }

    // Tests nominal area stays S² regardless of truncation
    #[test]
    fn test_nominal_cell_area() {
        let grid = layout(5, 5, 4);
        assert_eq!(grid.nominal_cell_area(), 16);
        assert_eq!(grid.cell_area(1, 1), 1);
    }

    // Tests clipped neighborhoods hold 4, 6 and 9 cells
    // Verified by dropping saturating_sub on the lower bound
    #[test]
    fn test_neighborhood_sizes() {
        let grid = layout(20, 20, 4);
        let size = |row, col| {
            let (rows, cols) = grid.neighborhood(row, col);
            rows.len() * cols.len()
        };

        assert_eq!(size(0, 0), 4);
        assert_eq!(size(4, 4), 4);
        assert_eq!(size(0, 2), 6);
        assert_eq!(size(2, 4), 6);
        assert_eq!(size(2, 2), 9);
        assert_eq!(grid.neighborhood(0, 4), (0..2, 3..5));
    }

    // Tests a single-cell grid is its own neighborhood
    #[test]
    fn test_single_cell_neighborhood() {
        let grid = layout(3, 3, 8);
        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.neighborhood(0, 0), (0..1, 0..1));
    }

    // Tests home cell uses integer division and clamps past the image
    // Verified by removing the clamp to the last cell
    #[test]
    fn test_home_cell_clamps() {
        let grid = layout(10, 17, 4);
        assert_eq!(grid.home_cell(0, 0), (0, 0));
        assert_eq!(grid.home_cell(16, 9), (2, 4));
        assert_eq!(grid.home_cell(5, 7), (1, 1));
        assert_eq!(grid.home_cell(1000, 1000), (2, 4));
        assert_eq!(grid.home_cell(3, 500), (2, 0));
        assert!(!grid.contains_pixel(17, 0));
        assert!(grid.contains_pixel(16, 9));
    }

    // Tests flat indices are row-major
    #[test]
    fn test_cell_index_row_major() {
        let grid = layout(10, 17, 4);
        assert_eq!(grid.cell_index(0, 0), 0);
        assert_eq!(grid.cell_index(1, 0), 5);
        assert_eq!(grid.cell_index(2, 4), 14);
    }

    // Tests zero dimensions and oversized strides are rejected
    #[test]
    fn test_invalid_dimensions() {
        for (height, width, stride, parameter) in
            [(0, 4, 2, "height"), (4, 0, 2, "width"), (4, 4, 0, "stride")]
        {
            match CellLayout::new(height, width, stride) {
                Err(GridError::InvalidParameter { parameter: name, .. }) => {
                    assert_eq!(name, parameter);
                }
                other => panic!("expected {parameter} rejection, got {other:?}"),
            }
        }

        assert!(CellLayout::new(4, 4, 1 << 17).is_err());
        assert!(CellLayout::new(4, 4, 1 << 15).is_ok());
    }

    // Tests sides beyond u16 coordinate range are rejected
    // Verified by removing the side limit from CellLayout::new
    #[test]
    fn test_sides_limited_to_cluster_coordinates() {
        for (height, width, parameter) in [(16, 70_000, "width"), (MAX_IMAGE_SIDE + 1, 16, "height")] {
            match CellLayout::new(height, width, 16) {
                Err(GridError::InvalidParameter { parameter: name, .. }) => {
                    assert_eq!(name, parameter);
                }
                other => panic!("expected {parameter} rejection, got {other:?}"),
            }
        }
        assert!(CellLayout::new(16, MAX_IMAGE_SIDE, 16).is_ok());
    }
}
