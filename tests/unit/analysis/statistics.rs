//! Tests for iteration statistics and run summaries

#[cfg(test)]
mod tests {
    use preemptive_grid::analysis::statistics::{IterationStats, RunSummary};
    use preemptive_grid::grid::{CellLayout, Cluster, PreemptionGrid};

    fn stats(iteration: usize, changed_pixels: u64, active_cells: usize) -> IterationStats {
        IterationStats {
            iteration,
            changed_pixels,
            updatable_cells: active_cells / 2,
            active_cells,
            cell_count: 16,
            active_clusters: active_cells,
            updatable_clusters: active_cells / 2,
            cluster_count: 16,
        }
    }

    // Tests collect reads both masks and gates every cluster
    #[test]
    fn test_collect_from_grid() {
        let mut grid = PreemptionGrid::new(28, 28, 4)
            .unwrap_or_else(|error| panic!("grid rejected: {error}"));
        grid.initialize(true, 0.1);
        let old = vec![0u16; 28 * 28];
        let mut new = old.clone();
        for y in 12..16 {
            for x in 12..16 {
                if let Some(label) = new.get_mut(y * 28 + x) {
                    *label = 1;
                }
            }
        }
        grid.record_old_assignment(&old, 28)
            .unwrap_or_else(|error| panic!("{error}"));
        grid.record_new_assignment(&new, 28)
            .unwrap_or_else(|error| panic!("{error}"));

        let layout: CellLayout = *grid.layout();
        let clusters = Cluster::seed_grid(&layout);
        let stats = IterationStats::collect(3, &grid, &clusters);

        assert_eq!(stats.iteration, 3);
        assert_eq!(stats.changed_pixels, 16);
        assert_eq!(stats.cell_count, 49);
        assert_eq!(stats.updatable_cells, 9);
        assert_eq!(stats.active_cells, 25);
        assert_eq!(stats.active_clusters, 25);
        assert_eq!(stats.updatable_clusters, 9);
        assert_eq!(stats.cluster_count, 49);
        assert_eq!(stats.skipped_cells(), 24);
    }

    // Tests fractions and skipped counts
    #[test]
    fn test_fractions() {
        let half = stats(1, 10, 8);
        assert!((half.active_fraction() - 0.5).abs() < f64::EPSILON);
        assert_eq!(half.skipped_cells(), 8);

        let empty = IterationStats {
            cell_count: 0,
            ..stats(1, 0, 0)
        };
        assert!(empty.active_fraction().abs() < f64::EPSILON);
    }

    // Tests summaries aggregate iterations and find the first quiet one
    // Verified by returning the last quiet iteration instead of the first
    #[test]
    fn test_summary_aggregates() {
        let mut summary = RunSummary::default();
        assert!(summary.is_empty());
        assert!(summary.mean_active_fraction().abs() < f64::EPSILON);

        summary.record(stats(1, 100, 16));
        summary.record(stats(2, 20, 8));
        summary.record(stats(3, 0, 0));
        summary.record(stats(4, 0, 0));

        assert_eq!(summary.len(), 4);
        assert!((summary.mean_active_fraction() - 0.375).abs() < 1e-12);
        assert_eq!(summary.skipped_cell_iterations(), 8 + 16 + 16);
        assert_eq!(summary.first_quiet_iteration(), Some(3));
        assert_eq!(summary.iterations().last().map(|s| s.iteration), Some(4));
    }

    // Tests CSV output has a header and one line per iteration
    #[test]
    fn test_csv() {
        let mut summary = RunSummary::default();
        summary.record(stats(1, 42, 4));
        let csv = summary.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines.first().is_some_and(|line| line.starts_with("iteration,changed_pixels")));
        assert_eq!(lines.get(1), Some(&"1,42,2,4,16,4,2,16"));
    }

    // Tests display strings mention the key figures
    #[test]
    fn test_display() {
        let text = stats(2, 7, 4).to_string();
        assert!(text.contains("iteration 2"));
        assert!(text.contains("7 changed pixels"));
        assert!(text.contains("4/16 cells active (25.0%)"));

        let mut summary = RunSummary::default();
        summary.record(stats(1, 0, 0));
        assert!(summary.to_string().contains("quiet from iteration 1"));
    }
}
