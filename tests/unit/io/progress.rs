//! Tests for replay progress reporting

#[cfg(test)]
mod tests {
    use preemptive_grid::analysis::statistics::IterationStats;
    use preemptive_grid::io::progress::ReplayProgress;

    fn stats(iteration: usize) -> IterationStats {
        IterationStats {
            iteration,
            changed_pixels: 0,
            updatable_cells: 0,
            active_cells: 2,
            cell_count: 4,
            active_clusters: 2,
            updatable_clusters: 0,
            cluster_count: 4,
        }
    }

    // Tests the bar follows the reported iteration
    #[test]
    fn test_position_tracks_iteration() {
        let progress = ReplayProgress::new("frames", 5);
        assert_eq!(progress.position(), 0);

        progress.update(&stats(3));
        assert_eq!(progress.position(), 3);

        progress.update(&stats(5));
        progress.finish("done".to_string());
        assert_eq!(progress.position(), 5);
    }
}
