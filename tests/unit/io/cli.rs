//! Tests for argument parsing and end-to-end replay processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use preemptive_grid::GridError;
    use preemptive_grid::io::cli::{Cli, ReplayProcessor};
    use preemptive_grid::io::configuration::{
        ACTIVITY_GIF_NAME, DEFAULT_PREEMPTION_THRESHOLD, DEFAULT_STRIDE, FINAL_MASK_NAME,
    };
    use preemptive_grid::io::image::save_label_map;
    use preemptive_grid::labels::assignment::LabelView;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|error| panic!("arguments rejected: {error}"))
    }

    fn synthetic_cli(output: &Path, extra: &[&str]) -> Cli {
        let output = output.to_string_lossy().into_owned();
        let mut args = vec![
            "pregrid",
            "--synthetic",
            "-W",
            "64",
            "-H",
            "48",
            "-s",
            "8",
            "-i",
            "4",
            "--quiet",
            "-o",
            output.as_str(),
        ];
        args.extend_from_slice(extra);
        parse(&args)
    }

    // Tests defaults when only a frame directory is given
    #[test]
    fn test_defaults() {
        let cli = parse(&["pregrid", "frames"]);
        assert_eq!(cli.stride, DEFAULT_STRIDE);
        assert!((cli.threshold - DEFAULT_PREEMPTION_THRESHOLD).abs() < f32::EPSILON);
        assert!(cli.preemption_config().enabled);
        assert!(cli.should_show_progress());
        assert!(!cli.visualize);
        assert_eq!(cli.target.as_deref(), Some(Path::new("frames")));
    }

    // Tests flags map onto the preemption configuration
    #[test]
    fn test_flags() {
        let cli = parse(&["pregrid", "--synthetic", "-t", "0.2", "--no-preemption", "-q"]);
        let config = cli.preemption_config();
        assert!(!config.enabled);
        assert!((config.threshold - 0.2).abs() < f32::EPSILON);
        assert!(!cli.should_show_progress());
    }

    // Tests a source is required and sources are mutually exclusive
    // Verified by removing required_unless_present from target
    #[test]
    fn test_source_arguments() {
        assert!(Cli::try_parse_from(["pregrid"]).is_err());
        assert!(Cli::try_parse_from(["pregrid", "frames", "--synthetic"]).is_err());
    }

    // Tests a synthetic replay writes statistics and visual outputs
    #[test]
    fn test_synthetic_replay_writes_outputs() {
        let dir = tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir: {error}"));
        let output = dir.path().join("run");
        let cli = synthetic_cli(&output, &["--visualize"]);

        let summary = ReplayProcessor::new(cli)
            .process()
            .unwrap_or_else(|error| panic!("replay failed: {error}"));
        assert_eq!(summary.len(), 4);

        let csv = std::fs::read_to_string(ReplayProcessor::stats_path(&output))
            .unwrap_or_else(|error| panic!("stats missing: {error}"));
        assert_eq!(csv.lines().count(), 5);
        assert!(output.join(ACTIVITY_GIF_NAME).is_file());
        assert!(output.join(FINAL_MASK_NAME).is_file());
    }

    // Tests images are skipped without --visualize
    #[test]
    fn test_replay_without_visualization() {
        let dir = tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir: {error}"));
        let cli = synthetic_cli(dir.path(), &[]);

        ReplayProcessor::new(cli)
            .process()
            .unwrap_or_else(|error| panic!("replay failed: {error}"));
        assert!(ReplayProcessor::stats_path(dir.path()).is_file());
        assert!(!dir.path().join(ACTIVITY_GIF_NAME).exists());
    }

    // Tests a directory of PNG label maps is replayed in name order
    #[test]
    fn test_png_directory_replay() {
        let dir = tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir: {error}"));
        let frames = dir.path().join("frames");
        let base = vec![1u16; 16 * 16];
        let mut moved = base.clone();
        for label in moved.iter_mut().take(40) {
            *label = 2;
        }
        for (name, labels) in [("000.png", &base), ("001.png", &moved), ("002.png", &moved)] {
            let view = LabelView::new(labels, 16, 16, 16)
                .unwrap_or_else(|error| panic!("view rejected: {error}"));
            save_label_map(&view, &frames.join(name))
                .unwrap_or_else(|error| panic!("save failed: {error}"));
        }

        let output = dir.path().join("out");
        let frames_arg = frames.to_string_lossy().into_owned();
        let output_arg = output.to_string_lossy().into_owned();
        let cli = parse(&["pregrid", frames_arg.as_str(), "-s", "4", "-q", "-o", output_arg.as_str()]);

        let summary = ReplayProcessor::new(cli)
            .process()
            .unwrap_or_else(|error| panic!("replay failed: {error}"));
        let changed: Vec<u64> = summary
            .iterations()
            .iter()
            .map(|stats| stats.changed_pixels)
            .collect();
        assert_eq!(changed, vec![40, 0]);
    }

    // Tests invalid thresholds and missing directories are reported
    #[test]
    fn test_process_errors() {
        let dir = tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir: {error}"));
        let cli = synthetic_cli(dir.path(), &["-t", "1.5"]);
        assert!(matches!(
            ReplayProcessor::new(cli).process(),
            Err(GridError::InvalidParameter { .. })
        ));

        let missing = dir.path().join("absent").to_string_lossy().into_owned();
        let cli = parse(&["pregrid", missing.as_str(), "-q"]);
        assert!(matches!(
            ReplayProcessor::new(cli).process(),
            Err(GridError::FileSystem { .. })
        ));
    }
}
