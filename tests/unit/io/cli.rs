//! Tests for command-line parsing, retries and output files

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use clap::Parser;
    use tempfile::TempDir;
    use tilewave::algorithm::socket::Socket;
    use tilewave::io::cli::{Cli, Generator, parse_coordinate};
    use tilewave::io::configuration::{DEFAULT_ATTEMPTS, DEFAULT_GRID_SIZE, DEFAULT_SEED};
    use tilewave::io::visualization::VisualizationCapture;
    use tilewave::spatial::tiles::{TileCatalog, TileDefinition};
    use tilewave::{CellState, GenerationError, RunStatus};

    const RULES: &str = "
version: 1
sockets:
  - { id: a, type: symmetric }
  - { id: b, type: symmetric }
tiles:
  - id: grass
    sockets: { left: [a], up: [a], down: [a], right: [a] }
  - id: path
    sockets: { left: [a, b], up: [b, a], down: [a], right: [a] }
    allowed_rotations: [none, clockwise]
";

    fn create_test_cli(args: &[&str]) -> Cli {
        let mut full = vec!["tilewave"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    fn write_rules(dir: &Path) -> PathBuf {
        let path = dir.join("meadow.yaml");
        fs::write(&path, RULES).unwrap();
        path
    }

    fn hostile_catalog() -> TileCatalog {
        TileCatalog::build(vec![
            TileDefinition::uniform("spike", [Socket::asymmetric("s")]),
            TileDefinition::uniform("thorn", [Socket::asymmetric("t")]),
        ])
        .unwrap()
    }

    // Tests CLI parsing with only the required rule file
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = create_test_cli(&["rules.yaml"]);

        assert_eq!(cli.rules, PathBuf::from("rules.yaml"));
        assert_eq!(cli.size, DEFAULT_GRID_SIZE);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.attempts, DEFAULT_ATTEMPTS);
        assert!(cli.start.is_empty());
        assert!(cli.graphics.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.visualize);
        assert!(cli.should_show_progress());
    }

    // Tests CLI parsing with all available arguments
    // Verified by modifying custom parsers to ensure they're invoked
    #[test]
    fn test_cli_parse_all_args() {
        let cli = create_test_cli(&[
            "rules.yaml",
            "--graphics",
            "graphics.yaml",
            "--size",
            "12",
            "--seed",
            "7",
            "--attempts",
            "3",
            "--start",
            "1,2",
            "--start",
            "4, 5",
            "--output",
            "out/grid.png",
            "--visualize",
            "--quiet",
            "--tile-pixels",
            "16",
        ]);

        assert_eq!(cli.graphics, Some(PathBuf::from("graphics.yaml")));
        assert_eq!(cli.size, 12);
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.attempts, 3);
        assert_eq!(cli.start, vec![[1, 2], [4, 5]]);
        assert_eq!(cli.output, Some(PathBuf::from("out/grid.png")));
        assert!(cli.visualize);
        assert!(!cli.should_show_progress());
        assert_eq!(cli.tile_pixels, 16);
    }

    // Tests short flag parsing
    // Verified by changing short flag definitions
    #[test]
    fn test_cli_short_flags() {
        let cli = create_test_cli(&["r.yaml", "-n", "3", "-s", "99", "-a", "2", "-q", "-p", "8"]);
        assert_eq!(cli.size, 3);
        assert_eq!(cli.seed, 99);
        assert_eq!(cli.attempts, 2);
        assert!(cli.quiet);
        assert_eq!(cli.tile_pixels, 8);
    }

    // Tests coordinate parsing
    // Verified by accepting a single number as a coordinate
    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("3,4"), Ok([3, 4]));
        assert_eq!(parse_coordinate(" 0 , 7 "), Ok([0, 7]));
        assert!(parse_coordinate("3").is_err());
        assert!(parse_coordinate("-1,2").is_err());
        assert!(parse_coordinate("a,b").is_err());
        assert!(Cli::try_parse_from(["tilewave", "r.yaml", "--start", "x"]).is_err());
    }

    // Tests retries advance the seed by one per attempt
    // Verified by reusing the base seed for every attempt
    #[test]
    fn test_seed_for_attempt() {
        let cli = create_test_cli(&["r.yaml", "--seed", "100"]);
        assert_eq!(cli.seed_for_attempt(1), 100);
        assert_eq!(cli.seed_for_attempt(3), 102);

        let wrapping = create_test_cli(&["r.yaml", "--seed", &u64::MAX.to_string()]);
        assert_eq!(wrapping.seed_for_attempt(2), 0);
    }

    // Tests the animation path is derived from the output or rule file
    // Verified by ignoring the output path
    #[test]
    fn test_visualization_path() {
        let plain = Generator::new(create_test_cli(&["maps/coast.yaml"]));
        assert_eq!(plain.visualization_path(), None);

        let from_rules = Generator::new(create_test_cli(&["maps/coast.yaml", "-v"]));
        assert_eq!(
            from_rules.visualization_path(),
            Some(PathBuf::from("maps/coast_steps.gif"))
        );

        let from_output = Generator::new(create_test_cli(&["coast.yaml", "-v", "-o", "out/map.png"]));
        assert_eq!(
            from_output.visualization_path(),
            Some(PathBuf::from("out/map_steps.gif"))
        );
    }

    // Tests a compatible rule set resolves on the first attempt
    // Verified by always retrying
    #[test]
    fn test_generate_first_attempt() {
        let generator = Generator::new(create_test_cli(&["r.yaml", "-n", "4", "-q", "-a", "5"]));
        let catalog = TileCatalog::build(vec![TileDefinition::uniform(
            "grass",
            [Socket::symmetric("a")],
        )
        .rotatable()])
        .unwrap();

        let outcome = generator.generate(&catalog, None).unwrap();

        assert_eq!(outcome.status, RunStatus::FullyResolved);
        assert_eq!(outcome.attempts_used, 1);
        assert_eq!(outcome.seed, DEFAULT_SEED);
        assert!(outcome.snapshot.is_fully_resolved());
    }

    // Tests the last attempt is accepted even with contradictions
    // Verified by returning an error when attempts run out
    #[test]
    fn test_generate_exhausts_attempts() {
        let generator = Generator::new(create_test_cli(&[
            "r.yaml", "-n", "3", "-q", "-a", "3", "-s", "10",
        ]));

        let outcome = generator.generate(&hostile_catalog(), None).unwrap();

        assert_eq!(outcome.status, RunStatus::ContainsContradiction);
        assert_eq!(outcome.attempts_used, 3);
        assert_eq!(outcome.seed, 12);
        assert!(!outcome.snapshot.invalid_cells().is_empty());
    }

    // Tests zero attempts and bad start cells are rejected
    // Verified by silently skipping out-of-range start cells
    #[test]
    fn test_generate_rejects_bad_arguments() {
        let catalog = hostile_catalog();

        let no_attempts = Generator::new(create_test_cli(&["r.yaml", "-q", "-a", "0"]));
        assert!(matches!(
            no_attempts.generate(&catalog, None),
            Err(GenerationError::InvalidParameter {
                parameter: "attempts",
                ..
            })
        ));

        let outside = Generator::new(create_test_cli(&["r.yaml", "-q", "-n", "2", "--start", "2,0"]));
        assert!(matches!(
            outside.generate(&catalog, None),
            Err(GenerationError::InvalidCoordinate { .. })
        ));
    }

    // Tests grid sizes are range-checked before any cell count is derived
    // Verified by sizing the progress bar before validating the size
    #[test]
    fn test_generate_rejects_oversized_grids() {
        let catalog = hostile_catalog();

        for size in ["0", "1025", "4294967296"] {
            let generator = Generator::new(create_test_cli(&["r.yaml", "-q", "-n", size]));
            let mut capture = VisualizationCapture::new(1);
            assert!(matches!(
                generator.generate(&catalog, Some(&mut capture)),
                Err(GenerationError::InvalidParameter {
                    parameter: "size",
                    ..
                })
            ));
            assert_eq!(capture.frame_count(), 0);
        }
    }

    // Tests output arguments are range-checked before the rules are read
    // Verified by validating the cell size only when building the atlas
    #[test]
    fn test_run_rejects_unrenderable_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("huge.png");
        let output = output.to_str().unwrap();

        let oversized = Generator::new(create_test_cli(&[
            "does/not/exist.yaml",
            "-q",
            "-n",
            "100000",
            "-v",
        ]));
        assert!(matches!(
            oversized.run(),
            Err(GenerationError::InvalidParameter {
                parameter: "size",
                ..
            })
        ));

        for (size, pixels) in [("4", "8388608"), ("4", "0"), ("1024", "512")] {
            let generator = Generator::new(create_test_cli(&[
                "does/not/exist.yaml",
                "-q",
                "-n",
                size,
                "-p",
                pixels,
                "-o",
                output,
            ]));
            assert!(matches!(
                generator.run(),
                Err(GenerationError::InvalidParameter {
                    parameter: "tile_pixels",
                    ..
                })
            ));
        }
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);

        let text_only = Generator::new(create_test_cli(&[
            "does/not/exist.yaml",
            "-q",
            "-p",
            "8388608",
        ]));
        assert!(
            matches!(text_only.run(), Err(GenerationError::FileSystem { .. })),
            "cell size only matters when rendering"
        );
    }

    // Tests start cells are collapsed before automatic selection
    // Verified by applying start cells after the main loop
    #[test]
    fn test_generate_records_start_cells() {
        let generator = Generator::new(create_test_cli(&[
            "r.yaml", "-q", "-n", "2", "--start", "1,1",
        ]));
        let mut capture = VisualizationCapture::new(4);

        let outcome = generator
            .generate(&hostile_catalog(), Some(&mut capture))
            .unwrap();

        assert_eq!(outcome.snapshot.invalid_cells(), vec![[0, 1], [1, 0]]);
        assert!(matches!(
            outcome.snapshot.get([1, 1]),
            Some(CellState::Collapsed { .. })
        ));
        assert_eq!(capture.frame_count(), 3, "initial, start cell and one step");
    }

    // Tests a full run writes the PNG and the step animation
    // Verified by skipping the GIF export
    #[test]
    fn test_run_writes_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let rules = write_rules(temp_dir.path());
        let output = temp_dir.path().join("out").join("meadow.png");

        let generator = Generator::new(create_test_cli(&[
            rules.to_str().unwrap(),
            "-q",
            "-n",
            "5",
            "-p",
            "4",
            "-v",
            "-o",
            output.to_str().unwrap(),
        ]));
        let outcome = generator.run().unwrap();

        assert_eq!(outcome.snapshot.size(), 5);
        let png = image::open(&output).unwrap();
        assert_eq!((png.width(), png.height()), (20, 20));
        assert!(temp_dir.path().join("out").join("meadow_steps.gif").exists());
    }

    // Tests a run without outputs only generates
    // Verified by requiring an output path
    #[test]
    fn test_run_without_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let rules = write_rules(temp_dir.path());

        let generator = Generator::new(create_test_cli(&[rules.to_str().unwrap(), "-q", "-n", "3"]));
        let outcome = generator.run().unwrap();

        assert_eq!(outcome.status, RunStatus::FullyResolved);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    // Tests error handling for missing rule files
    // Verified by removing the error return for unreadable files
    #[test]
    fn test_run_missing_rules() {
        let generator = Generator::new(create_test_cli(&["does/not/exist.yaml", "-q"]));
        assert!(matches!(
            generator.run(),
            Err(GenerationError::FileSystem { .. })
        ));
    }
}
