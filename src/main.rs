//! Main CLI application for the amplitude amplification Sudoku solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use sudoku_grover::{
    config::{CliOverrides, Settings},
    error::SolverError,
    puzzle::{create_example_puzzles, load_grid_from_file},
    solve::{SolutionValidator, SudokuProblem},
    utils::{ColorOutput, SolutionFormatter},
};

#[derive(Parser)]
#[command(name = "sudoku_grover")]
#[command(about = "Amplitude Amplification Sudoku Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle by oracle compilation and amplitude amplification
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file (overrides config)
        #[arg(short, long)]
        puzzle: Option<PathBuf>,

        /// Amplification round count (overrides the optimal schedule)
        #[arg(short, long)]
        rounds: Option<usize>,

        /// State vector ceiling in bits (overrides config)
        #[arg(long)]
        max_state_bits: Option<usize>,

        /// Skip forced-cell deduction before the search
        #[arg(long)]
        no_trivial_fill: bool,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the readout distribution of the final state
        #[arg(long)]
        show_distribution: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a completed grid against its puzzle
    Validate {
        /// Puzzle file
        #[arg(short, long)]
        puzzle: PathBuf,

        /// Completed grid file
        #[arg(short, long)]
        candidate: PathBuf,

        /// Show both grids with coordinates
        #[arg(long)]
        show_grids: bool,
    },

    /// Analyze a puzzle's search dimensions without solving it
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Puzzle file
        #[arg(short, long)]
        puzzle: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config, puzzle, rounds, max_state_bits,
            no_trivial_fill, output, show_distribution, verbose,
        } => {
            solve_command(
                config, puzzle, rounds, max_state_bits,
                no_trivial_fill, output, show_distribution, verbose,
            )
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
        Commands::Validate { puzzle, candidate, show_grids } => {
            validate_command(puzzle, candidate, show_grids)
        }
        Commands::Analyze { config, puzzle } => {
            analyze_command(config, puzzle)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn solve_command(
    config_path: PathBuf,
    puzzle_file: Option<PathBuf>,
    rounds: Option<usize>,
    max_state_bits: Option<usize>,
    no_trivial_fill: bool,
    output_dir: Option<PathBuf>,
    show_distribution: bool,
    verbose: bool,
) -> Result<()> {
    println!("{}", ColorOutput::info("🔄 Starting Amplitude Amplification Sudoku Solver"));

    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!("{}", ColorOutput::warning(&format!(
            "Config file {} not found, using defaults", config_path.display()
        )));
        Settings::default()
    };

    // Apply CLI overrides
    let cli_overrides = CliOverrides {
        puzzle_file: puzzle_file.clone(),
        rounds,
        max_state_bits,
        trivial_fill: if no_trivial_fill { Some(false) } else { None },
        output_dir: output_dir.clone(),
    };
    settings.merge_with_cli(&cli_overrides);

    if verbose {
        println!("Configuration:");
        println!("  Puzzle file: {}", settings.input.puzzle_file.display());
        println!("  State vector ceiling: {} bits", settings.solver.max_state_bits);
        match settings.solver.rounds {
            Some(rounds) => println!("  Rounds: {} (fixed)", rounds),
            None => println!("  Rounds: optimal"),
        }
        println!("  Trivial fill: {}", settings.preprocessing.trivial_fill);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    // Validate settings
    settings.validate()
        .context("Configuration validation failed")?;

    // Create and solve the problem
    let start_time = Instant::now();
    let problem = SudokuProblem::new(settings.clone())
        .context("Failed to create Sudoku problem")?;

    if verbose {
        let analysis = problem.analyze()?;
        println!("{}", analysis);
    }

    println!("{}", ColorOutput::info("🧮 Compiling the oracle and amplifying..."));
    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(error) => {
            if is_internal_fault(&error) {
                println!("{}", ColorOutput::error(
                    "❌ Internal solver fault; the puzzle input is not the cause"
                ));
            }
            return Err(error.context("Failed to solve the puzzle"));
        }
    };

    let total_time = start_time.elapsed();

    println!("{}", ColorOutput::success(&format!(
        "✅ Solved with readout probability {:.4} in {:.3}s",
        solution.probability,
        total_time.as_secs_f64()
    )));

    println!("\n{}", SolutionFormatter::format_solution(&solution, show_distribution));

    // Save the solution
    println!("{}", ColorOutput::info("💾 Saving solution..."));
    SolutionFormatter::save_solution(&solution, &settings.output.output_directory, &settings.output.format)
        .context("Failed to save solution")?;

    if settings.output.save_distribution && !solution.distribution.is_empty() {
        let path = settings
            .output
            .output_directory
            .join(format!("{}_distribution.txt", solution.metadata.id));
        std::fs::write(&path, SolutionFormatter::format_distribution(&solution.distribution))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("{}", ColorOutput::success(&format!(
        "Solution saved to {}",
        settings.output.output_directory.display()
    )));

    if verbose {
        println!("\n{}", solution.summary());
    }

    Ok(())
}

/// True when the error chain carries a compiler or simulator fault rather
/// than a problem with the puzzle or its configuration.
fn is_internal_fault(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<SolverError>())
        .any(SolverError::is_internal)
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    // Create directories
    let config_dir = directory.join("config");
    let input_dir = directory.join("input/puzzles");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let default_settings = Settings::default();
        default_settings.to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // Create example puzzles
    create_example_puzzles(&input_dir)
        .context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", input_dir.display());

    // Create example configuration variants
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    // Quick run against the easy puzzle
    let mut quick_config = Settings::default();
    quick_config.input.puzzle_file = PathBuf::from("input/puzzles/easy.txt");
    quick_config.solver.distribution_size = 4;
    quick_config.to_file(&examples_dir.join("quick.yaml"))?;

    // Search-only run with deduction disabled
    let mut search_config = Settings::default();
    search_config.input.puzzle_file = PathBuf::from("input/puzzles/moderate.txt");
    search_config.preprocessing.trivial_fill = false;
    search_config.output.save_distribution = true;
    search_config.to_file(&examples_dir.join("search_only.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your puzzles to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn validate_command(puzzle_path: PathBuf, candidate_path: PathBuf, show_grids: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Validating completed grid..."));

    let puzzle = load_grid_from_file(&puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;

    let candidate = load_grid_from_file(&candidate_path)
        .with_context(|| format!("Failed to load candidate from {}", candidate_path.display()))?;

    let validator = SolutionValidator::new();
    let result = validator.validate(&puzzle, &candidate)
        .context("Validation failed")?;

    println!("{}", result);

    if show_grids {
        println!("Puzzle:");
        println!("{}", SolutionFormatter::format_grid_with_coords(&puzzle));
        println!("Candidate:");
        println!("{}", SolutionFormatter::format_grid_with_coords(&candidate));
    }

    if result.is_valid {
        println!("{}", ColorOutput::success("✅ Completion is valid!"));
    } else {
        println!("{}", ColorOutput::error("❌ Completion is invalid"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, puzzle_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Analyzing puzzle..."));

    // Load configuration
    let settings = if config_path.exists() {
        Settings::from_file(&config_path)?
    } else {
        Settings::default()
    };

    // Load the puzzle grid
    let puzzle = load_grid_from_file(&puzzle_path)
        .with_context(|| format!("Failed to load puzzle from {}", puzzle_path.display()))?;

    println!("Puzzle Grid ({}x{}):", puzzle.size, puzzle.size);
    println!("{}", SolutionFormatter::format_grid_with_coords(&puzzle));

    println!("Grid Statistics:");
    println!("  Given cells: {}", puzzle.filled_count());
    println!("  Empty cells: {}", puzzle.empty_count());

    // Create problem for analysis
    let problem = SudokuProblem::with_puzzle(settings, puzzle)
        .context("Failed to create problem for analysis")?;

    let analysis = problem.analyze()?;
    println!("\n{}", analysis);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        // Test that CLI parsing works
        let cli = Cli::try_parse_from([
            "sudoku_grover",
            "solve",
            "--config", "test.yaml",
            "--rounds", "5",
        ]);

        assert!(cli.is_ok());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        let result = setup_command(temp_dir.path().to_path_buf(), false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("config/default.yaml").exists());
        assert!(temp_dir.path().join("input/puzzles/easy.txt").exists());
        assert!(temp_dir.path().join("config/examples/quick.yaml").exists());
    }

    #[test]
    fn test_internal_fault_detection() {
        let internal = anyhow::Error::new(SolverError::ScratchInUse {
            register: "comparison".to_string(),
        })
        .context("Oracle compilation failed");
        assert!(is_internal_fault(&internal));

        let user = anyhow::Error::new(SolverError::Resource {
            bits: 30,
            max_bits: 24,
        })
        .context("State-vector simulation failed");
        assert!(!is_internal_fault(&user));

        assert!(!is_internal_fault(&anyhow::anyhow!("config missing")));
    }
}
