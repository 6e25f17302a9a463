//! Configuration settings for the amplitude amplification Sudoku solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub solver: SolverConfig,
    pub preprocessing: PreprocessingConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Largest state vector the simulator may allocate, in variable bits.
    pub max_state_bits: usize,
    /// Fixed amplification round count; `None` selects the optimal count
    /// for the puzzle's search space.
    pub rounds: Option<usize>,
    /// How many of the most probable states the solution artifact records.
    pub distribution_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Fill cells whose value is forced before compiling the oracle.
    pub trivial_fill: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub puzzle_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub save_distribution: bool,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: SolverConfig {
                max_state_bits: 24,
                rounds: None,
                distribution_size: 8,
            },
            preprocessing: PreprocessingConfig { trivial_fill: true },
            input: InputConfig {
                puzzle_file: PathBuf::from("input/puzzles/example.txt"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                save_distribution: false,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.max_state_bits == 0 {
            anyhow::bail!("State vector ceiling must be positive");
        }

        if self.solver.max_state_bits > 30 {
            anyhow::bail!(
                "State vector ceiling of {} bits exceeds the supported maximum of 30",
                self.solver.max_state_bits
            );
        }

        if self.solver.distribution_size == 0 {
            anyhow::bail!("Distribution size must be positive");
        }

        if !self.input.puzzle_file.exists() {
            anyhow::bail!("Puzzle file does not exist: {}", self.input.puzzle_file.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref puzzle_file) = cli_overrides.puzzle_file {
            self.input.puzzle_file = puzzle_file.clone();
        }
        if let Some(rounds) = cli_overrides.rounds {
            self.solver.rounds = Some(rounds);
        }
        if let Some(max_state_bits) = cli_overrides.max_state_bits {
            self.solver.max_state_bits = max_state_bits;
        }
        if let Some(trivial_fill) = cli_overrides.trivial_fill {
            self.preprocessing.trivial_fill = trivial_fill;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub puzzle_file: Option<PathBuf>,
    pub rounds: Option<usize>,
    pub max_state_bits: Option<usize>,
    pub trivial_fill: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_round_trip() {
        let dir = tempdir().unwrap();
        let puzzle = dir.path().join("puzzle.txt");
        std::fs::write(&puzzle, "3142\n2001\n1000\n4003\n").unwrap();
        let path = dir.path().join("settings.yaml");

        let mut settings = Settings::default();
        settings.solver.max_state_bits = 20;
        settings.solver.rounds = Some(3);
        settings.output.format = OutputFormat::Json;
        settings.input.puzzle_file = puzzle;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.solver.max_state_bits, 20);
        assert_eq!(loaded.solver.rounds, Some(3));
        assert_eq!(loaded.solver.distribution_size, 8);
        assert_eq!(loaded.input.puzzle_file, settings.input.puzzle_file);
        assert!(matches!(loaded.output.format, OutputFormat::Json));
    }

    #[test]
    fn test_from_file_rejects_bad_files() {
        let dir = tempdir().unwrap();
        assert!(Settings::from_file(&dir.path().join("absent.yaml")).is_err());

        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "solver: [not, a, table]\n").unwrap();
        assert!(Settings::from_file(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let mut settings = Settings::default();
        settings.solver.max_state_bits = 0;
        assert!(settings.validate().is_err());

        settings.solver.max_state_bits = 31;
        assert!(settings.validate().is_err());

        settings.solver.max_state_bits = 24;
        settings.solver.distribution_size = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_requires_the_puzzle_file() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.input.puzzle_file = dir.path().join("missing.txt");
        assert!(settings.validate().is_err());

        std::fs::write(&settings.input.puzzle_file, "3142\n2001\n1000\n4003\n").unwrap();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            puzzle_file: Some(PathBuf::from("custom.txt")),
            rounds: Some(5),
            max_state_bits: Some(16),
            trivial_fill: Some(false),
            output_dir: None,
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.input.puzzle_file, PathBuf::from("custom.txt"));
        assert_eq!(settings.solver.rounds, Some(5));
        assert_eq!(settings.solver.max_state_bits, 16);
        assert!(!settings.preprocessing.trivial_fill);
        // fields without an override keep their configured values
        assert_eq!(
            settings.output.output_directory,
            PathBuf::from("output/solutions")
        );
    }
}
