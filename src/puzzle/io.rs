//! Input/output utilities for puzzle grids

use super::Grid;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a puzzle grid from a text file.
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read puzzle file: {}", path.as_ref().display()))?;
    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse puzzle file: {}", path.as_ref().display()))
}

/// Parse a grid from its text representation: one row per line, digits for
/// values, `0` or `.` for empty cells, spaces between cells optional.
/// Blank lines and lines starting with `#` are ignored.
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Puzzle file contains no grid lines");
    }

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::new();
        for ch in line.chars() {
            let value = match ch {
                ' ' | '\t' => continue,
                '.' => 0,
                _ => match ch.to_digit(10) {
                    Some(digit) => digit as u8,
                    None => anyhow::bail!(
                        "Invalid character '{}' in row {} of puzzle file",
                        ch,
                        row_idx
                    ),
                },
            };
            row.push(value);
        }
        rows.push(row);
    }

    Ok(Grid::from_rows(rows)?)
}

/// Save a grid to a text file.
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    fs::write(&path, grid_to_string(grid))
        .with_context(|| format!("Failed to write puzzle file: {}", path.as_ref().display()))?;
    Ok(())
}

/// Text representation accepted back by [`parse_grid_from_string`].
pub fn grid_to_string(grid: &Grid) -> String {
    grid.to_string()
}

/// Write a set of example puzzles into a directory.
pub fn create_example_puzzles<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create puzzle directory: {}", dir.display()))?;

    let examples: [(&str, &str, Vec<Vec<u8>>); 3] = [
        (
            "easy.txt",
            "mostly filled, reduces to four unknowns",
            vec![
                vec![3, 1, 4, 2],
                vec![2, 0, 0, 1],
                vec![1, 0, 0, 0],
                vec![4, 0, 0, 3],
            ],
        ),
        (
            "moderate.txt",
            "half filled, still a single completion",
            vec![
                vec![0, 0, 2, 3],
                vec![0, 2, 0, 4],
                vec![0, 1, 3, 0],
                vec![0, 0, 4, 1],
            ],
        ),
        (
            "solved.txt",
            "already complete",
            vec![
                vec![3, 1, 4, 2],
                vec![2, 4, 3, 1],
                vec![1, 3, 2, 4],
                vec![4, 2, 1, 3],
            ],
        ),
    ];

    for (name, description, rows) in examples {
        let grid = Grid::from_rows(rows)?;
        let content = format!("# 4x4 puzzle: {}\n{}", description, grid_to_string(&grid));
        fs::write(dir.join(name), content)
            .with_context(|| format!("Failed to write example puzzle {}", name))?;
    }

    Ok(())
}
