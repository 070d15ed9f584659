//! Block layout loading
//!
//! A level is a grid of single-character symbols. Each non-empty cell becomes
//! one immovable block; the whole block set is rebuilt whenever the active
//! overlay changes.

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geom::{Rect, Vector2};
use crate::error::{ConfigError, read_file};

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Normal,
    Death,
    Checkpoint,
    Finish,
}

impl BlockKind {
    /// Map a layout symbol to a block kind (`None` = empty cell)
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '1' => Some(BlockKind::Normal),
            'x' => Some(BlockKind::Death),
            'c' => Some(BlockKind::Checkpoint),
            '!' => Some(BlockKind::Finish),
            _ => None,
        }
    }
}

/// An immovable tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    pub kind: BlockKind,
}

/// Named layout overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutVariant {
    /// The level as first loaded
    Base,
    /// Boss arena unlocked
    Leap,
    /// Post-boss finish decoration
    Flag,
}

impl LayoutVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutVariant::Base => "base",
            LayoutVariant::Leap => "leap",
            LayoutVariant::Flag => "flag",
        }
    }
}

/// Row data for every overlay
///
/// Never mutated: the base rows double as the revert-on-death copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub base: Vec<String>,
    pub leap: Vec<String>,
    pub flag: Vec<String>,
}

impl Default for LevelData {
    fn default() -> Self {
        super::levels::builtin()
    }
}

impl LevelData {
    pub fn rows(&self, variant: LayoutVariant) -> &[String] {
        match variant {
            LayoutVariant::Base => &self.base,
            LayoutVariant::Leap => &self.leap,
            LayoutVariant::Flag => &self.flag,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = Self::from_json(&read_file(path)?)?;
        log::info!("Loaded level data from {}", path.display());
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for variant in [LayoutVariant::Base, LayoutVariant::Leap, LayoutVariant::Flag] {
            if self.rows(variant).is_empty() {
                return Err(ConfigError::invalid(format!(
                    "{} overlay has no rows",
                    variant.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Level width in pixels, taken from the first row
    pub fn pixel_width(&self, cell: Vector2) -> i32 {
        let cols = self.base.first().map(|r| r.chars().count()).unwrap_or(0);
        cols as i32 * cell.x
    }

    pub fn pixel_height(&self, cell: Vector2) -> i32 {
        self.base.len() as i32 * cell.y
    }
}

/// Convert symbol rows into blocks
///
/// Each row is read to its own length, so ragged rows are tolerated.
/// Unrecognised symbols other than `0` are skipped with a warning.
pub fn build_blocks<S: AsRef<str>>(rows: &[S], cell: Vector2) -> Vec<Block> {
    let mut blocks = Vec::new();
    for (row, line) in rows.iter().enumerate() {
        for (col, symbol) in line.as_ref().chars().enumerate() {
            match BlockKind::from_symbol(symbol) {
                Some(kind) => blocks.push(Block {
                    rect: Rect::new(col as i32 * cell.x, row as i32 * cell.y, cell.x, cell.y),
                    kind,
                }),
                None if symbol == '0' => {}
                None => {
                    log::warn!("Ignoring unknown layout symbol {symbol:?} at row {row}, column {col}")
                }
            }
        }
    }
    blocks
}

/// The active block set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelLayout {
    pub variant: LayoutVariant,
    pub cell: Vector2,
    blocks: Vec<Block>,
}

impl LevelLayout {
    pub fn load(data: &LevelData, variant: LayoutVariant, cell: Vector2) -> Self {
        Self {
            variant,
            cell,
            blocks: build_blocks(data.rows(variant), cell),
        }
    }

    /// Replace the whole block set with another overlay
    pub fn swap(&mut self, data: &LevelData, variant: LayoutVariant) {
        let blocks = build_blocks(data.rows(variant), self.cell);
        log::info!(
            "Layout {} -> {} ({} blocks)",
            self.variant.as_str(),
            variant.as_str(),
            blocks.len()
        );
        self.blocks = blocks;
        self.variant = variant;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            variant: LayoutVariant::Base,
            cell: IVec2::new(crate::consts::BLOCK_WIDTH, crate::consts::BLOCK_HEIGHT),
            blocks: Vec::new(),
        }
    }
}
