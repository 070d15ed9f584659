//! Built-in level
//!
//! Symbols: `0` empty, `1` platform, `c` checkpoint, `x` death, `!` finish.
//! Cells are 60x60; the level is 12 rows by 120 columns.
//!
//! The leap overlay bridges the death chasm in front of the boss arena; the
//! flag overlay adds the finish blocks once the boss is down.

use super::layout::LevelData;

const BASE: [&str; 12] = [
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000111111111111110000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000111111000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000001000000010000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000001111111110000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000001110000000000000000000000000000000000000000000000000000001",
    "000000000000000011100000000000000000000011100000000000111000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000110000000000000000000000000000000000000000000000000001",
    "000000000000000000000100000000010000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "111111111111xx111111111111111111111c1111111111111111111111xx1111111111111111c11111111111xxxxxxxx111111111111111111111111",
];

const LEAP: [&str; 12] = [
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000111111111111110000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000111111000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000001000000010000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000001111111110000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000001110000000000000000000000000000000000000000000000000000001",
    "000000000000000011100000000000000000000011100000000000111000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000110000000000000000000000000000000000000000000000000001",
    "000000000000000000000100000000010000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "111111111111xx111111111111111111111c1111111111111111111111xx1111111111111111c1111111111111111111111111111111111111111111",
];

const FLAG: [&str; 12] = [
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000111111111111110000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000111111000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000001000000010000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000001111111110000000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000001110000000000000000000000000000000000000000000000000000001",
    "000000000000000011100000000000000000000011100000000000111000000000000000000000000000000000000000000000000000000000000001",
    "000000000000000000000000000000000000000000000000000000000000000000110000000000000000000000000000000000000000000000000001",
    "00000000000000000000010000000001000000000000000000000000000000000000000000000000000000000000000000000000000000000000!!01",
    "111111111111xx111111111111111111111c1111111111111111111111xx1111111111111111c1111111111111111111111111111111111111111111",
];

/// Level data for the built-in stage
pub fn builtin() -> LevelData {
    let own = |rows: &[&str]| rows.iter().map(|r| r.to_string()).collect();
    LevelData {
        base: own(&BASE),
        leap: own(&LEAP),
        flag: own(&FLAG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::{BlockKind, LayoutVariant, build_blocks};
    use glam::IVec2;

    const CELL: IVec2 = IVec2::new(60, 60);

    #[test]
    fn test_rows_are_uniform() {
        let data = builtin();
        for variant in [LayoutVariant::Base, LayoutVariant::Leap, LayoutVariant::Flag] {
            let rows = data.rows(variant);
            assert_eq!(rows.len(), 12);
            assert!(rows.iter().all(|r| r.len() == 120));
        }
        assert_eq!(data.pixel_width(CELL), 7200);
    }

    #[test]
    fn test_leap_bridges_chasm() {
        let data = builtin();
        let death = |v| {
            build_blocks(data.rows(v), CELL)
                .iter()
                .filter(|b| b.kind == BlockKind::Death && b.rect.x >= 5280)
                .count()
        };
        assert_eq!(death(LayoutVariant::Base), 8);
        assert_eq!(death(LayoutVariant::Leap), 0);
    }

    #[test]
    fn test_only_flag_has_finish() {
        let data = builtin();
        let finishes = |v| {
            build_blocks(data.rows(v), CELL)
                .iter()
                .filter(|b| b.kind == BlockKind::Finish)
                .count()
        };
        assert_eq!(finishes(LayoutVariant::Base), 0);
        assert_eq!(finishes(LayoutVariant::Leap), 0);
        assert_eq!(finishes(LayoutVariant::Flag), 2);
    }
}
