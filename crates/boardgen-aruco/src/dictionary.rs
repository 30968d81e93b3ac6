//! Dictionary metadata and packed marker codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::builtins;

/// A fixed ArUco-style dictionary.
#[derive(Clone, Copy, Debug)]
pub struct Dictionary {
    /// Registry name, e.g. `DICT_4X4_50`.
    pub name: &'static str,
    /// Marker side length (number of inner bits per side).
    pub marker_size: usize,
    /// Maximum error-correcting Hamming distance supported by the dictionary.
    pub max_correction_bits: u8,
    /// One `u64` per marker id, encoding the inner `marker_size × marker_size` bits.
    ///
    /// Bit `row * marker_size + col` (LSB first) is set when the cell is **black**.
    pub codes: &'static [u64],
}

/// A dictionary name that is not in the built-in registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown dictionary `{name}` (available: {available})")]
pub struct UnknownDictionary {
    pub name: String,
    pub available: String,
}

impl Dictionary {
    /// Cells per side of a marker framed by `border_bits` border cells.
    ///
    /// `None` when the grid side or its cell count does not fit in `usize`.
    pub fn cells_per_side(&self, border_bits: usize) -> Option<usize> {
        let side = border_bits.checked_mul(2)?.checked_add(self.marker_size)?;
        side.checked_mul(side)?;
        Some(side)
    }

    /// Number of marker ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn code(&self, id: u32) -> Option<u64> {
        self.codes.get(id as usize).copied()
    }

    /// Whether inner bit `(row, col)` of marker `id` is black.
    pub fn is_black(&self, id: u32, row: usize, col: usize) -> Option<bool> {
        if row >= self.marker_size || col >= self.marker_size {
            return None;
        }
        let code = self.code(id)?;
        Some((code >> (row * self.marker_size + col)) & 1 == 1)
    }

    /// Black flags for the full marker grid, border included.
    ///
    /// The grid has `marker_size + 2 * border_bits` cells per side and is
    /// returned row-major. Border cells are always black. Returns `None` for
    /// an unknown id or a border too wide to index.
    pub fn marker_cells(&self, id: u32, border_bits: usize) -> Option<Vec<bool>> {
        let code = self.code(id)?;
        let n = self.marker_size;
        let side = self.cells_per_side(border_bits)?;
        let mut cells = vec![true; side * side];
        for row in 0..n {
            for col in 0..n {
                let black = (code >> (row * n + col)) & 1 == 1;
                cells[(row + border_bits) * side + col + border_bits] = black;
            }
        }
        Some(cells)
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.marker_size == other.marker_size
            && self.codes == other.codes
    }
}

impl Eq for Dictionary {}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Dictionary {
    type Err = UnknownDictionary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        builtins::builtin_dictionary(s).ok_or_else(|| UnknownDictionary {
            name: s.to_string(),
            available: builtins::BUILTIN_DICTIONARY_NAMES.join(", "),
        })
    }
}

impl Serialize for Dictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

impl<'de> Deserialize<'de> for Dictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
