use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 1-based cell address within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse A1 notation (`"B10"`, `"af12"`).
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| format!("Invalid cell reference: {s}"))?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("Invalid cell reference: {s}"));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| format!("Column out of range: {s}"))?;
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| format!("Invalid cell reference: {s}"))?;
        if row == 0 {
            return Err(format!("Rows start at 1: {s}"));
        }
        Ok(Self { row, col })
    }
}

/// Column letters for a 1-based column index (`32` -> `"AF"`).
pub fn column_letters(mut col: u32) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    out.iter().rev().collect()
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
