//! Trait boundaries for collaborators this crate consumes but does not
//! own: the simulated system's type registry and geometry, and tabular
//! file input. Nothing here owns box/cell/molecule state; it only
//! describes what this crate needs to read from whatever does.

use crate::error::{Error, Result};

/// Lookup from atom type name to a dense index, owned by the caller.
pub trait AtomTypeRegistry {
    /// Resolve `name` to its index.
    ///
    /// # Errors
    /// Returns [`Error::Unresolved`] if `name` is not registered.
    fn lookup(&self, name: &str) -> Result<usize>;
}

/// One intra-cutoff atom pair: the two atoms' registry indices and
/// their squared separation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairDistance {
    /// Registry index of the first atom.
    pub atom_i: usize,
    /// Registry index of the second atom.
    pub atom_j: usize,
    /// Squared separation between the two atoms.
    pub r_squared: f64,
}

/// The simulated system's geometry, as needed to accumulate a
/// pair-correlation histogram or evaluate a tabulated potential.
pub trait Configuration {
    /// Every intra-cutoff atom pair, `(type_index_i, type_index_j, r²)`.
    fn pair_distances(&self) -> Vec<PairDistance>;

    /// Per-atom `(type_index, charge)` tuples.
    fn atom_types_and_charges(&self) -> Vec<(usize, f64)>;

    /// Box volume, used to normalise accumulated histograms into g(r).
    fn box_volume(&self) -> f64;
}

/// Sequential line-oriented tokenised input.
pub trait FileParser {
    /// Tokens of the next non-blank, non-comment line, or `None` at
    /// end of input.
    ///
    /// # Errors
    /// Returns [`Error::ParseError`] on a malformed line.
    fn get_args(&mut self) -> Result<Option<Vec<String>>>;
}

/// A [`FileParser`] over an in-memory buffer, useful for tests and for
/// small embedded configuration blocks.
pub struct StringParser<'a> {
    lines: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> StringParser<'a> {
    /// Wrap `text` for sequential tokenised reading.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line_no: 0,
        }
    }
}

impl FileParser for StringParser<'_> {
    fn get_args(&mut self) -> Result<Option<Vec<String>>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some(trimmed.split_whitespace().map(str::to_string).collect()));
        }
        Ok(None)
    }
}
