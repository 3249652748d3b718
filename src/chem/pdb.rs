//! Column-offset reader for PDB `ATOM`/`HETATM` records.
//!
//! Only what the sphere renderer needs is extracted: the element symbol and
//! the orthogonal coordinates. Reading stops at the first `ENDMDL`, so
//! multi-model files yield their first model.
//!
//! Format reference:
//! <https://www.wwpdb.org/documentation/file-format-content/format33/sect9.html>

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use glam::Vec3;

use super::{atom::Atom, element_table::normalize_symbol};
use crate::error::MolsphereError;

/// Shortest record that still carries x, y and z.
const MIN_COORD_LEN: usize = 54;

/// 0-based, end-exclusive column ranges.
const ATOM_NAME: (usize, usize) = (12, 16);
const X: (usize, usize) = (30, 38);
const Y: (usize, usize) = (38, 46);
const Z: (usize, usize) = (46, 54);
const ELEMENT: (usize, usize) = (76, 78);

/// Read the atoms of a PDB file on disk.
///
/// # Errors
///
/// Returns [`MolsphereError::Io`] if the file cannot be read and
/// [`MolsphereError::StructureLoad`] on malformed coordinates or when the
/// file has no atoms.
pub fn parse_pdb_file(path: &Path) -> Result<Vec<Atom>, MolsphereError> {
    let file = File::open(path)?;
    let atoms = parse_pdb(BufReader::new(file))?;
    log::info!("Loaded {} atoms from {}", atoms.len(), path.display());
    Ok(atoms)
}

/// Read the atoms of PDB text from any buffered reader.
///
/// # Errors
///
/// See [`parse_pdb_file`].
pub fn parse_pdb(reader: impl BufRead) -> Result<Vec<Atom>, MolsphereError> {
    let mut atoms = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;

        if line.starts_with("ENDMDL") {
            break;
        }
        let is_hetatm = line.starts_with("HETATM");
        if !(line.starts_with("ATOM") || is_hetatm) {
            continue;
        }
        if line.len() < MIN_COORD_LEN {
            log::warn!("line {line_no}: truncated atom record skipped");
            continue;
        }

        let position = Vec3::new(
            parse_coord(&line, X, line_no)?,
            parse_coord(&line, Y, line_no)?,
            parse_coord(&line, Z, line_no)?,
        );
        atoms.push(Atom::new(element_symbol(&line, is_hetatm), position));
    }

    if atoms.is_empty() {
        return Err(MolsphereError::StructureLoad(
            "no ATOM or HETATM records found".into(),
        ));
    }
    Ok(atoms)
}

/// Trimmed text of a column range; empty when the line is too short.
fn column(line: &str, (start, end): (usize, usize)) -> &str {
    let end = end.min(line.len());
    line.get(start..end).map_or("", str::trim)
}

fn parse_coord(
    line: &str,
    range: (usize, usize),
    line_no: usize,
) -> Result<f32, MolsphereError> {
    let text = column(line, range);
    text.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            MolsphereError::StructureLoad(format!(
                "line {line_no}: invalid coordinate {text:?} in columns {}-{}",
                range.0 + 1,
                range.1
            ))
        })
}

/// Element column, or a guess from the atom name when it is blank.
///
/// Atom names put single-letter elements in column 14 (`" CA "` is a
/// C-alpha carbon) and two-letter elements from column 13 (`"FE  "`). A
/// non-blank column 13 is only read as a two-letter element for `HETATM`
/// records, since protein hydrogens such as `"HD21"` also start there.
fn element_symbol(line: &str, is_hetatm: bool) -> String {
    let explicit = column(line, ELEMENT);
    if !explicit.is_empty() {
        return normalize_symbol(explicit);
    }

    let name = line.get(ATOM_NAME.0..ATOM_NAME.1.min(line.len())).unwrap_or("");
    let starts_in_13 = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());
    let letters: String = name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(if starts_in_13 && is_hetatm { 2 } else { 1 })
        .collect();
    normalize_symbol(&letters)
}
