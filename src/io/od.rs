//! OD matrix loader (§6): `origin; destination; passengers`, three integer
//! fields. The largest index seen determines the square matrix size.

use std::path::Path;

use crate::error::SimError;
use crate::io::read_data_lines;

#[derive(Debug, Clone)]
pub struct OdMatrix {
    size: usize,
    counts: Vec<u32>,
}

impl OdMatrix {
    pub fn get(&self, origin: usize, destination: usize) -> u32 {
        self.counts[origin * self.size + destination]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Non-zero `(origin, destination, passengers)` triples, in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(move |(idx, &c)| (idx / self.size, idx % self.size, c))
    }

    #[cfg(test)]
    pub(crate) fn from_counts_for_test(size: usize, counts: Vec<u32>) -> Self {
        OdMatrix { size, counts }
    }
}

pub fn load_od_matrix(path: &Path) -> Result<OdMatrix, SimError> {
    let mut triples = Vec::new();
    let mut max_index = 0usize;

    for line in read_data_lines(path)? {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(SimError::InvalidInputFile {
                path: path.display().to_string(),
                reason: format!("expected 3 fields, got {}: {line}", fields.len()),
            });
        }
        let origin: usize = parse_field(path, fields[0], "origin")?;
        let destination: usize = parse_field(path, fields[1], "destination")?;
        let passengers: u32 = parse_field(path, fields[2], "passengers")?;

        max_index = max_index.max(origin).max(destination);
        triples.push((origin, destination, passengers));
    }

    let size = max_index + 1;
    let mut counts = vec![0u32; size * size];
    for (origin, destination, passengers) in triples {
        counts[origin * size + destination] = passengers;
    }

    Ok(OdMatrix { size, counts })
}

fn parse_field<T: std::str::FromStr>(path: &Path, raw: &str, name: &str) -> Result<T, SimError> {
    raw.parse().map_err(|_| SimError::InvalidInputFile {
        path: path.display().to_string(),
        reason: format!("invalid {name}: {raw:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn matrix_is_sized_by_largest_index_seen() {
        let file = file_with("0; 2; 5\n1; 1; 3\n");
        let matrix = load_od_matrix(file.path()).unwrap();
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.get(0, 2), 5);
        assert_eq!(matrix.get(1, 1), 3);
        assert_eq!(matrix.get(2, 0), 0);
    }

    #[test]
    fn entries_skips_zero_cells() {
        let file = file_with("0; 1; 4\n");
        let matrix = load_od_matrix(file.path()).unwrap();
        let entries: Vec<_> = matrix.entries().collect();
        assert_eq!(entries, vec![(0, 1, 4)]);
    }
}
