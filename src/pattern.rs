use crate::rule::{self, RULE};
use ahash::AHashSet;
use anyhow::{anyhow, Context, Result};
use flate2::{
    read::{GzDecoder, GzEncoder},
    Compression,
};
use rand::{Rng, SeedableRng};
use std::{io::Read, path::Path};

/// Maximum length of a body line produced by [`Pattern::to_format`] for RLE.
const RLE_LINE_LIMIT: usize = 70;

/// A rectangular two-state pattern stored as a flat row-major cell buffer.
///
/// # Overview
///
/// `Pattern` is the exchange format between pattern files and the
/// simulation: it carries the declared width and height and exactly
/// `width * height` cells, the ones not mentioned by the source being dead.
/// A [`WorldGrid`](crate::WorldGrid) is built from it, and the current
/// generation of a grid can be turned back into one for saving.
///
/// # Formats
///
/// *   [`PatternFormat::RLE`]: Extended RLE, the usual format of pattern
///     collections.
/// *   [`PatternFormat::CompressedRLE`]: the same text, gzip-compressed.
///
/// # Limitations
///
/// *   **Two-State Only:** only dead/alive cells, tags `b` and `o`.
/// *   **B3/S23 Rule:** headers naming any other rule are rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Pattern {
    /// Creates a pattern from a row-major cell buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if `cells.len()` is not `width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        let area = Self::checked_area(width, height)?;
        if cells.len() != area {
            return Err(anyhow!(
                "Cell buffer has {} cells, expected {}x{} = {}",
                cells.len(),
                width,
                height,
                area
            ));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    fn checked_area(width: usize, height: usize) -> Result<usize> {
        width
            .checked_mul(height)
            .ok_or_else(|| anyhow!("Pattern {}x{} is too large", width, height))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cells, `width * height` long.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the pattern.
    pub fn get(&self, x: usize, y: usize) -> bool {
        assert!(
            x < self.width && y < self.height,
            "({}, {}) is outside the {}x{} pattern",
            x,
            y,
            self.width,
            self.height
        );
        self.cells[self.width * y + x]
    }

    /// Counts the alive cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Returns the coordinates of every alive cell.
    pub fn live_cells(&self) -> AHashSet<(usize, usize)> {
        if self.width == 0 {
            return AHashSet::new();
        }
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &alive)| alive)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }

    /// Creates a pattern where every cell is independently alive with
    /// probability 1/2.
    ///
    /// # Arguments
    ///
    /// * `seed` - Optional seed for the random number generator.
    ///   If None, seeds from the OS.
    ///
    /// # Errors
    ///
    /// Returns an error if the area overflows.
    pub fn random(width: usize, height: usize, seed: Option<u64>) -> Result<Self> {
        let area = Self::checked_area(width, height)?;
        let mut rng = if let Some(x) = seed {
            rand_chacha::ChaCha8Rng::seed_from_u64(x)
        } else {
            rand_chacha::ChaCha8Rng::from_os_rng()
        };
        let cells = (0..area).map(|_| rng.random::<bool>()).collect();
        Self::from_cells(width, height, cells)
    }

    /// Creates a pattern from data in the specified format.
    ///
    /// Parsing is all-or-nothing: on error no partially filled pattern
    /// escapes.
    ///
    /// # Errors
    ///
    /// - `RLE`: missing or malformed header, unsupported rule, unknown
    ///   tags, cells outside the declared bounds or a truncated body
    /// - `CompressedRLE`: invalid gzip data, or any of the above
    pub fn from_format(format: PatternFormat, data: &[u8]) -> Result<Self> {
        let pattern = match format {
            PatternFormat::RLE => Self::from_rle(data),
            PatternFormat::CompressedRLE => Self::from_compressed_rle(data),
        }?;
        tracing::debug!(
            ?format,
            width = pattern.width,
            height = pattern.height,
            population = pattern.population(),
            "parsed pattern"
        );
        Ok(pattern)
    }

    /// Converts the pattern to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if compression fails.
    pub fn to_format(&self, format: PatternFormat) -> Result<Vec<u8>> {
        match format {
            PatternFormat::RLE => Ok(self.to_rle()),
            PatternFormat::CompressedRLE => self.to_compressed_rle(),
        }
    }

    /// Reads a pattern file, picking the format by extension
    /// (see [`PatternFormat::from_path`]).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = PatternFormat::from_path(path)?;
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read pattern file {}", path.display()))?;
        Self::from_format(format, &data)
            .with_context(|| format!("Failed to parse pattern file {}", path.display()))
    }

    /// Writes the pattern to a file, picking the format by extension.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_format(PatternFormat::from_path(path)?)?;
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write pattern file {}", path.display()))
    }

    /// Creates a pattern from data in the Extended RLE format. See [`PatternFormat::RLE`].
    ///
    /// Lines starting with `#` are comments. The header is
    /// `x = <width>, y = <height>` with an optional `, rule = B3/S23`.
    /// In the body digits accumulate a run count (default 1), `b` emits dead
    /// cells, `o` emits alive cells, `$` ends the row (count rows at once)
    /// and `!` ends the pattern.
    fn from_rle(data: &[u8]) -> Result<Self> {
        let mut lines = data
            .split(|&b| b == b'\n')
            .map(|x| x.strip_suffix(b"\r").unwrap_or(x))
            .filter(|x| !x.trim_ascii().is_empty() && x[0] != b'#');
        let width: usize;
        let height: usize;

        // Parse header
        if let Some(line) = lines.next() {
            let mut parts = line.split(|&b| b == b',').map(|x| x.trim_ascii());

            let extract_value = |part: &[u8], expected_key: &[u8]| {
                let mut items = part.split(|&b| b == b'=');
                let key = items.next().unwrap_or(&[]).trim_ascii_end();
                if key != expected_key {
                    return Err(anyhow!(
                        "Invalid header: expected {}, got {}",
                        String::from_utf8_lossy(expected_key),
                        String::from_utf8_lossy(key)
                    ));
                }
                let value = items.next().unwrap_or(&[]).trim_ascii_start();
                if items.next().is_some() {
                    return Err(anyhow!("Invalid header: missing ',' between '='"));
                }
                Ok(value.to_vec())
            };

            let value = extract_value(
                parts
                    .next()
                    .ok_or_else(|| anyhow!("Invalid header: missing \"x\""))?,
                b"x",
            )?;
            width = std::str::from_utf8(&value)?
                .parse()
                .context("Invalid header: bad width")?;

            let value = extract_value(
                parts
                    .next()
                    .ok_or_else(|| anyhow!("Invalid header: missing \"y\""))?,
                b"y",
            )?;
            height = std::str::from_utf8(&value)?
                .parse()
                .context("Invalid header: bad height")?;

            // rule is optional
            if let Some(part) = parts.next() {
                let rule = extract_value(part, b"rule")?;
                if !rule::is_conway(&rule) {
                    return Err(anyhow!(
                        "Only {} rule is supported, got {}",
                        RULE,
                        String::from_utf8_lossy(&rule)
                    ));
                }
            }
        } else {
            return Err(anyhow!("Missing header"));
        }

        let mut cells = vec![false; Self::checked_area(width, height)?];

        // Parse pattern data
        let mut x = 0usize;
        let mut y = 0usize;
        let mut count: Option<usize> = None;
        let mut terminated = false;

        'body: for line in lines {
            for &b in line {
                match b {
                    b'0'..=b'9' => {
                        count = count
                            .unwrap_or(0)
                            .checked_mul(10)
                            .and_then(|c| c.checked_add((b - b'0') as usize));
                        if count.is_none() {
                            return Err(anyhow!("Run count overflow at row {}", y));
                        }
                    }
                    b'b' => {
                        x = x.saturating_add(count.take().unwrap_or(1));
                    }
                    b'o' => {
                        let run = count.take().unwrap_or(1);
                        if y >= height || x.saturating_add(run) > width {
                            return Err(anyhow!(
                                "Pattern data out of bounds: x = {}..{}, y = {}",
                                x,
                                x.saturating_add(run),
                                y
                            ));
                        }
                        let start = width * y + x;
                        cells[start..start + run].fill(true);
                        x += run;
                    }
                    b'$' => {
                        y = y.saturating_add(count.take().unwrap_or(1));
                        x = 0;
                    }
                    b'!' => {
                        if count.is_some() {
                            return Err(anyhow!("Run count without a tag before '!'"));
                        }
                        terminated = true;
                        break 'body;
                    }
                    b' ' | b'\t' => continue,
                    _ => return Err(anyhow!("Invalid RLE character: '{}'", b as char)),
                }
                if x > width {
                    return Err(anyhow!("Pattern data out of bounds: x = {}, y = {}", x, y));
                }
            }
        }

        if !terminated {
            return Err(anyhow!("Truncated RLE data: missing '!'"));
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Converts the pattern to the Extended RLE format. See [`PatternFormat::RLE`].
    ///
    /// The header keeps the full pattern size, so leading blank rows and
    /// columns survive a round trip. Trailing dead runs of a row and
    /// trailing blank rows are omitted.
    fn to_rle(&self) -> Vec<u8> {
        let mut result = format!(
            "x = {}, y = {}, rule = {}\n",
            self.width, self.height, RULE
        )
        .into_bytes();
        let mut line_length = 0;
        let mut push_run = |result: &mut Vec<u8>, run_length: usize, tag: u8| {
            let mut run = Vec::new();
            if run_length > 1 {
                run.extend_from_slice(run_length.to_string().as_bytes());
            }
            run.push(tag);
            if line_length + run.len() > RLE_LINE_LIMIT {
                result.push(b'\n');
                line_length = 0;
            }
            result.extend_from_slice(&run);
            line_length += run.len();
        };

        let mut rows_ended = 0;
        if self.width > 0 {
            for row in self.cells.chunks_exact(self.width) {
                let Some(last_alive) = row.iter().rposition(|&alive| alive) else {
                    rows_ended += 1;
                    continue;
                };
                if rows_ended > 0 {
                    push_run(&mut result, rows_ended, b'$');
                }

                let mut run_length = 0;
                let mut last_state = row[0];
                for &state in &row[..=last_alive] {
                    if state != last_state {
                        push_run(&mut result, run_length, if last_state { b'o' } else { b'b' });
                        run_length = 0;
                        last_state = state;
                    }
                    run_length += 1;
                }
                push_run(&mut result, run_length, b'o');
                rows_ended = 1;
            }
        }
        push_run(&mut result, 1, b'!');
        result
    }

    /// Creates a pattern from gzip-compressed Extended RLE.
    /// See [`PatternFormat::CompressedRLE`].
    fn from_compressed_rle(compressed_data: &[u8]) -> Result<Self> {
        let mut decoder = GzDecoder::new(compressed_data);
        let mut decompressed_data = Vec::new();
        decoder
            .read_to_end(&mut decompressed_data)
            .context("Failed to decompress RLE data")?;
        Self::from_rle(&decompressed_data)
    }

    /// Converts the pattern to gzip-compressed Extended RLE.
    /// See [`PatternFormat::CompressedRLE`].
    fn to_compressed_rle(&self) -> Result<Vec<u8>> {
        let rle_data = self.to_rle();
        let mut encoder = GzEncoder::new(&rle_data[..], Compression::default());
        let mut compressed_data = Vec::new();
        encoder
            .read_to_end(&mut compressed_data)
            .context("Failed to compress RLE data")?;
        Ok(compressed_data)
    }
}

/// Supported formats for pattern serialization and deserialization.
///
/// Notice that only two-state patterns and B3/S23 rules are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFormat {
    /// [Extended RLE](https://golly.sourceforge.io/Help/formats.html#rle) format:
    /// a `x = <width>, y = <height>` header followed by run-length encoded rows.
    RLE,

    /// Gzip-compressed Extended RLE for more efficient storage.
    CompressedRLE,
}

impl PatternFormat {
    /// Picks the format from a file name: `.rle` or `.rle.gz`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".rle.gz") {
            Ok(Self::CompressedRLE)
        } else if name.ends_with(".rle") {
            Ok(Self::RLE)
        } else {
            Err(anyhow!(
                "Unsupported pattern file {}: expected .rle or .rle.gz",
                path.display()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const SEED: u64 = 42;
    const GLIDER: &[u8] = b"x = 3, y = 3, rule = B3/S23\nbo$2bo$3o!";

    #[test]
    fn test_glider_cells() {
        let glider = Pattern::from_rle(GLIDER).unwrap();
        assert_eq!((glider.width(), glider.height()), (3, 3));
        let expected: AHashSet<_> = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)].into_iter().collect();
        assert_eq!(glider.live_cells(), expected);
        assert_eq!(glider.population(), 5);
    }

    #[test]
    fn test_header_whitespace_and_comments() {
        let data = b"#N Blinker\r\n#C a comment\r\nx=3,y  =   1\r\n3o!\r\n";
        let blinker = Pattern::from_rle(data).unwrap();
        assert_eq!((blinker.width(), blinker.height()), (3, 1));
        assert_eq!(blinker.cells(), &[true, true, true]);
    }

    #[test]
    fn test_multiline_body_and_row_counts() {
        let data = b"x = 4, y = 5\no2b\no$\n3$3bo!";
        let pattern = Pattern::from_rle(data).unwrap();
        let expected: AHashSet<_> = [(0, 0), (3, 0), (3, 4)].into_iter().collect();
        assert_eq!(pattern.live_cells(), expected);
    }

    #[test]
    fn test_row_end_pads_dead() {
        let pattern = Pattern::from_rle(b"x = 5, y = 2\n2o$bo!").unwrap();
        assert_eq!(
            pattern.cells(),
            &[true, true, false, false, false, false, true, false, false, false]
        );
    }

    #[test]
    fn test_invalid_headers() {
        for data in [
            &b""[..],
            b"#C only a comment\n",
            b"y = 3, x = 3\n!",
            b"x = 3\n!",
            b"x = a, y = 3\n!",
            b"x = 3 = 4, y = 3\n!",
            b"x = 3, y = 3, rule = B36/S23\n!",
        ] {
            assert!(
                Pattern::from_rle(data).is_err(),
                "accepted {:?}",
                String::from_utf8_lossy(data)
            );
        }
        assert!(Pattern::from_rle(b"x = 3, y = 3, rule = 23/3\n3o!").is_ok());
    }

    #[test]
    fn test_invalid_bodies() {
        for data in [
            &b"x = 3, y = 3\n4o!"[..],
            b"x = 3, y = 3\n2b2o!",
            b"x = 3, y = 1\no$o!",
            b"x = 3, y = 3\n4b!",
            b"x = 3, y = 3\n2o3!",
            b"x = 3, y = 3\n3A!",
            b"x = 3, y = 3\nbo$2bo$3o",
            b"x = 3, y = 3\n",
            b"x = 3, y = 3\n99999999999999999999999o!",
        ] {
            assert!(
                Pattern::from_rle(data).is_err(),
                "accepted {:?}",
                String::from_utf8_lossy(data)
            );
        }
    }

    #[test]
    fn test_data_after_terminator_ignored() {
        let pattern = Pattern::from_rle(b"x = 2, y = 1\no!\nthis is not RLE").unwrap();
        assert_eq!(pattern.cells(), &[true, false]);
    }

    #[test]
    fn test_rle_roundtrip_random() {
        for (width, height) in [(1, 1), (3, 7), (16, 16), (70, 3), (101, 37)] {
            let pattern = Pattern::random(width, height, Some(SEED)).unwrap();
            let data = pattern.to_rle();
            let deserialized = Pattern::from_rle(&data).unwrap();
            assert_eq!(pattern, deserialized);
            assert!(data
                .split(|&b| b == b'\n')
                .all(|line| line.len() <= RLE_LINE_LIMIT));
        }
    }

    #[test]
    fn test_rle_roundtrip_sparse() {
        let mut cells = vec![false; 10 * 8];
        cells[10 * 3 + 9] = true;
        cells[10 * 6] = true;
        let pattern = Pattern::from_cells(10, 8, cells).unwrap();
        let data = pattern.to_rle();
        assert_eq!(data, b"x = 10, y = 8, rule = B3/S23\n3$9bo3$o!".to_vec());
        assert_eq!(Pattern::from_rle(&data).unwrap(), pattern);
    }

    #[test]
    fn test_blank_roundtrip() {
        let pattern = Pattern::from_cells(4, 2, vec![false; 8]).unwrap();
        let data = pattern.to_rle();
        assert_eq!(data, b"x = 4, y = 2, rule = B3/S23\n!".to_vec());
        assert_eq!(Pattern::from_rle(&data).unwrap(), pattern);
    }

    #[test]
    fn test_compressed_rle_roundtrip_random() {
        let pattern = Pattern::random(64, 48, Some(SEED)).unwrap();
        let data = pattern.to_format(PatternFormat::CompressedRLE).unwrap();
        let deserialized = Pattern::from_format(PatternFormat::CompressedRLE, &data).unwrap();
        assert_eq!(pattern, deserialized);
        assert!(Pattern::from_format(PatternFormat::CompressedRLE, GLIDER).is_err());
    }

    #[test]
    fn test_random_is_seeded() {
        let a = Pattern::random(32, 32, Some(SEED)).unwrap();
        let b = Pattern::random(32, 32, Some(SEED)).unwrap();
        let c = Pattern::random(32, 32, Some(SEED + 1)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        // roughly half of the cells are alive
        assert!((256..768).contains(&a.population()));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            PatternFormat::from_path(Path::new("a/queen.rle")).unwrap(),
            PatternFormat::RLE
        );
        assert_eq!(
            PatternFormat::from_path(Path::new("b.RLE.gz")).unwrap(),
            PatternFormat::CompressedRLE
        );
        assert!(PatternFormat::from_path(Path::new("c.mc")).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = std::env::temp_dir();
        let pattern = Pattern::random(20, 10, Some(SEED)).unwrap();
        for name in ["torus_life_roundtrip.rle", "torus_life_roundtrip.rle.gz"] {
            let path = dir.join(format!("{}_{}", std::process::id(), name));
            pattern.to_file(&path).unwrap();
            let loaded = Pattern::from_file(&path).unwrap();
            std::fs::remove_file(&path).unwrap();
            assert_eq!(pattern, loaded);
        }
        assert!(Pattern::from_file(dir.join("torus_life_missing_file.rle")).is_err());
    }
}
