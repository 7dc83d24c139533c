//! Marker acquisition adapters.
//!
//! The pipeline only consumes a list of [`Marker`]s. How they are obtained is
//! up to the caller: an automated detector, a geometric fallback detector or
//! manual entry all implement [`MarkerSource`], and
//! [`acquire_first_available`] picks the first one that yields markers.

use std::path::{Path, PathBuf};

use crate::error::MarkerSourceError;
use crate::marker::Marker;

/// Acquisition strategy of a marker source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerSourceKind {
    /// A dedicated fiducial marker detector.
    AutomatedDetector,
    /// A generic shape detector used when the dedicated one finds nothing.
    GeometricFallback,
    /// Positions entered by hand or loaded from a list.
    ManualEntry,
}

/// Something that can produce the markers of a frame.
pub trait MarkerSource {
    /// The acquisition strategy.
    fn kind(&self) -> MarkerSourceKind;

    /// Acquire the markers. An empty list means nothing was found.
    fn acquire(&mut self) -> Result<Vec<Marker>, MarkerSourceError>;
}

/// A fixed list of markers.
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    markers: Vec<Marker>,
}

impl ManualEntry {
    /// Create a source returning `markers`.
    pub fn new(markers: Vec<Marker>) -> Self {
        Self { markers }
    }
}

impl MarkerSource for ManualEntry {
    fn kind(&self) -> MarkerSourceKind {
        MarkerSourceKind::ManualEntry
    }

    fn acquire(&mut self) -> Result<Vec<Marker>, MarkerSourceError> {
        Ok(self.markers.clone())
    }
}

/// Markers listed in a text file, one `x y id` triple per line.
#[derive(Debug, Clone)]
pub struct MarkerListFile {
    path: PathBuf,
}

impl MarkerListFile {
    /// Create a source reading the list at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MarkerSource for MarkerListFile {
    fn kind(&self) -> MarkerSourceKind {
        MarkerSourceKind::ManualEntry
    }

    fn acquire(&mut self) -> Result<Vec<Marker>, MarkerSourceError> {
        let text = std::fs::read_to_string(&self.path)?;
        let markers = parse_marker_list(&text);
        log::info!(
            "Loaded {} markers from {}",
            markers.len(),
            self.path.display()
        );
        Ok(markers)
    }
}

/// Parse a marker list of `x y id` lines.
///
/// Blank lines and lines starting with `#` are skipped. Lines that do not
/// start with two finite numbers and an integer are skipped with a warning.
pub fn parse_marker_list(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_marker_line(line) {
            Some(marker) => markers.push(marker),
            None => log::warn!("Skipping malformed marker line {}: {:?}", lineno + 1, line),
        }
    }

    markers
}

fn parse_marker_line(line: &str) -> Option<Marker> {
    let mut fields = line.split_whitespace();
    let x = fields.next()?.parse::<f64>().ok()?;
    let y = fields.next()?.parse::<f64>().ok()?;
    let id = fields.next()?.parse::<i32>().ok()?;
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    Some(Marker::new(id, x, y))
}

/// Try the sources in order and return the first non-empty marker list.
///
/// Source errors are logged and the next source is tried. Returns `None` if
/// no source produced markers.
pub fn acquire_first_available(
    sources: &mut [Box<dyn MarkerSource>],
) -> Option<(MarkerSourceKind, Vec<Marker>)> {
    for source in sources.iter_mut() {
        let kind = source.kind();
        match source.acquire() {
            Ok(markers) if !markers.is_empty() => return Some((kind, markers)),
            Ok(_) => log::info!("{:?} source found no markers", kind),
            Err(err) => log::warn!("{:?} source failed: {}", kind, err),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct Failing;

    impl MarkerSource for Failing {
        fn kind(&self) -> MarkerSourceKind {
            MarkerSourceKind::AutomatedDetector
        }

        fn acquire(&mut self) -> Result<Vec<Marker>, MarkerSourceError> {
            Err(MarkerSourceError::Unavailable("detector"))
        }
    }

    #[test]
    fn test_parse_marker_list() {
        let text = "# x y id\n\n120.5 80.25 3\n  200 90 4 extra\nnot a marker\n10 20\n";
        let markers = parse_marker_list(text);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0], Marker::new(3, 120.5, 80.25));
        assert_eq!(markers[1].id, 4);
        assert_eq!(markers[1].plane_index(), None);
    }

    #[test]
    fn test_parse_marker_list_non_finite() {
        let markers = parse_marker_list("nan nan 3\ninf 5 4\n7 -inf 5\n12.5 8 6\n");
        assert_eq!(markers, vec![Marker::new(6, 12.5, 8.0)]);
    }

    #[test]
    fn test_marker_list_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "# markers")?;
        writeln!(file, "15.0 16.0 1")?;
        writeln!(file, "115.0 16.0 2")?;

        let mut source = MarkerListFile::new(file.path());
        let markers = source.acquire()?;
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].position, [115.0, 16.0]);
        Ok(())
    }

    #[test]
    fn test_marker_list_file_missing() {
        let mut source = MarkerListFile::new("/nonexistent/markers.txt");
        assert!(matches!(source.acquire(), Err(MarkerSourceError::Io(_))));
    }

    #[test]
    fn test_acquire_first_available() {
        let mut sources: Vec<Box<dyn MarkerSource>> = vec![
            Box::new(Failing),
            Box::new(ManualEntry::default()),
            Box::new(ManualEntry::new(vec![Marker::new(9, 1.0, 2.0)])),
        ];

        let (kind, markers) = acquire_first_available(&mut sources).unwrap();
        assert_eq!(kind, MarkerSourceKind::ManualEntry);
        assert_eq!(markers, vec![Marker::new(9, 1.0, 2.0)]);

        let mut empty: Vec<Box<dyn MarkerSource>> = vec![Box::new(Failing)];
        assert!(acquire_first_available(&mut empty).is_none());
    }
}
