use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};

use crate::channel::{Channel, ChannelDescriptor, ChannelSet, ChannelSource, ConstantDeclaration};
use crate::config::LoaderConfig;
use crate::error::{Result, SyncError};

/// Supplies the raw bytes of a channel file
pub trait SampleSource {
    fn read(&self, file: &Path) -> io::Result<Vec<u8>>;
}

/// Reads channel files from disk, resolving relative paths against a root
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SampleSource for FileSystemSource {
    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(file))
    }
}

/// Serves channel files from memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(file.into(), contents.into());
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(file, contents);
        self
    }
}

impl SampleSource for MemorySource {
    fn read(&self, file: &Path) -> io::Result<Vec<u8>> {
        self.files.get(file).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not in memory source", file.display()),
            )
        })
    }
}

/// Reads every recorded channel of a dataset and sorts its samples
pub struct SeriesLoader {
    config: LoaderConfig,
}

impl SeriesLoader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Load one channel per recorded descriptor; constant descriptors become
    /// declarations.
    pub fn load(
        &self,
        descriptors: &[ChannelDescriptor],
        source: &dyn SampleSource,
    ) -> Result<ChannelSet> {
        let mut set = ChannelSet::default();

        for descriptor in descriptors {
            match &descriptor.source {
                ChannelSource::File(file) => {
                    let bytes = source.read(file).map_err(|e| SyncError::Io {
                        file: file.clone(),
                        source: e,
                    })?;
                    let pairs = self.parse(file, &bytes)?;
                    log::debug!(
                        "Loaded {} samples of {} from {}",
                        pairs.len(),
                        descriptor.dependent,
                        file.display()
                    );
                    set.channels.push(Channel::from_pairs(
                        file.display().to_string(),
                        descriptor.independent,
                        descriptor.dependent,
                        pairs,
                    )?);
                }
                ChannelSource::Constant(value) => {
                    set.constants.push(ConstantDeclaration {
                        quantity: descriptor.dependent,
                        value: *value,
                    });
                }
            }
        }

        Ok(set)
    }

    /// Parse two-column numeric text into (independent, dependent) pairs, in
    /// file order.
    pub fn parse(&self, file: &Path, bytes: &[u8]) -> Result<Vec<(f32, f32)>> {
        let delimiter = match self.config.delimiter {
            Some(c) => delimiter_byte(file, c)?,
            None => detect_delimiter(bytes),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(self.config.has_header)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .delimiter(delimiter)
            .from_reader(bytes);

        let mut pairs = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| SyncError::MalformedData {
                file: file.to_path_buf(),
                line: e.position().map_or(0, |p| p.line()),
                reason: e.to_string(),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            // Repeated whitespace delimiters yield empty fields
            let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != 2 {
                return Err(SyncError::MalformedData {
                    file: file.to_path_buf(),
                    line,
                    reason: format!("expected 2 columns, found {}", fields.len()),
                });
            }

            let x = parse_value(file, line, fields[0])?;
            let y = parse_value(file, line, fields[1])?;
            pairs.push((x, y));
        }

        Ok(pairs)
    }
}

fn parse_value(file: &Path, line: u64, field: &str) -> Result<f32> {
    match field.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SyncError::MalformedData {
            file: file.to_path_buf(),
            line,
            reason: format!("'{}' is not a finite number", field),
        }),
    }
}

fn delimiter_byte(file: &Path, c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(|b| b.is_ascii())
        .ok_or_else(|| {
            SyncError::Config(format!(
                "delimiter {:?} for {} is not a single ASCII character",
                c,
                file.display()
            ))
        })
}

/// Pick the delimiter from the first line that is neither blank nor a comment.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let first = bytes
        .split(|&b| b == b'\n')
        .map(|line| line.trim_ascii())
        .find(|line| !line.is_empty() && !line.starts_with(b"#"));

    match first {
        Some(line) if line.contains(&b',') => b',',
        Some(line) if line.contains(&b';') => b';',
        Some(line) if line.contains(&b'\t') => b'\t',
        _ => b' ',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Quantity;

    fn loader() -> SeriesLoader {
        SeriesLoader::new(&LoaderConfig::default())
    }

    #[test]
    fn test_parse_comma_separated() {
        let pairs = loader()
            .parse(Path::new("a.csv"), b"0,0\n1,1.5\n2,3\n")
            .unwrap();
        assert_eq!(pairs, vec![(0.0, 0.0), (1.0, 1.5), (2.0, 3.0)]);
    }

    #[test]
    fn test_parse_whitespace_and_comments() {
        let text = b"# time force\n0.0   1.0\n\n0.5\t 2.0\n1.0    3.0\n";
        let pairs = loader().parse(Path::new("a.txt"), text).unwrap();
        assert_eq!(pairs, vec![(0.0, 1.0), (0.5, 2.0), (1.0, 3.0)]);
    }

    #[test]
    fn test_parse_semicolon() {
        let pairs = loader().parse(Path::new("a.csv"), b"0;1\n1;2\n").unwrap();
        assert_eq!(pairs, vec![(0.0, 1.0), (1.0, 2.0)]);
    }

    #[test]
    fn test_parse_with_header() {
        let loader = SeriesLoader::new(&LoaderConfig {
            has_header: true,
            delimiter: Some(','),
        });
        let pairs = loader
            .parse(Path::new("a.csv"), b"time,force\n0,1\n1,2\n")
            .unwrap();
        assert_eq!(pairs, vec![(0.0, 1.0), (1.0, 2.0)]);
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = loader()
            .parse(Path::new("a.csv"), b"0,0\n1,abc\n")
            .unwrap_err();
        match err {
            SyncError::MalformedData { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_wrong_column_count() {
        let err = loader()
            .parse(Path::new("a.csv"), b"0,0\n1,2,3\n")
            .unwrap_err();
        assert!(matches!(err, SyncError::MalformedData { .. }));
    }

    #[test]
    fn test_parse_rejects_nan() {
        let err = loader().parse(Path::new("a.csv"), b"0,NaN\n1,2\n").unwrap_err();
        assert!(matches!(err, SyncError::MalformedData { .. }));
    }

    #[test]
    fn test_load_sorts_channels() {
        let source = MemorySource::new().with_file("f.csv", "2,20\n0,0\n1,10\n");
        let descriptors = vec![
            ChannelDescriptor::recorded(Quantity::ForceX, Quantity::Time, "f.csv"),
            ChannelDescriptor::constant(Quantity::VelocityX, Quantity::Time, 2.0),
        ];

        let set = loader().load(&descriptors, &source).unwrap();
        assert_eq!(set.channels.len(), 1);
        let channel = &set.channels[0];
        assert!(channel.x().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(channel.y(), &[0.0, 10.0, 20.0]);
        assert_eq!(
            set.constants,
            vec![ConstantDeclaration {
                quantity: Quantity::VelocityX,
                value: 2.0
            }]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let descriptors = vec![ChannelDescriptor::recorded(
            Quantity::ForceX,
            Quantity::Time,
            "missing.csv",
        )];
        let err = loader().load(&descriptors, &MemorySource::new()).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }));
    }

    #[test]
    fn test_load_single_row_channel() {
        let source = MemorySource::new().with_file("f.csv", "0,1\n");
        let descriptors = vec![ChannelDescriptor::recorded(
            Quantity::ForceX,
            Quantity::Time,
            "f.csv",
        )];
        let err = loader().load(&descriptors, &source).unwrap_err();
        assert!(matches!(err, SyncError::InsufficientSamples { .. }));
    }
}
