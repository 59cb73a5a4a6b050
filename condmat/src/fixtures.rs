//! Flat text fixtures: one matrix row per line, values separated by a space.

use crate::error::{Error, Result};
use crate::generator::ConditionedPair;
use crate::matrix::{Dim2, Matrix};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FloatFormat {
    /// `%.18e`, e.g. `1.250000000000000000e+01`
    Scientific,
    /// `%lf`, six decimals
    Fixed,
}

impl FloatFormat {
    pub fn format_into(&self, buf: &mut String, value: f64) {
        if !value.is_finite() {
            buf.push_str(if value.is_nan() {
                "nan"
            } else if value > 0.0 {
                "inf"
            } else {
                "-inf"
            });
            return;
        }
        match self {
            FloatFormat::Fixed => {
                let _ = write!(buf, "{value:.6}");
            }
            FloatFormat::Scientific => {
                let start = buf.len();
                let _ = write!(buf, "{value:.18e}");
                // rust writes `e1` / `e-5`, C writes `e+01` / `e-05`
                let Some(pos) = buf[start..].find('e') else { return };
                let exp: i32 = match buf[start + pos + 1..].parse() {
                    Ok(exp) => exp,
                    Err(_) => return,
                };
                buf.truncate(start + pos + 1);
                buf.push(if exp < 0 { '-' } else { '+' });
                let _ = write!(buf, "{:02}", exp.unsigned_abs());
            }
        }
    }
}

/// File naming scheme of a fixture set.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layout {
    /// `m_1.dat`, `m_2.dat`, `matmul.dat`
    Single,
    /// `m_1_{w}.dat`, `m_2_{w}.dat`, `matmul_{w}.dat` plus the transposes
    /// `m_2_{w}t.dat` and `matmul_{w}t.dat`
    PerWidth,
}

impl Layout {
    pub fn default_format(&self) -> FloatFormat {
        match self {
            Layout::Single => FloatFormat::Scientific,
            Layout::PerWidth => FloatFormat::Fixed,
        }
    }

    pub fn kinds(&self) -> &'static [FixtureKind] {
        match self {
            Layout::Single => &[FixtureKind::M1, FixtureKind::M2, FixtureKind::Product],
            Layout::PerWidth => &[
                FixtureKind::M1,
                FixtureKind::M2,
                FixtureKind::Product,
                FixtureKind::M2Transposed,
                FixtureKind::ProductTransposed,
            ],
        }
    }

    pub fn file_name(&self, kind: FixtureKind, width: usize) -> String {
        let stem = match kind {
            FixtureKind::M1 => "m_1",
            FixtureKind::M2 | FixtureKind::M2Transposed => "m_2",
            FixtureKind::Product | FixtureKind::ProductTransposed => "matmul",
        };
        let suffix = match kind {
            FixtureKind::M2Transposed | FixtureKind::ProductTransposed => "t",
            _ => "",
        };
        match self {
            Layout::Single => format!("{stem}{suffix}.dat"),
            Layout::PerWidth => format!("{stem}_{width}{suffix}.dat"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FixtureKind {
    M1,
    M2,
    Product,
    M2Transposed,
    ProductTransposed,
}

pub fn write_matrix<W: Write>(out: &mut W, m: &Matrix<f64>, format: FloatFormat) -> io::Result<()> {
    let mut line = String::new();
    for row in m.iter_rows() {
        line.clear();
        for (j, &x) in row.iter().enumerate() {
            if j > 0 {
                line.push(' ');
            }
            format.format_into(&mut line, x);
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

pub fn write_matrix_file<P: AsRef<Path>>(path: P, m: &Matrix<f64>, format: FloatFormat) -> Result<()> {
    let path = path.as_ref();
    let write = || -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write_matrix(&mut out, m, format)?;
        out.flush()
    };
    write().map_err(|err| Error::file(path, err))
}

/// Reads `width²` whitespace-separated values in row-major order.
pub fn read_matrix<R: BufRead>(reader: R, width: usize) -> Result<Matrix<f64>> {
    if width == 0 {
        return Err(Error::InvalidShape(Dim2(0, 0)));
    }
    let expected = width * width;
    let mut data = Vec::with_capacity(expected);
    'lines: for line in reader.lines() {
        let line = line?;
        for token in line.split_whitespace() {
            if data.len() == expected {
                break 'lines;
            }
            let value = token.parse::<f64>().map_err(|source| Error::ParseFloat {
                token: token.to_owned(),
                source,
            })?;
            data.push(value);
        }
    }
    if data.len() < expected {
        return Err(Error::UnexpectedEof {
            read: data.len(),
            expected,
        });
    }
    Ok(Matrix::from_vec(data, Dim2::square(width)))
}

pub fn read_matrix_file<P: AsRef<Path>>(path: P, width: usize) -> Result<Matrix<f64>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| Error::file(path, err))?;
    read_matrix(BufReader::new(file), width).map_err(|err| match err {
        Error::Io(source) => Error::file(path, source),
        other => other,
    })
}

/// Writes accepted pairs into a directory.
#[derive(Clone, Debug)]
pub struct FixtureWriter {
    dir: PathBuf,
    layout: Layout,
    format: FloatFormat,
}

impl FixtureWriter {
    pub fn new<P: Into<PathBuf>>(dir: P, layout: Layout) -> Self {
        FixtureWriter {
            dir: dir.into(),
            layout,
            format: layout.default_format(),
        }
    }

    pub fn with_format(mut self, format: FloatFormat) -> Self {
        self.format = format;
        self
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn path_of(&self, kind: FixtureKind, width: usize) -> PathBuf {
        self.dir.join(self.layout.file_name(kind, width))
    }

    /// Writes every file of the layout, returning the paths in layout order.
    pub fn write(&self, pair: &ConditionedPair) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir).map_err(|err| Error::file(&self.dir, err))?;
        let width = pair.width();
        let mut written = Vec::with_capacity(self.layout.kinds().len());
        for &kind in self.layout.kinds() {
            let path = self.path_of(kind, width);
            log::info!("writing {}", path.display());
            match kind {
                FixtureKind::M1 => write_matrix_file(&path, &pair.m1, self.format)?,
                FixtureKind::M2 => write_matrix_file(&path, &pair.m2, self.format)?,
                FixtureKind::Product => write_matrix_file(&path, &pair.product, self.format)?,
                FixtureKind::M2Transposed => write_matrix_file(&path, &pair.m2.transpose(), self.format)?,
                FixtureKind::ProductTransposed => write_matrix_file(&path, &pair.product.transpose(), self.format)?,
            }
            written.push(path);
        }
        Ok(written)
    }
}

/// A fixture set read back from disk.
#[derive(Clone, Debug)]
pub struct FixtureSet {
    pub width: usize,
    pub m1: Matrix<f64>,
    pub m2: Matrix<f64>,
    pub product: Matrix<f64>,
    pub m2_transposed: Option<Matrix<f64>>,
    pub product_transposed: Option<Matrix<f64>>,
}

impl FixtureSet {
    pub fn load<P: AsRef<Path>>(dir: P, layout: Layout, width: usize) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |kind| read_matrix_file(dir.join(layout.file_name(kind, width)), width);
        let (m2_transposed, product_transposed) = match layout {
            Layout::Single => (None, None),
            Layout::PerWidth => (
                Some(read(FixtureKind::M2Transposed)?),
                Some(read(FixtureKind::ProductTransposed)?),
            ),
        };
        Ok(FixtureSet {
            width,
            m1: read(FixtureKind::M1)?,
            m2: read(FixtureKind::M2)?,
            product: read(FixtureKind::Product)?,
            m2_transposed,
            product_transposed,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fmt(format: FloatFormat, value: f64) -> String {
        let mut buf = String::new();
        format.format_into(&mut buf, value);
        buf
    }

    #[test]
    fn test_scientific_format() {
        assert_eq!(fmt(FloatFormat::Scientific, 12.5), "1.250000000000000000e+01");
        // all 19 significant digits of the nearest double, as numpy prints them
        assert_eq!(fmt(FloatFormat::Scientific, 12.345), "1.234500000000000064e+01");
        assert_eq!(fmt(FloatFormat::Scientific, 0.0), "0.000000000000000000e+00");
        assert_eq!(fmt(FloatFormat::Scientific, -4.5e-5), "-4.500000000000000000e-05");
        assert_eq!(fmt(FloatFormat::Scientific, 1.0e120), "1.000000000000000000e+120");
        assert_eq!(fmt(FloatFormat::Scientific, f64::NAN), "nan");
    }

    #[test]
    fn test_fixed_format() {
        assert_eq!(fmt(FloatFormat::Fixed, 12.345), "12.345000");
        assert_eq!(fmt(FloatFormat::Fixed, -0.5), "-0.500000");
        assert_eq!(fmt(FloatFormat::Fixed, f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(Layout::Single.file_name(FixtureKind::M1, 7), "m_1.dat");
        assert_eq!(Layout::Single.file_name(FixtureKind::Product, 7), "matmul.dat");
        assert_eq!(Layout::PerWidth.file_name(FixtureKind::M2, 100), "m_2_100.dat");
        assert_eq!(Layout::PerWidth.file_name(FixtureKind::M2Transposed, 100), "m_2_100t.dat");
        assert_eq!(Layout::PerWidth.file_name(FixtureKind::ProductTransposed, 5000), "matmul_5000t.dat");
        assert_eq!(Layout::Single.kinds().len(), 3);
        assert_eq!(Layout::PerWidth.kinds().len(), 5);
    }

    #[test]
    fn test_write_matrix() {
        let m = crate::matrix![[1.0, 2.5], [-3.0, 4.0]];
        let mut out = Vec::new();
        write_matrix(&mut out, &m, FloatFormat::Fixed).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1.000000 2.500000\n-3.000000 4.000000\n");
    }

    #[test]
    fn test_read_matrix() {
        let text = "1.0 2.5e+00\n-3 4\n";
        let m = read_matrix(text.as_bytes(), 2).unwrap();
        assert_eq!(m, crate::matrix![[1.0, 2.5], [-3.0, 4.0]]);
        // values may wrap across lines, trailing values are ignored
        let m = read_matrix("1 2 3\n4 5".as_bytes(), 2).unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_read_matrix_errors() {
        assert!(matches!(
            read_matrix("1 2 3".as_bytes(), 2),
            Err(Error::UnexpectedEof { read: 3, expected: 4 })
        ));
        assert!(matches!(
            read_matrix("1 x 3 4".as_bytes(), 2),
            Err(Error::ParseFloat { ref token, .. }) if token == "x"
        ));
        assert!(matches!(read_matrix("".as_bytes(), 0), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_fixed_text_reads_back() {
        let m = crate::matrix![[10.123456, 303.0], [52.5, 125.999999]];
        let mut out = Vec::new();
        write_matrix(&mut out, &m, FloatFormat::Fixed).unwrap();
        assert_eq!(read_matrix(out.as_slice(), 2).unwrap(), m);
    }
}
