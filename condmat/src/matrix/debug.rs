use crate::matrix::Matrix;
use std::fmt::{Debug, Formatter, Write};

fn fmt_separated<I, T>(
    iter: &mut I,
    f: &mut Formatter,
    sep: &str,
    fmt: &mut impl FnMut(T, &mut Formatter) -> std::fmt::Result,
    limit: usize,
) -> std::fmt::Result
where
    I: Iterator<Item = T>,
{
    let mut first = true;
    for el in iter.take(limit) {
        if first {
            first = false;
        } else {
            f.write_str(sep)?;
        }
        fmt(el, f)?;
    }
    Ok(())
}

fn fmt_separated_max<I, T>(
    mut iter: I,
    len: usize,
    max: usize,
    f: &mut Formatter,
    sep: &str,
    fmt: &mut impl FnMut(T, &mut Formatter) -> std::fmt::Result,
) -> std::fmt::Result
where
    I: Iterator<Item = T>,
{
    if len > max {
        let limit = max / 2;
        let to_skip = len - (limit * 2);
        fmt_separated(&mut iter, f, sep, fmt, limit)?;
        f.write_str(sep)?;
        write!(f, "...({to_skip} hidden)")?;
        f.write_str(sep)?;
        iter.nth(to_skip - 1);
        fmt_separated(&mut iter, f, sep, fmt, limit)
    } else {
        fmt_separated(&mut iter, f, sep, fmt, len)
    }
}

const DEBUG_LIMIT_ROWS: usize = 5;
const DEBUG_LIMIT_COLS: usize = 10;

impl<T: Debug> Debug for Matrix<T> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_char('[')?;
        if !self.is_empty() {
            f.write_str("\n   ")?;
            fmt_separated_max(self.iter_rows(), self.rows(), DEBUG_LIMIT_ROWS, f, ",\n   ", &mut |row: &[T], f| {
                f.write_char('[')?;
                fmt_separated_max(row.iter(), row.len(), DEBUG_LIMIT_COLS, f, ", ", &mut |el, f| Debug::fmt(el, f))?;
                f.write_char(']')
            })?;
            f.write_char('\n')?;
        }
        f.write_char(']')?;
        write!(f, " dtype={} dims={} len={}", std::any::type_name::<T>(), self.dims(), self.len())
    }
}

#[cfg(test)]
mod test {
    use crate::matrix::{Dim2, Matrix};

    #[test]
    fn test_empty() {
        assert_eq!("[] dtype=f64 dims=(0, 0) len=0", format!("{:?}", Matrix::<f64>::zeroed(Dim2(0, 0))));
    }

    #[test]
    fn test_small() {
        assert_eq!(
            "[\n   [1, 2],\n   [3, 4]\n] dtype=i32 dims=(2, 2) len=4",
            format!("{:?}", crate::matrix![[1, 2], [3, 4]])
        );
    }

    #[test]
    fn test_large() {
        let a = Matrix::from_vec((0..200).collect(), (10, 20));
        let expected = r#"[
   [0, 1, 2, 3, 4, ...(10 hidden), 15, 16, 17, 18, 19],
   [20, 21, 22, 23, 24, ...(10 hidden), 35, 36, 37, 38, 39],
   ...(6 hidden),
   [160, 161, 162, 163, 164, ...(10 hidden), 175, 176, 177, 178, 179],
   [180, 181, 182, 183, 184, ...(10 hidden), 195, 196, 197, 198, 199]
] dtype=i32 dims=(10, 20) len=200"#;
        assert_eq!(expected, format!("{a:?}"))
    }
}
