use approx::assert_relative_eq;
use condmat::config::SamplingConfig;
use condmat::driver::{generate_multi, generate_single, verify, SizeOutcome};
use condmat::fixtures::{read_matrix_file, FixtureSet, FixtureWriter, Layout};
use condmat::generator::PairGenerator;
use condmat::schedule::ThresholdSchedule;
use condmat::Error;
use std::fs;
use std::path::Path;

fn generator(seed: u64) -> PairGenerator {
    PairGenerator::seed_from_u64(seed, &SamplingConfig::default(), Some(1000)).unwrap()
}

fn assert_grid(path: &Path, width: usize) {
    let text = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), width, "{}", path.display());
    for line in lines {
        let tokens: Vec<&str> = line.split(' ').collect();
        assert_eq!(tokens.len(), width, "{}: {line:?}", path.display());
        for token in tokens {
            token.parse::<f64>().unwrap();
        }
    }
}

#[test]
fn single_width_three_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let files = generate_single(&mut generator(42), 3, 1.0e9, &FixtureWriter::new(first.path(), Layout::Single)).unwrap();
    generate_single(&mut generator(42), 3, 1.0e9, &FixtureWriter::new(second.path(), Layout::Single)).unwrap();

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["m_1.dat", "m_2.dat", "matmul.dat"]);
    for file in &files {
        assert_grid(file, 3);
        let other = second.path().join(file.file_name().unwrap());
        assert_eq!(fs::read_to_string(file).unwrap(), fs::read_to_string(other).unwrap());
    }

    // eighteen decimals round-trip exactly
    let set = FixtureSet::load(first.path(), Layout::Single, 3).unwrap();
    assert_eq!(set.product, set.m1.matmul(&set.m2));
    assert!(set.m2_transposed.is_none());
}

#[test]
fn multi_size_writes_transposes() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FixtureWriter::new(dir.path(), Layout::PerWidth);
    let steps = ThresholdSchedule::default().steps(&[2, 5, 8]);
    let reports = generate_multi(&mut generator(7), &steps, &writer).unwrap();
    assert_eq!(reports.len(), 3);

    for report in &reports {
        let width = report.step.width;
        let SizeOutcome::Written { files, condition, .. } = &report.outcome else {
            panic!("width {width} was skipped");
        };
        assert!(*condition < report.step.threshold);
        assert_eq!(files.len(), 5);
        for file in files {
            assert_grid(file, width);
        }

        let set = FixtureSet::load(dir.path(), Layout::PerWidth, width).unwrap();
        assert_eq!(set.m2_transposed.unwrap(), set.m2.transpose());
        assert_eq!(set.product_transposed.unwrap(), set.product.transpose());
        for (&p, &e) in set.product.iter().zip(&set.m1.matmul(&set.m2)) {
            assert_relative_eq!(p, e, max_relative = 1e-6);
        }
    }
    assert!(dir.path().join("matmul_8t.dat").exists());
    assert!(dir.path().join("m_2_5t.dat").exists());
}

#[test]
fn zero_width_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let err = generate_single(&mut generator(1), 0, 1.0e9, &FixtureWriter::new(&out, Layout::Single)).unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));
    assert!(!out.exists());
}

#[test]
fn multi_size_leaves_gap_for_invalid_width() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FixtureWriter::new(dir.path(), Layout::PerWidth);
    let steps = ThresholdSchedule::default().steps(&[0, 3]);
    let reports = generate_multi(&mut generator(11), &steps, &writer).unwrap();

    assert!(matches!(reports[0].outcome, SizeOutcome::Skipped(Error::InvalidShape(_))));
    assert!(matches!(reports[1].outcome, SizeOutcome::Written { .. }));
    // the second width keeps its own threshold
    assert_eq!(reports[1].step.threshold, 5.0e8);
    assert!(!dir.path().join("m_1_0.dat").exists());
    assert_eq!(read_matrix_file(dir.path().join("m_1_3.dat"), 3).unwrap().rows(), 3);
}

#[test]
fn verify_detects_tampering() {
    let dir = tempfile::tempdir().unwrap();
    let writer = FixtureWriter::new(dir.path(), Layout::PerWidth);
    generate_multi(&mut generator(3), &ThresholdSchedule::default().steps(&[4]), &writer).unwrap();

    let set = FixtureSet::load(dir.path(), Layout::PerWidth, 4).unwrap();
    let report = verify(&set, 1e-6);
    assert!(report.is_ok(), "{report:?}");

    let mut tampered = set.clone();
    tampered.product_transposed = Some(set.product.clone());
    assert_eq!(verify(&tampered, 1e-6).transposes_match, Some(false));

    let mut tampered = set.clone();
    tampered.product[(1, 2)] *= 1.01;
    let report = verify(&tampered, 1e-6);
    assert!(!report.product_matches);
    assert!(report.max_relative_error > 1e-3, "{report:?}");
    assert!(!report.is_ok());
}
