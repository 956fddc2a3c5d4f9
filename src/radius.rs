use std::collections::BTreeMap;

use crate::calculators::{ScalarCalculator, UnboundedCalculator};
use crate::error::{DiagramError, Result};
use crate::tree::GitFile;

/// Turns file sizes into circle radii, keyed by file path
pub trait FileRadiusCalculator {
    /// Radii for a whole diagram. Call once per layout pass so every radius
    /// shares the same global minimum.
    fn radii(&self, files: &[&GitFile]) -> Result<BTreeMap<String, u64>>;

    fn radius_for(&self, file: &GitFile, all_files: &[&GitFile]) -> Result<u64> {
        self.radii(all_files)?
            .get(&file.path)
            .copied()
            .ok_or_else(|| DiagramError::UnknownFile(file.path.clone()))
    }
}

/// Radius grows linearly with size; the smallest file gets the base unit.
///
/// Empty files count as one byte. Radii too large for `u64` saturate, and the
/// layout reports the resulting overflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnboundedFileRadiusCalculator {
    calculator: UnboundedCalculator,
}

impl FileRadiusCalculator for UnboundedFileRadiusCalculator {
    fn radii(&self, files: &[&GitFile]) -> Result<BTreeMap<String, u64>> {
        let batch: Vec<(String, f64)> = files
            .iter()
            .map(|file| (file.path.clone(), file.size as f64))
            .collect();

        Ok(self
            .calculator
            .calculate(&batch)?
            .into_iter()
            .map(|(path, radius)| (path, radius.round() as u64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::GitTree;
    use proptest::prelude::*;

    fn tree_of(files: &[(&str, u64)]) -> GitTree {
        let mut tree = GitTree::new();
        for (path, size) in files {
            tree.add_file(path, *size, Vec::new()).unwrap();
        }
        tree
    }

    #[test]
    fn test_empty_files_count_as_one_byte() {
        // Not scale invariant at zero: {0, 1} and {0, 2} differ only in the
        // non-empty file, yet the empty file stays at the base radius
        let radii = |sizes: &[(&str, u64)]| {
            let tree = tree_of(sizes);
            UnboundedFileRadiusCalculator::default()
                .radii(&tree.files().collect::<Vec<_>>())
                .unwrap()
        };

        let one = radii(&[("empty.rs", 0), ("small.rs", 1)]);
        assert_eq!((one["empty.rs"], one["small.rs"]), (10, 10));

        let two = radii(&[("empty.rs", 0), ("small.rs", 2)]);
        assert_eq!((two["empty.rs"], two["small.rs"]), (10, 20));
    }

    #[test]
    fn test_oversized_radius_saturates() {
        let tree = tree_of(&[("tiny.rs", 1), ("huge.bin", u64::MAX)]);
        let radii = UnboundedFileRadiusCalculator::default()
            .radii(&tree.files().collect::<Vec<_>>())
            .unwrap();

        assert_eq!(radii["tiny.rs"], 10);
        assert_eq!(radii["huge.bin"], u64::MAX);
    }

    #[test]
    fn test_radius_relative_to_global_minimum() {
        let tree = tree_of(&[
            ("README.md", 50),
            ("src/Program.cs", 100),
            ("src/deep/nested/Big.cs", 500),
        ]);
        let files: Vec<&GitFile> = tree.files().collect();
        let radii = UnboundedFileRadiusCalculator::default().radii(&files).unwrap();

        assert_eq!(radii["README.md"], 10);
        assert_eq!(radii["src/Program.cs"], 20);
        assert_eq!(radii["src/deep/nested/Big.cs"], 100);
    }

    #[test]
    fn test_radius_for_single_file() {
        let tree = tree_of(&[("Program.cs", 100), ("App.cs", 50)]);
        let files: Vec<&GitFile> = tree.files().collect();
        let calculator = UnboundedFileRadiusCalculator::default();

        assert_eq!(calculator.radius_for(files[0], &files).unwrap(), 20);
        assert_eq!(calculator.radius_for(files[1], &files).unwrap(), 10);
    }

    #[test]
    fn test_radius_for_file_outside_batch() {
        let tree = tree_of(&[("Program.cs", 100), ("App.cs", 50)]);
        let files: Vec<&GitFile> = tree.files().collect();
        let calculator = UnboundedFileRadiusCalculator::default();

        let result = calculator.radius_for(files[0], &files[1..]);
        assert!(matches!(result, Err(DiagramError::UnknownFile(_))));
    }

    #[test]
    fn test_empty_diagram_is_an_error() {
        let result = UnboundedFileRadiusCalculator::default().radii(&[]);
        assert!(matches!(result, Err(DiagramError::EmptyBatch)));
    }

    proptest! {
        #[test]
        fn prop_radii_ignore_absolute_magnitude(
            sizes in prop::collection::vec(1u64..100_000, 1..20),
            factor in 1u64..10_000,
        ) {
            let paths: Vec<String> = (0..sizes.len())
                .map(|i| format!("dir{}/file{}.rs", i % 3, i))
                .collect();
            let base_sizes: Vec<(&str, u64)> =
                paths.iter().map(String::as_str).zip(sizes.iter().copied()).collect();
            let scaled_sizes: Vec<(&str, u64)> =
                base_sizes.iter().map(|&(path, size)| (path, size * factor)).collect();
            let original = tree_of(&base_sizes);
            let scaled = tree_of(&scaled_sizes);

            let calculator = UnboundedFileRadiusCalculator::default();
            let a = calculator.radii(&original.files().collect::<Vec<_>>()).unwrap();
            let b = calculator.radii(&scaled.files().collect::<Vec<_>>()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
