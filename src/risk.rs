use crate::error::Result;
use crate::tree::{check_risk_index, GitFile, GitTree};

/// Scores a file's history. Higher means riskier.
pub trait CodeQualityAnalyst {
    fn evaluate(&self, file: &GitFile) -> f64;
}

impl<F> CodeQualityAnalyst for F
where
    F: Fn(&GitFile) -> f64,
{
    fn evaluate(&self, file: &GitFile) -> f64 {
        self(file)
    }
}

impl GitTree {
    /// Score every file with `analyst` and store the result as its risk index.
    ///
    /// Runs between ingestion and layout. Every score is checked before any is
    /// stored, so an invalid score leaves the tree unchanged.
    pub fn annotate_risk<A: CodeQualityAnalyst + ?Sized>(&mut self, analyst: &A) -> Result<()> {
        let scores: Vec<(String, f64)> = self
            .files()
            .map(|file| (file.path.clone(), analyst.evaluate(file)))
            .collect();
        for (path, score) in &scores {
            check_risk_index(path, *score)?;
        }

        for (path, score) in scores {
            self.set_risk_index(&path, score)?;
        }
        tracing::debug!(files = self.len(), "annotated risk indexes");
        Ok(())
    }
}
