//! Point set sources.
//!
//! A [`PointSetLoader`] turns a data source identifier (a file path, a table
//! name, an image id) into a [`PointSet`] already in physical units.

use crate::error::Result;
use crate::point_set::PointSet;

/// Produces point sets in microns from some external source.
///
/// Implementations own unit conversion; the analysis never rescales points.
pub trait PointSetLoader {
    /// Loads the points identified by `source`.
    fn load(&self, source: &str) -> Result<PointSet>;

    /// Loads several sources, keeping the first error.
    fn load_all(&self, sources: &[&str]) -> Result<Vec<PointSet>> {
        sources.iter().map(|s| self.load(s)).collect()
    }
}

impl<F> PointSetLoader for F
where
    F: Fn(&str) -> Result<PointSet>,
{
    fn load(&self, source: &str) -> Result<PointSet> {
        self(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PorescopeError;

    #[test]
    fn test_closure_loader() {
        let loader = |source: &str| -> Result<PointSet> {
            match source {
                "tiny" => Ok(PointSet::from_xyz([[0.0, 0.0, 1.0]])),
                other => Err(PorescopeError::InvalidParameter(other.to_string())),
            }
        };
        assert_eq!(loader.load("tiny").unwrap().len(), 1);
        assert!(loader.load_all(&["tiny", "missing"]).is_err());
        assert_eq!(loader.load_all(&["tiny", "tiny"]).unwrap().len(), 2);
    }
}
