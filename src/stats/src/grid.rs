//! Grid of prior variances (φ², ω²) over which ABFs are averaged.

/// One grid row: φ² is the heterogeneity prior variance, ω² the shared
/// effect prior variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub phi2: f64,
    pub omega2: f64,
}

/// Finite list of (φ², ω²) pairs, marginalized with uniform weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid(Vec<GridPoint>);

impl Grid {
    pub fn new(points: Vec<GridPoint>) -> Self {
        Self(points)
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self(pairs.iter().map(|&(phi2, omega2)| GridPoint { phi2, omega2 }).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridPoint> {
        self.0.iter()
    }

    /// Uniform averaging weights, one per row. They sum to 1 by construction.
    pub fn uniform_weights(&self) -> Vec<f64> {
        vec![1.0 / self.0.len() as f64; self.0.len()]
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a GridPoint;
    type IntoIter = std::slice::Iter<'a, GridPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
