use serde::Serialize;

/// How many rows came from the source and how many were generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResolutionStats {
    pub found: usize,
    pub generated: usize,
}

/// Row-major `rows x dims` matrix of `f32` weights; row `i` belongs to vocabulary word `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    dims: usize,
    data: Vec<f32>,
    stats: ResolutionStats,
}

impl EmbeddingMatrix {
    pub(crate) fn with_capacity(rows: usize, dims: usize) -> Self {
        Self {
            dims,
            data: Vec::with_capacity(rows * dims),
            stats: ResolutionStats::default(),
        }
    }

    pub(crate) fn push_found(&mut self, row: &[f32]) {
        debug_assert_eq!(row.len(), self.dims);
        self.data.extend_from_slice(row);
        self.stats.found += 1;
    }

    pub(crate) fn push_generated(&mut self, row: Vec<f32>) {
        debug_assert_eq!(row.len(), self.dims);
        self.data.extend(row);
        self.stats.generated += 1;
    }

    pub fn rows(&self) -> usize {
        if self.dims == 0 {
            self.stats.found + self.stats.generated
        } else {
            self.data.len() / self.dims
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.dims)
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    pub fn row(&self, idx: usize) -> Option<&[f32]> {
        if idx >= self.rows() {
            return None;
        }
        let start = idx * self.dims;
        Some(&self.data[start..start + self.dims])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows()).filter_map(move |i| self.row(i))
    }

    /// The flat row-major buffer, ready to hand to an embedding layer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_rows(self) -> Vec<Vec<f32>> {
        if self.dims == 0 {
            return vec![Vec::new(); self.rows()];
        }
        self.data.chunks(self.dims).map(<[f32]>::to_vec).collect()
    }
}

impl Serialize for EmbeddingMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter_rows())
    }
}
