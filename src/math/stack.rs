use rand::Rng;
use std::ops::{Index, IndexMut};

/// Number of parameter layers between the three activation layers.
pub const PARAM_LAYERS: usize = 2;

/// Two row-major matrices packed into one contiguous buffer.
///
/// Element `(layer, from, to)` lives at `offsets[layer] + from * cols + to`.
/// Weights use shapes `(input, hidden)` and `(hidden, output)`; biases use
/// `(1, hidden)` and `(1, output)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    data: Vec<f64>,
    offsets: [usize; PARAM_LAYERS],
    shapes: [(usize, usize); PARAM_LAYERS],
}

impl LayerStack {
    pub fn zeros(shapes: [(usize, usize); PARAM_LAYERS]) -> LayerStack {
        let first = shapes[0].0 * shapes[0].1;
        let second = shapes[1].0 * shapes[1].1;
        LayerStack {
            data: vec![0.0; first + second],
            offsets: [0, first],
            shapes,
        }
    }

    /// Uniform values in `[-0.5, 0.5)`, drawn layer by layer, row by row.
    pub fn random<R: Rng + ?Sized>(shapes: [(usize, usize); PARAM_LAYERS], rng: &mut R) -> LayerStack {
        let mut res = LayerStack::zeros(shapes);
        for x in res.data.iter_mut() {
            *x = rng.gen::<f64>() - 0.5;
        }
        res
    }

    /// Packs nested per-layer rows. Every row of a layer must have the same width.
    pub fn from_nested(layers: &[Vec<Vec<f64>>]) -> Option<LayerStack> {
        if layers.len() != PARAM_LAYERS {
            return None;
        }
        let mut shapes = [(0, 0); PARAM_LAYERS];
        for (shape, rows) in shapes.iter_mut().zip(layers) {
            let cols = rows.first().map_or(0, Vec::len);
            if rows.iter().any(|row| row.len() != cols) {
                return None;
            }
            *shape = (rows.len(), cols);
        }
        let data = layers.iter().flatten().flatten().copied().collect();
        Some(LayerStack {
            data,
            offsets: [0, shapes[0].0 * shapes[0].1],
            shapes,
        })
    }

    pub fn to_nested(&self) -> Vec<Vec<Vec<f64>>> {
        (0..PARAM_LAYERS)
            .map(|layer| {
                let cols = self.shapes[layer].1;
                if cols == 0 {
                    return vec![Vec::new(); self.shapes[layer].0];
                }
                self.layer(layer).chunks(cols).map(<[f64]>::to_vec).collect()
            })
            .collect()
    }

    pub fn shape(&self, layer: usize) -> (usize, usize) {
        self.shapes[layer]
    }

    pub fn shapes(&self) -> [(usize, usize); PARAM_LAYERS] {
        self.shapes
    }

    /// All values of one layer, row-major.
    pub fn layer(&self, layer: usize) -> &[f64] {
        let (rows, cols) = self.shapes[layer];
        let start = self.offsets[layer];
        &self.data[start..start + rows * cols]
    }

    pub fn layer_mut(&mut self, layer: usize) -> &mut [f64] {
        let (rows, cols) = self.shapes[layer];
        let start = self.offsets[layer];
        &mut self.data[start..start + rows * cols]
    }

    /// Outgoing values of neuron `from` in `layer`.
    pub fn row(&self, layer: usize, from: usize) -> &[f64] {
        let cols = self.shapes[layer].1;
        let start = self.row_start(layer, from);
        &self.data[start..start + cols]
    }

    pub fn row_mut(&mut self, layer: usize, from: usize) -> &mut [f64] {
        let cols = self.shapes[layer].1;
        let start = self.row_start(layer, from);
        &mut self.data[start..start + cols]
    }

    #[inline]
    fn row_start(&self, layer: usize, from: usize) -> usize {
        let (rows, cols) = self.shapes[layer];
        assert!(from < rows, "row {from} out of bounds for layer {layer} with {rows} rows");
        self.offsets[layer] + from * cols
    }

    #[inline]
    fn offset(&self, layer: usize, from: usize, to: usize) -> usize {
        let cols = self.shapes[layer].1;
        assert!(to < cols, "column {to} out of bounds for layer {layer} with {cols} columns");
        self.row_start(layer, from) + to
    }
}

impl Index<(usize, usize, usize)> for LayerStack {
    type Output = f64;

    fn index(&self, (layer, from, to): (usize, usize, usize)) -> &f64 {
        &self.data[self.offset(layer, from, to)]
    }
}

impl IndexMut<(usize, usize, usize)> for LayerStack {
    fn index_mut(&mut self, (layer, from, to): (usize, usize, usize)) -> &mut f64 {
        let at = self.offset(layer, from, to);
        &mut self.data[at]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn indexes_follow_row_major_layout() {
        let mut stack = LayerStack::zeros([(2, 3), (3, 1)]);
        stack[(0, 1, 2)] = 7.0;
        stack[(1, 2, 0)] = -1.5;
        assert_eq!(stack.layer(0), &[0.0, 0.0, 0.0, 0.0, 0.0, 7.0]);
        assert_eq!(stack.row(0, 1), &[0.0, 0.0, 7.0]);
        assert_eq!(stack.layer(1), &[0.0, 0.0, -1.5]);
        assert_eq!(stack.row(1, 2), &[-1.5]);
    }

    #[test]
    fn random_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let stack = LayerStack::random([(16, 8), (8, 4)], &mut rng);
        for layer in 0..PARAM_LAYERS {
            assert!(stack.layer(layer).iter().all(|&x| (-0.5..0.5).contains(&x)));
        }
    }

    #[test]
    fn nested_conversion_keeps_shapes() {
        let nested = vec![
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            vec![vec![7.0], vec![8.0]],
        ];
        let stack = LayerStack::from_nested(&nested).unwrap();
        assert_eq!(stack.shapes(), [(3, 2), (2, 1)]);
        assert_eq!(stack[(0, 2, 1)], 6.0);
        assert_eq!(stack[(1, 1, 0)], 8.0);
        assert_eq!(stack.to_nested(), nested);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let ragged = vec![vec![vec![1.0, 2.0], vec![3.0]], vec![vec![1.0]]];
        assert!(LayerStack::from_nested(&ragged).is_none());
        let one_layer = vec![vec![vec![1.0]]];
        assert!(LayerStack::from_nested(&one_layer).is_none());
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_row_panics() {
        let stack = LayerStack::zeros([(2, 2), (2, 1)]);
        let _ = stack.row(0, 2);
    }
}
