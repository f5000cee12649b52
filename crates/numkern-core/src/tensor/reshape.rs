//! Shape manipulation: reshape and flatten.

use crate::dtype::Element;
use crate::error::{CoreError, Result};

use super::{Tensor, compute_strides};

impl<T: Element> Tensor<T> {
    /// Reshape the tensor to a new shape without copying data.
    ///
    /// The total number of elements must remain the same.
    pub fn reshape(mut self, new_shape: Vec<usize>) -> Result<Self> {
        let new_numel: usize = new_shape.iter().product();
        if new_numel != self.numel() {
            return Err(CoreError::InvalidShape {
                shape: new_shape,
                reason: "new shape has different number of elements",
            });
        }
        self.strides = compute_strides(&new_shape);
        self.shape = new_shape;
        Ok(self)
    }

    /// Return a reshaped copy without consuming the tensor.
    pub fn reshaped(&self, new_shape: Vec<usize>) -> Result<Self> {
        self.clone().reshape(new_shape)
    }

    /// Flatten the tensor into a 1-D tensor (consumes self, no copy).
    pub fn flatten(self) -> Self {
        let n = self.numel();
        Tensor {
            data: self.data,
            shape: vec![n],
            strides: vec![1],
        }
    }
}
