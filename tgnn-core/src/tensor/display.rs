//! Nested-bracket rendering of values and gradients.
//!
//! The innermost axis prints as `[1.0000 2.0000]`; each outer level wraps its
//! blocks in brackets and separates siblings with `rank - depth - 1` newlines,
//! so matrices print one row per line and 3-d blocks are split by a blank line.

use std::fmt;

use super::Tensor;
use crate::autograd::{ScalarNode, Var};

impl Tensor {
    /// Renders gradients in the same layout as `Display` renders values.
    pub fn grad_string(&self) -> String {
        self.render(Var::grad)
    }

    fn render(&self, cell: fn(&Var) -> f64) -> String {
        let mut out = String::new();
        let strides = self.shape.strides();
        self.render_block(&mut out, &strides, 0, 0, cell);
        out
    }

    fn render_block(
        &self,
        out: &mut String,
        strides: &[usize],
        depth: usize,
        base: usize,
        cell: fn(&Var) -> f64,
    ) {
        let size = self.dims()[depth];
        out.push('[');
        if depth + 1 == self.rank() {
            for i in 0..size {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&format!("{:.4}", cell(&self.data[base + i])));
            }
        } else {
            let sep = "\n".repeat(self.rank() - depth - 1);
            for i in 0..size {
                if i > 0 {
                    out.push_str(&sep);
                }
                self.render_block(out, strides, depth + 1, base + i * strides[depth], cell);
            }
        }
        out.push(']');
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Var::value))
    }
}
