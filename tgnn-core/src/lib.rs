//! # tgnn-core
//!
//! Scalar reverse-mode autodiff with an N-dimensional tensor built from scalar
//! nodes: restricted broadcasting, batched matmul, slicing and softmax.
//!
//! ```
//! use tgnn_core::{functions::log_softmax, ScalarNode, Tensor};
//!
//! let logits = Tensor::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let out = log_softmax(&logits, 0).unwrap();
//! out.at(&[0]).unwrap().backward();
//! assert!(logits.grad()[0] > 0.0);
//! ```

pub mod autograd;
pub mod config;
pub mod data;
pub mod error;
pub mod functions;
pub mod optim;
pub mod shape;
pub mod tensor;

pub use autograd::{ScalarNode, Var};
pub use error::{ErrorKind, Result, TensorError};
pub use shape::Shape;
pub use tensor::Tensor;
