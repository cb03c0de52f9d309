// Model inference — trait-based abstraction over the scoring backend.
//
// The ToxicityModel trait defines the contract; OnnxModel implements it with
// a local ONNX session. Anything that maps fixed-length id sequences to
// per-sequence probabilities satisfies the contract, which is also what
// makes the prediction service testable without a model artifact.

pub mod onnx;
pub mod traits;

pub use onnx::OnnxModel;
pub use traits::ToxicityModel;
