pub mod traits;
pub mod dyn_encoder;

pub use traits::CallArg;
pub use dyn_encoder::DynAbiEncoder;
