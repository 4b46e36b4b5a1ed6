pub mod image;
pub mod progress;
pub mod tensor;
pub mod visualization;
