pub mod constants;
pub mod elements;
mod kepler;
pub mod observer;
pub mod pass_search;
pub mod passes;
pub mod propagation;
pub mod ref_frame;
pub mod satpass;
pub mod satpass_errors;
pub mod time;
pub mod visibility;
