pub mod capture;
pub mod overlay;
pub mod pipeline;
pub mod shared;
pub mod sync;
pub mod tracking;
