//! Reference extractors, one per league upstream.

mod nll;
mod pll;
mod wll;

pub use nll::NllExtractor;
pub use pll::PllExtractor;
pub use wll::WllExtractor;
