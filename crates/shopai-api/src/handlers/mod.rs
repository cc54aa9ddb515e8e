mod health;
mod recommend;

pub use health::*;
pub use recommend::*;
