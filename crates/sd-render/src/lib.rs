pub mod canvas;
pub mod hit;
pub mod paint;
pub mod text;

pub use canvas::Canvas;
pub use paint::RenderOptions;
