pub mod sdmx;
pub mod testing;
pub mod types;
pub mod util;
