pub mod api;
pub mod color;
pub mod config;
pub mod history;
pub mod palette;
pub mod session;
pub mod store;
pub mod templates;

pub use color::{Color, CopyFormat, Hsl, Rgb, convert, hex_to_rgb, hsl_to_hex, hsl_to_rgb, rgb_to_hex, rgb_to_hsl};
pub use history::History;
pub use palette::{Gradient, Palette, RandomSource, SchemeKind, color_scheme, random_color, random_gradient, random_palette};
pub use session::SessionState;
pub use store::{FileStore, KeyValueStore, MemoryStore};
