//! `figgo`: a FIGlet-compatible ASCII-art banner renderer.
//!
//! Parse an FLF v2 font with [`font::parse_font`], then render text with
//! [`render::render`]. The two halves are independent: the font module
//! knows nothing about composition, and the renderer only depends on the
//! [`font::Font`] accessors.

pub mod font;
pub mod layout;
pub mod render;
pub mod unknown_rune;

mod line_reader;

pub use font::{parse_font, Font, FontError, Glyph, ParseWarning, PrintDirection};
pub use layout::{
    HorizontalLayout, LayoutError, LayoutOverride, NormalizedLayout, VerticalLayout,
};
pub use render::{render, render_to, RenderError, RenderOptions};
pub use unknown_rune::UnknownRuneSpecError;
