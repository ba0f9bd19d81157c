//! # Vitae
//!
//! A block-driven résumé renderer. Profile + layout in, paginated PDF out.
//!
//! A layout is a flow of frames (rectangular columns on the page), each
//! holding an ordered list of blocks: a name header, a skills grid, a
//! project list. The profile supplies the data; the layout decides where it
//! goes. Blocks are never split across pages: a block that does not fit the
//! rest of its frame moves, whole, to the same frame on the next page.
//!
//! ## Architecture
//!
//! ```text
//! Profile ──[mapper]──> overrides ─┐
//!                                   ├─[layout::merge]─> block data
//! Layout  ──────────────────────────┘        ↓
//!                                  [layout] interpreter + [blocks]
//!                                             ↓
//!                                         [canvas] pages
//!                                             ↓
//!                                   [pdf]  PDF bytes
//! ```
//!
//! [`engine::Engine`] holds the block registry and the fonts and is built
//! once; [`builder::DocumentBuilder`] runs one render against it.

pub mod blocks;
pub mod builder;
pub mod canvas;
pub mod engine;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod mapper;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;

pub use builder::{DocumentBuilder, RenderRequest, RenderedDocument};
pub use engine::{Engine, EngineBuilder};
pub use error::{Result, VitaeError};
pub use model::{Layout, Profile};
pub use style::Theme;

/// Render a profile into a layout with the default engine and theme.
///
/// This is the primary entry point. Takes the profile data and a page
/// layout and returns the raw bytes of a valid PDF file.
pub fn render(profile: &Profile, layout: &Layout) -> Result<Vec<u8>> {
    DocumentBuilder::new(engine::global_or_default()).build(profile, layout)
}

/// Render a JSON [`RenderRequest`] to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>> {
    let request = RenderRequest::from_json(json)?;
    builder::render_request(engine::global_or_default(), &request)
}
