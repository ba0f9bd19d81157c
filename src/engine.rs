//! The rendering engine: the block registry and the font context, built
//! once and then shared read-only by every render call.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::blocks::{BlockRegistry, BlockRenderer};
use crate::error::{Result, VitaeError};
use crate::font::FontContext;

/// Immutable state shared by independent renders.
pub struct Engine {
    blocks: BlockRegistry,
    fonts: FontContext,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the built-in blocks and the standard PDF fonts.
    pub fn new() -> Self {
        Self {
            blocks: BlockRegistry::with_builtins(),
            fonts: FontContext::new(),
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    pub fn fonts(&self) -> &FontContext {
        &self.fonts
    }

    /// Fails when no block renderer was registered, i.e. the
    /// initialization phase never ran.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(VitaeError::NotInitialized(
                "no block renderers are registered".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configures an [`Engine`]. Fonts and blocks can only be added here; the
/// built engine is read-only.
pub struct EngineBuilder {
    builtins: bool,
    fonts: Vec<(String, u32, bool, Vec<u8>)>,
    font_dirs: Vec<PathBuf>,
    blocks: BlockRegistry,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            builtins: true,
            fonts: Vec::new(),
            font_dirs: Vec::new(),
            blocks: BlockRegistry::new(),
        }
    }
}

impl EngineBuilder {
    /// Register a TrueType face.
    pub fn with_font(mut self, family: &str, weight: u32, italic: bool, data: Vec<u8>) -> Self {
        self.fonts.push((family.to_string(), weight, italic, data));
        self
    }

    /// Register every font file in a directory, named by file stem.
    pub fn with_font_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.font_dirs.push(path.as_ref().to_path_buf());
        self
    }

    /// Add a renderer, replacing a built-in one with the same id.
    pub fn with_block(mut self, block_type: &str, renderer: impl BlockRenderer + 'static) -> Self {
        self.blocks.register(block_type, renderer);
        self
    }

    /// Leave the built-in blocks out.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    pub fn build(self) -> Result<Engine> {
        let mut fonts = FontContext::new();
        for dir in &self.font_dirs {
            let count = fonts.load_font_dir(dir)?;
            log::info!("Registered {} font face(s) from {}", count, dir.display());
        }
        for (family, weight, italic, data) in self.fonts {
            fonts.registry_mut().register(&family, weight, italic, data)?;
        }

        let mut blocks = if self.builtins {
            BlockRegistry::with_builtins()
        } else {
            BlockRegistry::new()
        };
        blocks.extend(self.blocks);

        Ok(Engine { blocks, fonts })
    }
}

static GLOBAL: OnceLock<Engine> = OnceLock::new();

/// Install the process-wide engine. Returns the engine back if one was
/// already installed.
pub fn init_global(engine: Engine) -> std::result::Result<(), Engine> {
    GLOBAL.set(engine)
}

/// The process-wide engine, if [`init_global`] ran.
pub fn global() -> Result<&'static Engine> {
    GLOBAL
        .get()
        .ok_or_else(|| VitaeError::NotInitialized("the global engine was never initialized".to_string()))
}

/// The process-wide engine, initializing it with defaults on first use.
pub fn global_or_default() -> &'static Engine {
    GLOBAL.get_or_init(Engine::new)
}
