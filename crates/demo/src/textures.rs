use std::{collections::HashMap, sync::Arc};

use stagehand::{
    error::{Error, Result},
    texture::{SystemView, Texture, TextureLoader, TextureRef, Tile, slice_atlas},
};

/// Name of the card background image.
pub const CARD_IMAGE: &str = "Card.png";
/// Name of the symbol atlas image.
pub const SYMBOL_IMAGE: &str = "Symbols.png";

/// The card background is a single tile.
const CARD_TILES: &[Tile] = &[Tile::unit("card", 0, 0)];

/// Symbol atlas grid.
const SYMBOL_GRID: (i64, i64) = (6, 6);

/// Symbols on the atlas, row by row.
pub const SYMBOL_TILES: &[Tile] = &[
    Tile::unit("zero", 0, 0),
    Tile::unit("one", 1, 0),
    Tile::unit("two", 2, 0),
    Tile::unit("three", 3, 0),
    Tile::unit("four", 4, 0),
    Tile::unit("five", 5, 0),
    Tile::unit("six", 0, 1),
    Tile::unit("seven", 1, 1),
    Tile::unit("eight", 2, 1),
    Tile::unit("nine", 3, 1),
    Tile::unit("plus", 4, 1),
    Tile::unit("minus", 5, 1),
    Tile::unit("times", 0, 2),
    Tile::unit("divide", 1, 2),
    Tile::unit("power", 2, 2),
    Tile::unit("radical", 3, 2),
    Tile::unit("paren_l", 4, 2),
    Tile::unit("paren_r", 5, 2),
    Tile::unit("inverse", 0, 3),
    Tile::unit("factorial", 1, 3),
    Tile::unit("decimal", 2, 3),
];

/// A region of a named in-memory image. Nothing is decoded; only the
/// geometry is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTexture {
    /// Image name.
    pub image: String,
    /// Region left edge, in pixels.
    pub left: i64,
    /// Region top edge, in pixels.
    pub top: i64,
    /// Region width, in pixels.
    pub width: i64,
    /// Region height, in pixels.
    pub height: i64,
}

impl Texture for MemoryTexture {
    fn width(&self) -> i64 {
        self.width
    }

    fn height(&self) -> i64 {
        self.height
    }

    fn sub_texture(&self, left: i64, top: i64, width: i64, height: i64) -> TextureRef {
        Arc::new(Self {
            image: self.image.clone(),
            left: self.left + left,
            top: self.top + top,
            width,
            height,
        })
    }
}

/// Serves images of known dimensions from memory.
#[derive(Debug, Default)]
pub struct MemoryTextureLoader {
    /// Image dimensions by name.
    images: HashMap<String, (i64, i64)>,
}

impl MemoryTextureLoader {
    /// An empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader holding the card and symbol images at their usual sizes.
    pub fn standard() -> Self {
        Self::new()
            .with_image(CARD_IMAGE, 250, 350)
            .with_image(SYMBOL_IMAGE, 600, 600)
    }

    /// Add an image.
    pub fn with_image(mut self, name: &str, width: i64, height: i64) -> Self {
        self.images.insert(name.to_string(), (width, height));
        self
    }
}

impl TextureLoader for MemoryTextureLoader {
    fn load_texture(&self, name: &str) -> Result<TextureRef> {
        let (width, height) = self
            .images
            .get(name)
            .copied()
            .ok_or_else(|| Error::ResourceLoad(format!("no image named {name}")))?;
        Ok(Arc::new(MemoryTexture {
            image: name.to_string(),
            left: 0,
            top: 0,
            width,
            height,
        }))
    }
}

/// Every texture the game needs, cut from their atlases.
#[derive(Debug)]
pub struct Textures {
    /// Card background.
    card: TextureRef,
    /// Symbols by name.
    symbols: HashMap<&'static str, TextureRef>,
}

impl Textures {
    /// Load both atlases through `system` and slice them. `progress` sees the
    /// overall completed fraction, from 0.0 to 1.0; the card atlas counts as
    /// the first half. A missing image is fatal.
    pub fn load(system: &SystemView, mut progress: impl FnMut(f64)) -> Result<Self> {
        let card_atlas = system.load_texture(CARD_IMAGE);
        let mut card = slice_atlas(card_atlas.as_ref(), 1, 1, CARD_TILES, |p| progress(p / 2.0))?;
        let symbol_atlas = system.load_texture(SYMBOL_IMAGE);
        let symbols = slice_atlas(
            symbol_atlas.as_ref(),
            SYMBOL_GRID.0,
            SYMBOL_GRID.1,
            SYMBOL_TILES,
            |p| progress(0.5 + p / 2.0),
        )?;
        let card = card
            .pop()
            .map(|(_, t)| t)
            .ok_or_else(|| Error::Internal("card atlas produced no tiles".into()))?;
        Ok(Self {
            card,
            symbols: symbols.into_iter().collect(),
        })
    }

    /// The card background.
    pub fn card(&self) -> &TextureRef {
        &self.card
    }

    /// A symbol by name.
    pub fn symbol(&self, name: &str) -> Option<&TextureRef> {
        self.symbols.get(name)
    }
}
