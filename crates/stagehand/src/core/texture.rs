//! The texture boundary. Textures are opaque to this crate: they are loaded by
//! the host, sliced into regions, measured, and handed to sprites.

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::error::{self, Error, Result};

/// An image the host can draw.
pub trait Texture: Send + Sync + fmt::Debug + 'static {
    /// Width in pixels.
    fn width(&self) -> i64;

    /// Height in pixels.
    fn height(&self) -> i64;

    /// A region of this texture, measured from its top-left corner.
    fn sub_texture(&self, left: i64, top: i64, width: i64, height: i64) -> TextureRef;

    /// Width over height, or zero for a texture with no height.
    fn aspect_ratio(&self) -> f64 {
        let h = self.height();
        if h == 0 {
            0.0
        } else {
            self.width() as f64 / h as f64
        }
    }
}

/// A shared texture.
pub type TextureRef = Arc<dyn Texture>;

/// Loads named textures.
pub trait TextureLoader: Send + Sync + 'static {
    /// Load the texture called `name`.
    fn load_texture(&self, name: &str) -> Result<TextureRef>;
}

/// Host services exposed to the application core.
#[derive(Clone)]
pub struct SystemView {
    /// Texture source.
    loader: Arc<dyn TextureLoader>,
}

impl fmt::Debug for SystemView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SystemView")
    }
}

impl SystemView {
    /// Wrap a texture loader.
    pub fn new(loader: Arc<dyn TextureLoader>) -> Self {
        Self { loader }
    }

    /// The underlying loader, for callers that want to handle failure
    /// themselves.
    pub fn texture_loader(&self) -> &Arc<dyn TextureLoader> {
        &self.loader
    }

    /// Load a texture the application cannot run without. There is no
    /// fallback asset: failure is logged and aborts.
    pub fn load_texture(&self, name: &str) -> TextureRef {
        match self.loader.load_texture(name) {
            Ok(t) => {
                debug!(name, width = t.width(), height = t.height(), "texture loaded");
                t
            }
            Err(e) => error::fatal(match e {
                Error::ResourceLoad(_) => e,
                other => Error::ResourceLoad(format!("{name}: {other}")),
            }),
        }
    }
}

/// One named region of an atlas, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Region name.
    pub name: &'static str,
    /// Left edge, in tiles.
    pub left: i64,
    /// Top edge, in tiles.
    pub top: i64,
    /// Width, in tiles.
    pub width: i64,
    /// Height, in tiles.
    pub height: i64,
}

impl Tile {
    /// A single-tile region.
    pub const fn unit(name: &'static str, left: i64, top: i64) -> Self {
        Self {
            name,
            left,
            top,
            width: 1,
            height: 1,
        }
    }
}

/// Cut `tiles` out of an atlas divided into a `columns` x `rows` grid.
/// `progress` sees the completed fraction before the first cut and after
/// every cut, ending at 1.0.
pub fn slice_atlas(
    atlas: &dyn Texture,
    columns: i64,
    rows: i64,
    tiles: &[Tile],
    mut progress: impl FnMut(f64),
) -> Result<Vec<(&'static str, TextureRef)>> {
    if columns <= 0 || rows <= 0 {
        return Err(Error::Geometry(format!(
            "atlas grid must be positive, got {columns}x{rows}"
        )));
    }
    let tw = atlas.width() / columns;
    let th = atlas.height() / rows;
    let total = tiles.len().max(1) as f64;
    progress(0.0);
    let mut out = Vec::with_capacity(tiles.len());
    for (i, t) in tiles.iter().enumerate() {
        if t.left + t.width > columns || t.top + t.height > rows {
            return Err(Error::Geometry(format!("tile {} falls outside the atlas", t.name)));
        }
        out.push((
            t.name,
            atlas.sub_texture(t.left * tw, t.top * th, t.width * tw, t.height * th),
        ));
        progress((i + 1) as f64 / total);
    }
    Ok(out)
}
