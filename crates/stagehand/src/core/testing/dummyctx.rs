use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use crate::{
    context::{ApplicationContext, Presenter},
    error::{Error, Result},
    screens::{GameView, LoadingView, MainMenuView},
    texture::{Texture, TextureLoader, TextureRef},
};

/// Presenter handed out by [`DummyContext`]. Records which view it was built
/// for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyPresenter(pub &'static str);

/// Application context for tests. Builds inert presenters and records each
/// binding.
#[derive(Debug, Default)]
pub struct DummyContext {
    /// Views bound so far, by screen name.
    bound: Mutex<Vec<&'static str>>,
}

impl DummyContext {
    /// A fresh context.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A fresh context, type-erased.
    pub fn shared() -> Arc<dyn ApplicationContext> {
        Self::new()
    }

    /// Screen names of every view bound so far, in order.
    pub fn bound(&self) -> Vec<&'static str> {
        self.bound.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Record a binding and build its presenter.
    fn record(&self, name: &'static str) -> Presenter {
        if let Ok(mut b) = self.bound.lock() {
            b.push(name);
        }
        Box::new(DummyPresenter(name))
    }
}

impl ApplicationContext for DummyContext {
    fn bind_to_loading_view(&self, _view: &LoadingView) -> Presenter {
        self.record("loading")
    }

    fn bind_to_main_menu_view(&self, _view: &MainMenuView) -> Presenter {
        self.record("main_menu")
    }

    fn bind_to_game_view(&self, _view: &GameView) -> Presenter {
        self.record("game")
    }
}

/// An in-memory texture: a named image and a region of it.
#[derive(Clone, PartialEq, Eq)]
pub struct StubTexture {
    /// Image name.
    name: String,
    /// Region left edge.
    left: i64,
    /// Region top edge.
    top: i64,
    /// Region width.
    width: i64,
    /// Region height.
    height: i64,
}

impl StubTexture {
    /// A whole image.
    pub fn new(name: &str, width: i64, height: i64) -> Self {
        Self {
            name: name.to_string(),
            left: 0,
            top: 0,
            width,
            height,
        }
    }
}

impl fmt::Debug for StubTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StubTexture({}[{},{} {}x{}])",
            self.name, self.left, self.top, self.width, self.height
        )
    }
}

impl Texture for StubTexture {
    fn width(&self) -> i64 {
        self.width
    }

    fn height(&self) -> i64 {
        self.height
    }

    fn sub_texture(&self, left: i64, top: i64, width: i64, height: i64) -> TextureRef {
        Arc::new(Self {
            name: self.name.clone(),
            left: self.left + left,
            top: self.top + top,
            width,
            height,
        })
    }
}

/// A texture loader over a fixed set of stub images.
#[derive(Debug, Default)]
pub struct StubLoader {
    /// Known images by name.
    textures: HashMap<String, StubTexture>,
}

impl StubLoader {
    /// A loader knowing `(name, width, height)` images.
    pub fn new(textures: &[(&str, i64, i64)]) -> Self {
        Self {
            textures: textures
                .iter()
                .map(|(n, w, h)| (n.to_string(), StubTexture::new(n, *w, *h)))
                .collect(),
        }
    }
}

impl TextureLoader for StubLoader {
    fn load_texture(&self, name: &str) -> Result<TextureRef> {
        match self.textures.get(name) {
            Some(t) => Ok(Arc::new(t.clone())),
            None => Err(Error::ResourceLoad(format!("no texture named {name}"))),
        }
    }
}
