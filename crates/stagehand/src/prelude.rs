//! Convenience re-exports for presenter code.

pub use crate::{
    ApplicationContext, HandlerRegistration, Presenter, Registrations, Scene, SceneConfig,
    UiHandle, UiThread, error,
    geom::{Point, Rect, Size},
    handler::{ClickHandler, DragEvent, DragFns, DragHandler, LayoutHandler},
    input::NativeOrigin,
    screens::{GameView, LoadingView, MainMenuView},
    style::Color,
    texture::{SystemView, Texture, TextureLoader, TextureRef, Tile},
    widgets::{
        Button, HasIntValue, HasMutableLocation, HasMutableSize, HasMutableVisibility, HasText,
        ProgressBar, Sprite,
    },
};

/// Common result alias for stagehand operations.
pub type Result<T> = error::Result<T>;
