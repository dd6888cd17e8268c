//! Integration tests driving the demo core through a live scene.

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use stagehand::{
        Scene, SceneConfig, UiThread,
        error::Result,
        geom::Point,
        input::NativeOrigin,
        texture::SystemView,
        widgets::HasText,
    };
    use stagehand_demo::{DemoCore, Stage, textures::MemoryTextureLoader};

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    fn core() -> Arc<DemoCore> {
        DemoCore::new(SystemView::new(Arc::new(MemoryTextureLoader::standard())))
    }

    #[test]
    fn loads_then_shows_menu() -> Result<()> {
        let ui = UiThread::spawn("ui")?;
        let scene = Scene::new(ui.handle(), SceneConfig::default());
        let core = core();
        let loading = scene.launch(core.clone())?;
        scene.resize(1000.0, 600.0)?;
        assert!(core.wait_for(Stage::MainMenu, TIMEOUT));
        assert!(core.textures().is_some());
        assert_eq!(scene.current_view_name()?, Some("main_menu"));
        assert!(!loading.has_presenter());
        assert_eq!(loading.progress_indicator().text()?, "Loading...");
        ui.join()
    }

    #[test]
    fn start_button_deals_cards() -> Result<()> {
        let ui = UiThread::spawn("ui")?;
        let scene = Scene::new(
            ui.handle(),
            SceneConfig {
                native_origin: NativeOrigin::BottomLeft,
            },
        );
        let core = core();
        let loading = scene.launch(core.clone())?;
        scene.resize(1000.0, 600.0)?;
        assert!(core.wait_for(Stage::MainMenu, TIMEOUT));

        assert!(core.table().is_none());
        scene.pointer_down(500.0, 300.0)?;
        scene.pointer_up(500.0, 300.0)?;
        assert!(core.wait_for(Stage::Game, TIMEOUT));
        assert_eq!(scene.current_view_name()?, Some("game"));
        assert!(!loading.has_presenter());

        let table = core.table().expect("dealt");
        let cards = table.cards();
        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|(face, _)| *face == "four"));
        assert!(cards.windows(2).all(|w| w[0].1.left < w[1].1.left));

        // Drag the second card up by 100 window units.
        let from = cards[1].1.center();
        scene.pointer_down(from.x, 600.0 - from.y)?;
        scene.pointer_move(from.x, 600.0 - (from.y - 50.0))?;
        assert!(table.is_dragging());
        scene.pointer_move(from.x, 600.0 - (from.y - 100.0))?;
        scene.pointer_up(from.x, 600.0 - (from.y - 100.0))?;
        assert!(!table.is_dragging());
        let moved = table.cards()[1].1.center();
        assert!(close(moved, Point::new(from.x, from.y - 100.0)));
        assert_eq!(table.cards()[0].1, cards[0].1);

        // A resize lays the row out again.
        scene.resize(800.0, 600.0)?;
        let relaid = table.cards();
        assert_eq!(relaid[1].1.top, relaid[0].1.top);
        ui.join()
    }
}
