//! Integration tests for calls made from outside the UI thread.

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Barrier},
        thread,
    };

    use stagehand::{
        Scene, SceneConfig, UiThread,
        error::Result,
        geom::Size,
        screens::{GameView, MainMenuView},
        testing::{self, dummyctx::DummyContext, recorders::ClickRecorder},
        widgets::HasIntValue,
    };

    /// A scene on its own UI thread showing the main menu at 1000x600.
    fn menu(ui: &UiThread) -> Result<(Scene, MainMenuView)> {
        let scene = Scene::new(ui.handle(), SceneConfig::default());
        let loading = scene.launch(DummyContext::shared())?;
        scene.resize(1000.0, 600.0)?;
        let menu = loading.transition_to_main_menu_view()?;
        // Ordered behind the queued swap, so the menu is laid out on return.
        scene.resize(1000.0, 600.0)?;
        Ok((scene, menu))
    }

    #[test]
    fn stacking_is_global_and_unique() -> Result<()> {
        let ui = UiThread::spawn("ui")?;
        let views = [GameView::new(&ui.handle())?, GameView::new(&ui.handle())?];
        let per_thread: Vec<Vec<i64>> = thread::scope(|s| {
            let workers: Vec<_> = (0..8)
                .map(|t| {
                    let views = &views;
                    s.spawn(move || -> Result<Vec<i64>> {
                        let mut zs = vec![];
                        for i in 0..10 {
                            let sprite = views[(t + i) % 2].create_sprite()?;
                            zs.push(sprite.z()?);
                        }
                        Ok(zs)
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|w| w.join().unwrap())
                .collect::<Result<Vec<_>>>()
        })?;

        for zs in &per_thread {
            assert!(zs.windows(2).all(|w| w[0] < w[1]));
        }
        let mut all: Vec<i64> = per_thread.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (1..=80).collect::<Vec<_>>());
        let children: usize = views
            .iter()
            .map(|v| v.core().sync(|s| s.child_count()))
            .sum::<Result<usize>>()?;
        assert_eq!(children, 80);
        ui.join()
    }

    #[test]
    fn concurrent_adds_all_dispatch_once() -> Result<()> {
        const N: usize = 16;
        let ui = UiThread::spawn("ui")?;
        let (scene, menu) = menu(&ui)?;
        let button = menu.start_new_game_button().clone();
        let barrier = Arc::new(Barrier::new(N));
        let recorders: Vec<Arc<ClickRecorder>> = (0..N).map(|_| ClickRecorder::new()).collect();

        let added = thread::scope(|s| {
            let workers: Vec<_> = recorders
                .iter()
                .map(|p| {
                    let (button, barrier) = (button.clone(), barrier.clone());
                    s.spawn(move || {
                        barrier.wait();
                        button.add_click_handler(p.clone()).is_ok()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).all(|ok| ok)
        });
        assert!(added);

        assert!(scene.pointer_down(500.0, 300.0)?);
        assert!(scene.pointer_up(500.0, 300.0)?);
        assert!(recorders.iter().all(|p| p.count() == 1));
        let distinct: HashSet<_> = recorders.iter().map(Arc::as_ptr).collect();
        assert_eq!(distinct.len(), N);
        ui.join()
    }

    #[test]
    fn off_thread_writes_are_visible_on_the_ui_thread() -> Result<()> {
        let ui = UiThread::spawn("ui")?;
        let (_scene, menu) = menu(&ui)?;
        let button = menu.start_new_game_button().clone();
        button.set_size(Size::new(320.0, 200.0))?;
        let seen = {
            let button = button.clone();
            ui.handle().run_sync(move || button.size())??
        };
        assert_eq!(seen, Size::new(320.0, 200.0));

        let ui_handle = ui.handle();
        assert!(!ui_handle.is_ui_thread());
        assert!(ui_handle.run_sync({
            let h = ui_handle.clone();
            move || h.is_ui_thread()
        })?);
        ui.join()
    }

    #[test]
    fn worker_drives_transition() -> Result<()> {
        testing::log_to_test_writer();
        let ui = UiThread::spawn("ui")?;
        let scene = Scene::new(ui.handle(), SceneConfig::default());
        let loading = scene.launch(DummyContext::shared())?;
        scene.resize(800.0, 600.0)?;
        let menu = thread::spawn({
            let loading = loading.clone();
            move || -> Result<MainMenuView> {
                for v in (0..=100).step_by(25) {
                    loading.progress_indicator().set_int_value(v)?;
                }
                assert_eq!(loading.progress_indicator().int_value()?, 100);
                loading.transition_to_main_menu_view()
            }
        })
        .join()
        .unwrap()?;
        assert!(!loading.has_presenter());
        assert!(menu.has_presenter());
        // Any synchronous call lands behind the queued swap.
        assert_eq!(scene.current_view_name()?, Some("main_menu"));
        ui.join()
    }
}
