use anyhow::Result;
use tracing::{Level, info};

use reveal_config::RevealConfig;
use reveal_scene::{
    ActiveTween, Easing, ElementBounds, ElementStore, RevealManager, RevealSpec, RevealState,
    ScrollTriggerProvider, Viewport, VisibilityObserver,
};

/// Simulated frame interval (60 fps).
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Scroll speed of the simulated reader, in pixels per frame.
const SCROLL_PER_FRAME: f64 = 12.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let mut config = RevealConfig::load_or_default();
    config.merge_with_env();
    info!(
        threshold = config.observer.threshold,
        stagger_ms = config.timing.stagger_ms,
        "reveal engine starting"
    );

    // Build a page: a hero headline split into words, a hero image, and a
    // row of portfolio cards further down.
    let mut store = ElementStore::new();
    let words: Vec<_> = (0..6)
        .map(|_| store.insert(ElementBounds::new(200.0, 64.0)))
        .collect();
    let hero_image = store.insert(ElementBounds::new(600.0, 480.0));
    let cards: Vec<_> = (0..3)
        .map(|i| store.insert(ElementBounds::new(1600.0 + i as f64 * 40.0, 360.0)))
        .collect();

    let mut viewport = Viewport::new(900.0);
    let mut observer = VisibilityObserver::new();
    let mut manager = RevealManager::new();

    // Headline words stagger in as soon as the hero enters the viewport.
    let headline = observer.observe(words[0], config.observer.threshold, true);
    manager.play_on_visible(
        headline,
        RevealSpec::word_reveal(words.clone(), 64.0, &config),
    );

    // The hero image fades up once a fifth of it is visible.
    let image_visible = observer.observe(hero_image, config.observer.threshold, true);
    manager.play_on_visible(image_visible, RevealSpec::fade_in_up(hero_image, &config));

    // Portfolio cards are scroll-position triggered: they fire when their
    // top edge crosses the start line above the viewport bottom. One card
    // registers before initialization to exercise the deferred path.
    let provider = ScrollTriggerProvider::from_config(&config);
    let handle = provider.handle();
    handle.register(cards[0], RevealSpec::fade_in_up(cards[0], &config))?;

    provider.ensure_initialized();
    for &card in &cards[1..] {
        handle.register(card, RevealSpec::fade_in_up(card, &config))?;
    }

    // A stat counter tween, played directly: 0 -> 250 projects.
    let mut counter = ActiveTween::new(0.0_f64, 250.0, 1500.0, 0.0, Easing::PowerOut { power: 3 });

    // Simulate the reader scrolling through the page.
    for frame in 0..240 {
        viewport.scroll_by(SCROLL_PER_FRAME);

        observer.process(&store, &viewport);
        provider.on_scroll(&viewport, &store, &mut manager);
        manager.update(FRAME_MS, &store);
        counter.update(FRAME_MS);

        for event in manager.drain_events() {
            info!(frame, ?event, "reveal event");
        }

        if frame % 60 == 0 {
            let opacity = manager
                .value_for(hero_image, &store)
                .map(|state| state.opacity)
                .unwrap_or(0.0);
            info!(
                frame,
                scroll_top = viewport.scroll_top,
                hero_opacity = opacity,
                projects = counter.value().round(),
                "frame sample"
            );
        }
    }

    info!(
        armed = manager.armed_count(),
        active = manager.active_count(),
        triggers = provider.record_count(),
        "scroll finished"
    );

    // Page unmount: release every scroll trigger in one place.
    provider.teardown_all();
    observer.disconnect_all();

    Ok(())
}
