use std::{sync::Arc, time::Duration};

use anchor_geom::{MenuPosition, MenuSize, Rect, Viewport};
use anchor_measure::test_support::{ImmediateClock, ScriptedTarget};
use anchored_menu::{
    HostConfig, HostKind, MenuHost, MenuProvider, OpenMenuOptions, ProviderConfig,
    ProviderRegistry,
};
use tokio::{task, time};

const WINDOW: Viewport = Viewport::new(360.0, 800.0);

/// Let spawned tasks driven by the immediate clock run to completion.
async fn settle() {
    for _ in 0..64 {
        task::yield_now().await;
    }
}

fn provider(registry: &ProviderRegistry, default_host: HostKind) -> MenuProvider {
    MenuProvider::new(
        registry,
        ProviderConfig {
            default_host,
            ..ProviderConfig::default()
        },
        Arc::new(ImmediateClock::default()),
    )
}

fn host_for(provider: &MenuProvider, kind: HostKind, container: Rect) -> MenuHost {
    MenuHost::new(
        HostConfig::new(kind, WINDOW),
        provider.anchors().clone(),
        ScriptedTarget::fixed(container).shared(),
        Arc::new(ImmediateClock::default()),
    )
}

#[tokio::test(flavor = "current_thread")]
async fn open_measures_and_positions() {
    let registry = ProviderRegistry::new();
    let p = provider(&registry, HostKind::View);
    let host = host_for(&p, HostKind::View, Rect::new(0.0, 40.0, 360.0, 760.0));
    let _follow = host.follow(p.store());

    let anchor = ScriptedTarget::new(vec![
        Some(Rect::new(0.0, 0.0, 100.0, 40.0)),
        Some(Rect::new(300.0, 740.0, 100.0, 40.0)),
    ])
    .shared();
    p.register_anchor("more", anchor, None);

    p.open(OpenMenuOptions::new("more")).expect("open");
    assert!(host.request().is_none());
    settle().await;

    assert_eq!(
        host.anchor_in_host(),
        Some(Rect::new(300.0, 700.0, 100.0, 40.0))
    );
    host.set_host_size(MenuSize::new(360.0, 760.0));
    host.set_menu_size(MenuSize::new(180.0, 220.0));
    assert_eq!(
        host.position(),
        Some(MenuPosition {
            top: 472.0,
            left: 172.0
        })
    );

    p.close();
    assert!(host.request().is_none());
    assert_eq!(host.position(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn reopening_same_request_measures_again() {
    let registry = ProviderRegistry::new();
    let p = provider(&registry, HostKind::View);
    let host = host_for(&p, HostKind::View, Rect::new(0.0, 0.0, 360.0, 800.0));
    let _follow = host.follow(p.store());
    let anchor = ScriptedTarget::fixed(Rect::new(20.0, 600.0, 80.0, 40.0)).shared();
    p.register_anchor("a", anchor.clone(), None);

    p.open(OpenMenuOptions::new("a")).expect("open");
    settle().await;
    assert_eq!(host.anchor_in_host(), Some(Rect::new(20.0, 600.0, 80.0, 40.0)));
    let reads = anchor.reads();

    anchor.set_script(vec![Some(Rect::new(20.0, 100.0, 80.0, 40.0))]);
    p.open(OpenMenuOptions::new("a")).expect("open");
    settle().await;
    assert!(anchor.reads() > reads);
    assert_eq!(host.anchor_in_host(), Some(Rect::new(20.0, 100.0, 80.0, 40.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn hosts_only_render_their_own_layer() {
    let registry = ProviderRegistry::new();
    let p = provider(&registry, HostKind::View);
    let container = Rect::new(0.0, 0.0, 360.0, 800.0);
    let view = host_for(&p, HostKind::View, container);
    let modal = host_for(&p, HostKind::Modal, container);
    let _v = view.follow(p.store());
    let _m = modal.follow(p.store());
    p.register_anchor("a", ScriptedTarget::fixed(Rect::new(5.0, 5.0, 5.0, 5.0)).shared(), None);

    p.open(OpenMenuOptions::new("a").host("modal").immediate(true))
        .expect("open");
    settle().await;
    assert!(view.request().is_none());
    assert!(modal.anchor_in_host().is_some());

    p.open(OpenMenuOptions::new("a").immediate(true)).expect("open");
    settle().await;
    assert!(modal.request().is_none());
    assert!(view.anchor_in_host().is_some());
}

#[tokio::test(flavor = "current_thread")]
async fn close_during_measurement_discards_result() {
    let registry = ProviderRegistry::new();
    let p = provider(&registry, HostKind::View);
    let host = host_for(&p, HostKind::View, Rect::new(0.0, 0.0, 360.0, 800.0));
    let _follow = host.follow(p.store());
    p.register_anchor("a", ScriptedTarget::fixed(Rect::new(5.0, 5.0, 5.0, 5.0)).shared(), None);

    p.open(OpenMenuOptions::new("a").immediate(true)).expect("open");
    assert!(host.request().is_some());
    p.close();
    settle().await;
    assert!(host.request().is_none());
    assert!(host.anchor_in_host().is_none());

    // Nothing was cached, so a reopen starts unseeded.
    p.open(OpenMenuOptions::new("a").immediate(true)).expect("open");
    assert!(host.anchor_in_host().is_none());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn reopen_within_freshness_window_is_seeded() {
    let registry = ProviderRegistry::new();
    let p = provider(&registry, HostKind::View);
    let host = host_for(&p, HostKind::View, Rect::new(0.0, 0.0, 360.0, 800.0));
    let _follow = host.follow(p.store());
    let rect = Rect::new(20.0, 30.0, 40.0, 50.0);
    p.register_anchor("a", ScriptedTarget::fixed(rect).shared(), None);

    p.open(OpenMenuOptions::new("a").immediate(true)).expect("open");
    settle().await;
    p.close();

    p.open(OpenMenuOptions::new("a").immediate(true)).expect("open");
    assert_eq!(host.anchor_in_host(), Some(rect));
    settle().await;
    p.close();

    time::advance(Duration::from_millis(400)).await;
    p.open(OpenMenuOptions::new("a").immediate(true)).expect("open");
    assert_eq!(host.anchor_in_host(), None);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn keyboard_bursts_remeasure_once() {
    let registry = ProviderRegistry::new();
    let p = provider(&registry, HostKind::View);
    let host = host_for(&p, HostKind::View, Rect::new(0.0, 0.0, 360.0, 800.0));
    let _follow = host.follow(p.store());
    let anchor = ScriptedTarget::fixed(Rect::new(20.0, 600.0, 40.0, 40.0)).shared();
    p.register_anchor("field", anchor.clone(), None);

    p.open(OpenMenuOptions::new("field").immediate(true))
        .expect("open");
    settle().await;
    let reads = anchor.reads();

    let moved = Rect::new(20.0, 300.0, 40.0, 40.0);
    anchor.set_script(vec![Some(moved)]);
    for _ in 0..3 {
        host.keyboard_shown(320.0);
        time::sleep(Duration::from_millis(30)).await;
    }
    assert!(host.remeasure_pending());
    assert_eq!(host.anchor_in_host(), Some(Rect::new(20.0, 600.0, 40.0, 40.0)));

    time::sleep(Duration::from_millis(200)).await;
    settle().await;
    assert!(!host.remeasure_pending());
    assert_eq!(host.anchor_in_host(), Some(moved));
    // One stable pass: a first read, then a confirming read.
    assert_eq!(anchor.reads(), reads + 2);

    host.set_host_size(MenuSize::new(360.0, 800.0));
    assert_eq!(host.viewport(), Viewport::new(360.0, 480.0));
}

#[tokio::test(flavor = "current_thread")]
async fn opens_route_to_the_provider_owning_the_anchor() {
    let registry = ProviderRegistry::new();
    let root = provider(&registry, HostKind::View);
    let nested = provider(&registry, HostKind::Modal);
    let nested_host = host_for(&nested, HostKind::Modal, Rect::new(0.0, 0.0, 360.0, 800.0));
    let _follow = nested_host.follow(nested.store());
    nested.register_anchor(
        "inner",
        ScriptedTarget::fixed(Rect::new(50.0, 60.0, 70.0, 80.0)).shared(),
        None,
    );

    root.open(OpenMenuOptions::new("inner")).expect("open");
    settle().await;
    assert!(!root.is_open());
    assert!(nested.is_open());
    assert_eq!(
        nested_host.anchor_in_host(),
        Some(Rect::new(50.0, 60.0, 70.0, 80.0))
    );

    drop(nested);
    assert!(nested_host.request().is_none());
    assert_eq!(registry.len(), 1);
}
