use std::time::Duration;

use serde_json::json;
use shared::protocol::{CommandMessage, PushUpdate};

use super::*;
use crate::{
    controls::{
        button::{ButtonPatch, ButtonState},
        checkbox::{CheckboxPatch, CheckboxState},
        divider::{DividerPatch, DividerState, VerticalDividerPatch, VerticalDividerState},
        input::{InputPatch, InputState},
        knob::{KnobPatch, KnobState},
        label::{LabelPatch, LabelState},
        slider::{SliderPatch, SliderState},
        switch::{SwitchPatch, SwitchState},
        toggle::{TogglePatch, ToggleState},
    },
    test_support::{
        mounted, services_with, test_services, FailingTemplates, GatedTemplates,
        RecordingTransport,
    },
};

fn slider_on(addr: &str) -> SliderPatch {
    SliderPatch {
        command_id: Some(addr.into()),
        ..SliderPatch::default()
    }
}

/// Pointer offset for a dial angle in degrees clockwise from the top.
fn dial_offset(deg: f64) -> (f64, f64) {
    let rad = deg.to_radians();
    (40.0 * rad.sin(), -40.0 * rad.cos())
}

#[tokio::test]
async fn slider_press_dispatches_mapped_value_once() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let slider = mounted::<SliderState>(&services, &slider_on("/cmd/volume")).await;

    let outcome = slider.pointer_down(100.0, 200.0).await.expect("dispatched");

    assert!(outcome.ok);
    assert_eq!(slider.state().props.value, 50.0);
    assert_eq!(
        transport.sent(),
        vec![CommandMessage::new("/cmd/volume", "50")]
    );
}

#[tokio::test]
async fn slider_drag_updates_continuously_and_releases_listeners() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let slider = mounted::<SliderState>(&services, &slider_on("/cmd/volume")).await;

    slider.pointer_down(20.0, 200.0).await;
    assert_eq!(services.listeners.active_count(), 3);

    slider.pointer_move(60.0, 200.0).await;
    // same value again: nothing new to send
    assert!(slider.pointer_move(60.0, 200.0).await.is_none());
    slider.pointer_move(500.0, 200.0).await;
    slider.pointer_cancel();

    assert_eq!(services.listeners.active_count(), 0);
    assert!(slider.pointer_move(0.0, 200.0).await.is_none());

    let values: Vec<String> = transport.sent().into_iter().map(|m| m.value).collect();
    assert_eq!(values, ["10", "30", "100"]);
    assert_eq!(slider.state().props.value, 100.0);
}

#[tokio::test]
async fn slider_renders_fill_ratio() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let slider = mounted::<SliderState>(
        &services,
        &SliderPatch {
            min: Some(-50.0),
            max: Some(50.0),
            value: Some(0.0),
            ..SliderPatch::default()
        },
    )
    .await;

    let rendered = slider.render();
    let view = rendered.view().expect("mounted view");
    assert_eq!(view.fill_ratio, Some(0.5));
    assert_eq!(view.text, "0");
}

#[tokio::test]
async fn slider_patches_keep_value_in_range() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let slider = mounted::<SliderState>(&services, &SliderPatch::default()).await;

    slider.apply(&SliderPatch {
        value: Some(140.0),
        ..SliderPatch::default()
    });
    assert_eq!(slider.state().props.value, 100.0);

    slider.apply(&SliderPatch {
        min: Some(10.0),
        max: Some(20.0),
        ..SliderPatch::default()
    });
    assert_eq!(slider.state().props.value, 20.0);

    // inverted range is rejected as a whole
    slider.apply(&SliderPatch {
        min: Some(30.0),
        ..SliderPatch::default()
    });
    let props = slider.state().props;
    assert_eq!((props.min, props.max), (10.0, 20.0));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn interactions_before_mount_are_ignored() {
    let transport = RecordingTransport::ok();
    let services = services_with(&transport, GatedTemplates::new());
    let slider = Control::<SliderState>::create(
        services.clone(),
        &SliderPatch::default(),
        Placement::default(),
    );

    assert!(slider.pointer_down(100.0, 200.0).await.is_none());
    assert_eq!(services.listeners.active_count(), 0);
    assert!(transport.sent().is_empty());
    assert_eq!(slider.render(), Rendered::Pending);
}

#[tokio::test]
async fn knob_quantizes_to_step() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let knob = mounted::<KnobState>(
        &services,
        &KnobPatch {
            command_id: Some("/cmd/gain".into()),
            max: Some(10.0),
            ..KnobPatch::default()
        },
    )
    .await;

    let (dx, dy) = dial_offset(-11.6);
    knob.mouse_down(dx, dy).await.expect("dispatched");
    knob.mouse_up();

    assert_eq!(knob.state().props.value, 5.0);
    assert_eq!(transport.sent(), vec![CommandMessage::new("/cmd/gain", "5")]);
    assert_eq!(services.listeners.active_count(), 0);
}

#[tokio::test]
async fn knob_fractional_step_sends_clean_decimal() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let knob = mounted::<KnobState>(
        &services,
        &KnobPatch {
            max: Some(1.0),
            step: Some(0.1),
            ..KnobPatch::default()
        },
    )
    .await;

    // 0.3 of the sweep
    let (dx, dy) = dial_offset(-58.0);
    knob.mouse_down(dx, dy).await.expect("dispatched");
    knob.mouse_up();

    assert_eq!(knob.state().props.value, 0.3);
    assert_eq!(transport.sent(), vec![CommandMessage::new("/cmd/demo", "0.3")]);
}

#[tokio::test]
async fn knob_dead_zone_snaps_to_extremes() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let knob = mounted::<KnobState>(&services, &KnobPatch::default()).await;

    let (dx, dy) = dial_offset(160.0);
    knob.mouse_down(dx, dy).await;
    assert_eq!(knob.state().props.value, 100.0);

    let (dx, dy) = dial_offset(-160.0);
    knob.mouse_move(dx, dy).await;
    assert_eq!(knob.state().props.value, 0.0);
    knob.mouse_up();

    let values: Vec<String> = transport.sent().into_iter().map(|m| m.value).collect();
    assert_eq!(values, ["100", "0"]);
}

#[tokio::test]
async fn knob_touch_requires_a_single_contact() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let knob = mounted::<KnobState>(&services, &KnobPatch::default()).await;

    let up = dial_offset(0.0);
    let right = dial_offset(90.0);
    assert!(knob.touch_start(&[up, right]).await.is_none());
    assert_eq!(services.listeners.active_count(), 0);

    knob.touch_start(&[up]).await.expect("dispatched");
    assert_eq!(services.listeners.active_count(), 3);
    assert_eq!(knob.state().props.value, 50.0);

    assert!(knob.touch_move(&[right, up]).await.is_none());
    knob.touch_move(&[right]).await.expect("dispatched");
    knob.touch_cancel();

    assert_eq!(services.listeners.active_count(), 0);
    assert!(knob.touch_move(&[up]).await.is_none());
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn knob_renders_arcs_for_value() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let knob = mounted::<KnobState>(
        &services,
        &KnobPatch {
            value: Some(100.0),
            show_value: Some(false),
            ..KnobPatch::default()
        },
    )
    .await;

    let rendered = knob.render();
    let view = rendered.view().expect("mounted view");
    let arcs = view.arcs.as_ref().expect("arcs");
    assert_eq!(arcs.track, arcs.value);
    assert_eq!(view.text, "");
}

#[tokio::test]
async fn checkbox_flips_dispatch_one_and_zero() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let checkbox = mounted::<CheckboxState>(&services, &CheckboxPatch::default()).await;

    checkbox.toggle().await.expect("dispatched");
    checkbox.toggle().await.expect("dispatched");
    assert!(checkbox.set_checked(false).await.is_none());

    let values: Vec<String> = transport.sent().into_iter().map(|m| m.value).collect();
    assert_eq!(values, ["1", "0"]);
    assert_eq!(transport.sent()[0].addr, "/cmd/demo");
}

#[tokio::test]
async fn switch_flips_dispatch_one_and_zero() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let switch = mounted::<SwitchState>(
        &services,
        &SwitchPatch {
            command_id: Some("/cmd/power".into()),
            ..SwitchPatch::default()
        },
    )
    .await;

    switch.toggle().await.expect("dispatched");
    assert!(switch.set_checked(true).await.is_none());
    assert_eq!(switch.render().view().map(|v| v.text.as_str()), Some("ON"));
    switch.set_checked(false).await.expect("dispatched");

    assert_eq!(
        transport.sent(),
        vec![
            CommandMessage::new("/cmd/power", "1"),
            CommandMessage::new("/cmd/power", "0")
        ]
    );
}

#[tokio::test]
async fn dividers_render_rules_and_never_dispatch() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let divider = mounted::<DividerState>(&services, &DividerPatch::default()).await;
    let vertical = mounted::<VerticalDividerState>(
        &services,
        &VerticalDividerPatch {
            line_width: Some(4.0),
            ..VerticalDividerPatch::default()
        },
    )
    .await;

    let mut patch = PropertySet::new();
    patch.insert("lineWidth".into(), json!(-3));
    patch.insert("text".into(), json!("Section"));
    services.registry.set_props(divider.node(), &patch);

    let rendered = divider.render();
    let view = rendered.view().expect("mounted view");
    assert_eq!(view.text, "Section");
    assert_eq!(
        view.rule.as_ref().map(|rule| (rule.width, rule.vertical)),
        Some((2.0, false))
    );

    let rendered = vertical.render();
    let rule = rendered.view().and_then(|v| v.rule.clone()).expect("rule");
    assert_eq!((rule.width, rule.vertical), (4.0, true));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn toggle_pressed_flag_is_render_only() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let toggle = mounted::<ToggleState>(&services, &TogglePatch::default()).await;
    let defaults = toggle.state().props;

    toggle.press_down();
    let pressed = toggle.render();
    assert_eq!(
        pressed.view().and_then(|v| v.background.clone()),
        Some(defaults.press_color.clone())
    );
    assert!(!toggle.get_props().contains_key("pressed"));
    toggle.press_up();
    assert!(transport.sent().is_empty());

    toggle.click().await.expect("dispatched");
    let view = toggle.render();
    assert_eq!(view.view().map(|v| v.text.as_str()), Some("On"));
    assert_eq!(
        view.view().and_then(|v| v.background.clone()),
        Some(defaults.active_color)
    );
    assert_eq!(transport.sent(), vec![CommandMessage::new("/cmd/demo", "1")]);
}

#[tokio::test]
async fn button_click_always_sends_one() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let button = mounted::<ButtonState>(
        &services,
        &ButtonPatch {
            command_id: Some("/cmd/run".into()),
            ..ButtonPatch::default()
        },
    )
    .await;

    button.click().await.expect("dispatched");
    button.click().await.expect("dispatched");
    button.press_down();
    assert!(button.state().active);
    button.press_up();

    assert_eq!(
        transport.sent(),
        vec![
            CommandMessage::new("/cmd/run", "1"),
            CommandMessage::new("/cmd/run", "1")
        ]
    );
}

#[tokio::test]
async fn input_dispatches_every_change() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let input = mounted::<InputState>(&services, &InputPatch::default()).await;

    input.edit("h").await.expect("dispatched");
    input.edit("hi").await.expect("dispatched");
    assert!(input.edit("hi").await.is_none());

    let values: Vec<String> = transport.sent().into_iter().map(|m| m.value).collect();
    assert_eq!(values, ["h", "hi"]);
}

#[tokio::test]
async fn label_applies_matching_push_updates() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let label = mounted::<LabelState>(
        &services,
        &LabelPatch {
            command_id: Some("/status/temp".into()),
            ..LabelPatch::default()
        },
    )
    .await;

    assert!(!label.apply_push_update(&PushUpdate::value("/status/other", json!(1))));
    assert!(label.apply_push_update(&PushUpdate {
        command_id: "/status/temp".into(),
        value: Some(json!(21)),
        text: Some(json!("ignored")),
    }));
    assert_eq!(label.state().props.text, "21");
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn label_listens_on_push_channel_once_mounted() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let label = mounted::<LabelState>(
        &services,
        &LabelPatch {
            command_id: Some("/status/temp".into()),
            ..LabelPatch::default()
        },
    )
    .await;
    let mut rx = label.subscribe().expect("live state");

    services
        .push
        .publish(PushUpdate::text("/status/temp", "warm"));

    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("push applied in time")
        .expect("state alive");
    assert_eq!(rx.borrow().props.text, "warm");
    assert!(!services.dispatcher.is_remote_updating());
}

#[tokio::test]
async fn push_update_before_mount_is_dropped() {
    let transport = RecordingTransport::ok();
    let gate = GatedTemplates::new();
    let services = services_with(&transport, gate.clone());
    let label = Control::<LabelState>::create(
        services.clone(),
        &LabelPatch {
            command_id: Some("/status/temp".into()),
            ..LabelPatch::default()
        },
        Placement::default(),
    );

    assert!(!label.apply_push_update(&PushUpdate::text("/status/temp", "early")));
    services
        .push
        .publish(PushUpdate::text("/status/temp", "also early"));

    gate.open();
    label.mount_view().await;

    assert!(label.is_interactive());
    assert_eq!(label.state().props.text, "Label");
}

#[tokio::test]
async fn label_removed_before_mount_never_listens() {
    let transport = RecordingTransport::ok();
    let gate = GatedTemplates::new();
    let services = services_with(&transport, gate.clone());
    let label = Control::<LabelState>::create(
        services.clone(),
        &LabelPatch {
            command_id: Some("/status/temp".into()),
            ..LabelPatch::default()
        },
        Placement::default(),
    );

    assert!(services.registry.remove(label.node()));
    gate.open();
    label.mount_view().await;

    assert_eq!(label.settled().await, Phase::Interactive);
    assert!(services.registry.kind(label.node()).is_none());
    assert_eq!(services.push.subscriber_count(), 0);
}

#[tokio::test]
async fn label_push_does_not_mute_a_concurrent_dispatch() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let label = mounted::<LabelState>(
        &services,
        &LabelPatch {
            command_id: Some("/status/temp".into()),
            ..LabelPatch::default()
        },
    )
    .await;
    let slider = mounted::<SliderState>(&services, &slider_on("/cmd/volume")).await;
    let mut rx = label.subscribe().expect("live state");

    services
        .push
        .publish(PushUpdate::text("/status/temp", "warm"));
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("push applied in time")
        .expect("state alive");

    slider.pointer_down(50.0, 200.0).await.expect("dispatched");
    assert_eq!(transport.sent(), vec![CommandMessage::new("/cmd/volume", "25")]);
}

#[tokio::test]
async fn button_active_before_mount_is_not_cached() {
    let transport = RecordingTransport::ok();
    let gate = GatedTemplates::new();
    let services = services_with(&transport, gate.clone());
    let button = Control::<ButtonState>::create(
        services.clone(),
        &ButtonPatch {
            active: Some(true),
            ..ButtonPatch::default()
        },
        Placement::default(),
    );
    let mut early = PropertySet::new();
    early.insert("value".into(), json!(1));
    early.insert("label".into(), json!("Go"));
    button.set_props(&early);
    assert!(!button.state().active);
    assert_eq!(button.state().props.label, "Go");

    gate.open();
    button.mount_view().await;
    assert!(!button.state().active);

    let mut late = PropertySet::new();
    late.insert("value".into(), json!(1));
    button.set_props(&late);
    assert!(button.state().active);
    assert!(!button.get_props().contains_key("active"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn template_failure_leaves_error_indicator() {
    let transport = RecordingTransport::ok();
    let services = services_with(&transport, Arc::new(FailingTemplates));
    let slider = Control::<SliderState>::create(
        services.clone(),
        &SliderPatch {
            value: Some(30.0),
            ..SliderPatch::default()
        },
        Placement::default(),
    );

    slider.mount_view().await;

    assert_eq!(slider.phase(), Phase::Failed);
    assert!(slider.render().is_failed());
    assert!(!slider.is_interactive());
    assert!(slider.subscribe().is_none());
    // cached registration stays usable
    assert_eq!(services.registry.get_props(slider.node())["value"], json!(30.0));
}

#[tokio::test]
async fn registration_happens_in_two_ordered_phases() {
    let transport = RecordingTransport::ok();
    let gate = GatedTemplates::new();
    let services = services_with(&transport, gate.clone());
    let knob = Control::<KnobState>::create(
        services.clone(),
        &KnobPatch::default(),
        Placement::default(),
    );
    let node = knob.node();

    // phase 1: visible immediately, backed by the cache
    assert_eq!(services.registry.kind(node), Some(ControlKind::Knob));
    let mut early = PropertySet::new();
    early.insert("value".into(), json!("42"));
    services.registry.set_props(node, &early);
    assert!(!knob.is_interactive());
    assert_eq!(knob.state().props.value, 42.0);

    let mounting = knob.clone();
    let task = tokio::spawn(async move { mounting.mount_view().await });
    gate.open();
    assert_eq!(knob.settled().await, Phase::Interactive);
    task.await.expect("mount task");

    // phase 2: live state seeded from the cache, writes go through to it
    assert_eq!(services.registry.get_props(node)["value"], json!(42.0));
    let mut rx = knob.subscribe().expect("live state");
    let mut late = PropertySet::new();
    late.insert("value".into(), json!(7));
    services.registry.set_props(node, &late);

    assert!(rx.has_changed().expect("sender alive"));
    assert_eq!(rx.borrow_and_update().props.value, 7.0);
    assert_eq!(knob.state().props.value, 7.0);
    assert_eq!(services.registry.len(), 1);
}

#[tokio::test]
async fn partial_patches_leave_other_keys_untouched() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let toggle = mounted::<ToggleState>(&services, &TogglePatch::default()).await;
    let before = toggle.get_props();

    let mut patch = PropertySet::new();
    patch.insert("labelOn".into(), json!("Running"));
    patch.insert("unknownKey".into(), json!("ignored"));
    services.registry.set_props(toggle.node(), &patch);

    let after = toggle.get_props();
    assert_eq!(after["labelOn"], json!("Running"));
    for (key, value) in &before {
        if key != "labelOn" {
            assert_eq!(after.get(key), Some(value), "{key} changed");
        }
    }
    assert!(!after.contains_key("unknownKey"));
}

#[tokio::test]
async fn boolean_alias_is_never_persisted() {
    let transport = RecordingTransport::ok();
    let services = test_services(&transport);
    let checkbox = mounted::<CheckboxState>(&services, &CheckboxPatch::default()).await;

    let mut patch = PropertySet::new();
    patch.insert("value".into(), json!("TRUE"));
    checkbox.set_props(&patch);

    let props = checkbox.get_props();
    assert_eq!(props["checked"], json!(true));
    assert!(!props.contains_key("value"));
    // editor writes never dispatch
    assert!(transport.sent().is_empty());
}
