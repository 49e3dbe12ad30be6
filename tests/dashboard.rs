//! The compositor driving the panel driver end to end
mod common;

use std::cell::Cell;

use common::{Bus, BusyPin, ClockDelay, Event};
use epd_dashboard::epd7in5_v2::{Epd7in5, BUFFER_LEN, HEIGHT, WIDTH};
use epd_dashboard::prelude::*;
use epd_dashboard::widget::{GridPosition, GridSize};

const DATA_START_OLD: u8 = 0x10;
const DISPLAY_REFRESH: u8 = 0x12;
const DATA_START_NEW: u8 = 0x13;

fn widget(kind: WidgetKind, topic: &str, x: u32, y: u32) -> WidgetDescriptor {
    WidgetDescriptor::new(
        "Widget",
        kind,
        topic,
        GridPosition { x, y },
        GridSize {
            width: 1,
            height: 1,
        },
    )
}

fn config(count: u32) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    for i in 0..count {
        let topic = format!("sensor/{i}");
        config
            .widgets
            .push(widget(WidgetKind::InfoCard, &topic, i % 4, (i / 4) % 3))
            .unwrap();
    }
    config
}

#[test]
fn render_all_refreshes_the_panel_once() {
    for count in [0, 1, 10] {
        let bus = Bus::default();
        let mut spi = bus.spi();
        let mut delay = ClockDelay::default();
        let mut epd = Epd7in5::new(BusyPin::default(), bus.dc(), bus.rst(), None);
        epd.begin(&mut spi, &mut delay).unwrap();
        bus.clear();

        let mut buffer = vec![0u8; BUFFER_LEN];
        let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
        let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
        dashboard.load(&config(count));

        dashboard
            .render_all(&mut epd.session(&mut spi, &mut delay))
            .unwrap();

        assert_eq!(
            bus.commands(),
            vec![DATA_START_OLD, DATA_START_NEW, DISPLAY_REFRESH],
            "{count} widgets"
        );
        assert_eq!(bus.data_after(DATA_START_OLD, 0), vec![0u8; BUFFER_LEN]);
        assert_eq!(
            bus.data_after(DATA_START_NEW, 0).as_slice(),
            dashboard.canvas().buffer().unwrap()
        );
        assert_eq!(epd.state(), PanelState::PoweredOn(RefreshMode::Full));
    }
}

#[test]
fn update_for_an_unknown_topic_stays_off_the_bus() {
    let bus = Bus::default();
    let mut spi = bus.spi();
    let mut delay = ClockDelay::default();
    let mut epd = Epd7in5::new(BusyPin::default(), bus.dc(), bus.rst(), None);
    epd.begin(&mut spi, &mut delay).unwrap();

    let mut buffer = vec![0u8; BUFFER_LEN];
    let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
    let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
    dashboard.load(&config(3));
    dashboard
        .render_all(&mut epd.session(&mut spi, &mut delay))
        .unwrap();
    let before = bus.len();
    let frame_before = dashboard.canvas().buffer().unwrap().to_vec();

    let payload = WidgetPayload::default().with_value("1");
    let matched = dashboard
        .update_by_topic("sensor/99", &payload, &mut epd.session(&mut spi, &mut delay))
        .unwrap();

    assert!(!matched);
    assert_eq!(bus.len(), before);
    assert_eq!(dashboard.canvas().buffer().unwrap(), frame_before.as_slice());
}

#[test]
fn update_redraws_and_refreshes_once() {
    let bus = Bus::default();
    let mut spi = bus.spi();
    let mut delay = ClockDelay::default();
    let mut epd = Epd7in5::new(BusyPin::default(), bus.dc(), bus.rst(), None);
    epd.begin(&mut spi, &mut delay).unwrap();
    bus.clear();

    let mut buffer = vec![0u8; BUFFER_LEN];
    let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
    let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
    dashboard.load(&config(4));

    let payload = WidgetPayload::default().with_value("23.5").with_unit("C");
    let matched = dashboard
        .update_by_topic("sensor/2", &payload, &mut epd.session(&mut spi, &mut delay))
        .unwrap();

    assert!(matched);
    assert_eq!(dashboard.data()[2].value(), "23.5");
    let refreshes = bus
        .commands()
        .iter()
        .filter(|&&command| command == DISPLAY_REFRESH)
        .count();
    assert_eq!(refreshes, 1);
}

#[test]
fn writing_to_a_sleeping_panel_wakes_it_first() {
    let bus = Bus::default();
    let mut spi = bus.spi();
    let mut delay = ClockDelay::default();
    let mut epd = Epd7in5::new(BusyPin::default(), bus.dc(), bus.rst(), None);
    epd.begin(&mut spi, &mut delay).unwrap();
    epd.sleep(&mut spi, &mut delay).unwrap();
    assert_eq!(epd.state(), PanelState::Sleeping);
    bus.clear();

    let buffer = vec![0u8; BUFFER_LEN];
    epd.write_full(&mut spi, &buffer, &mut delay).unwrap();

    let events = bus.events();
    assert_eq!(&events[..2], &[Event::ResetLow, Event::ResetHigh]);
    assert_eq!(bus.commands().last(), Some(&DISPLAY_REFRESH));
    assert_eq!(epd.state(), PanelState::PoweredOn(RefreshMode::Full));
}

#[test]
fn clear_black_sends_set_bits() {
    let bus = Bus::default();
    let mut spi = bus.spi();
    let mut delay = ClockDelay::default();
    let mut epd = Epd7in5::new(BusyPin::default(), bus.dc(), bus.rst(), None);
    epd.begin(&mut spi, &mut delay).unwrap();
    bus.clear();

    epd.clear_black(&mut spi, &mut delay).unwrap();
    assert_eq!(bus.data_after(DATA_START_OLD, 0), vec![0x00; BUFFER_LEN]);
    assert_eq!(bus.data_after(DATA_START_NEW, 0), vec![0xFF; BUFFER_LEN]);

    bus.clear();
    epd.set_background_color(Color::White);
    epd.clear_frame(&mut spi, &mut delay).unwrap();
    assert_eq!(bus.data_after(DATA_START_NEW, 0), vec![0x00; BUFFER_LEN]);
}

#[test]
fn stuck_panel_gives_up_after_the_timeout() {
    let bus = Bus::default();
    let mut spi = bus.spi();
    let mut delay = ClockDelay::default();
    let feeds = Cell::new(0u32);
    let mut epd = Epd7in5::new(BusyPin::stuck(), bus.dc(), bus.rst(), None)
        .with_busy_timeout(100)
        .with_keepalive(|| feeds.set(feeds.get() + 1));

    let status = epd.wait_until_idle(&mut spi, &mut delay).unwrap();

    assert_eq!(status, BusyStatus::TimedOut);
    // 10ms polls: gives up after the poll that crosses 100ms
    assert!(delay.elapsed_ms() > 100);
    assert!(delay.elapsed_ms() <= 100 + 10);
    assert_eq!(feeds.get(), 11);
}

#[test]
fn refresh_on_a_stuck_panel_still_returns() {
    let bus = Bus::default();
    let mut spi = bus.spi();
    let mut delay = ClockDelay::default();
    let mut epd = Epd7in5::new(BusyPin::stuck(), bus.dc(), bus.rst(), None).with_busy_timeout(50);
    epd.begin(&mut spi, &mut delay).unwrap();

    let buffer = vec![0u8; BUFFER_LEN];
    epd.write_full(&mut spi, &buffer, &mut delay).unwrap();

    assert_eq!(bus.commands().last(), Some(&DISPLAY_REFRESH));
    assert_eq!(epd.state(), PanelState::PoweredOn(RefreshMode::Full));
}

#[test]
fn refresh_modes_reprogram_the_panel() {
    let bus = Bus::default();
    let mut spi = bus.spi();
    let mut delay = ClockDelay::default();
    let mut epd = Epd7in5::new(BusyPin::default(), bus.dc(), bus.rst(), None);
    epd.begin(&mut spi, &mut delay).unwrap();
    bus.clear();

    epd.set_refresh_mode(&mut spi, RefreshMode::Fast, &mut delay)
        .unwrap();
    assert_eq!(bus.data_after(0xE5, 0), vec![0x5A]);
    epd.sleep(&mut spi, &mut delay).unwrap();
    bus.clear();

    // wake up keeps the last mode
    epd.wake_up(&mut spi, &mut delay).unwrap();
    assert_eq!(bus.data_after(0xE5, 0), vec![0x5A]);
    assert_eq!(epd.state(), PanelState::PoweredOn(RefreshMode::Fast));
}
