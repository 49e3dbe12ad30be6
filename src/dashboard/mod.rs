//! Widget compositor
//!
//! Owns the canvas, the widget list and one live data slot per widget. Every
//! render draws all widgets into the framebuffer and then pushes the frame
//! to the panel once; there is no per widget or partial refresh.
//!
//! The compositor does no locking. Data updates and renders have to come from
//! one task, or the caller serialises them.

use heapless::Vec;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::DashboardConfig;
use crate::drawing::Draw;
use crate::framebuffer::Framebuffer;
use crate::layout::Grid;
use crate::traits::FrameSink;
use crate::widget::{WidgetData, WidgetDescriptor, WidgetPayload, MAX_WIDGETS};

mod render;

use self::render::{renderer, INK, PAPER};

/// The dashboard: widgets, their data and the canvas they are drawn on
pub struct Dashboard<'a> {
    canvas: Canvas<'a>,
    grid: Grid,
    widgets: Vec<WidgetDescriptor, MAX_WIDGETS>,
    data: Vec<WidgetData, MAX_WIDGETS>,
}

impl<'a> Dashboard<'a> {
    /// An empty dashboard drawing into `frame`.
    ///
    /// Pass `None` if the framebuffer could not be set up; rendering then
    /// logs an error and does nothing.
    pub fn new(frame: Option<Framebuffer<'a>>, grid: Grid) -> Self {
        Dashboard {
            canvas: Canvas::new(frame),
            grid,
            widgets: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Takes over the widgets of `config`, all data slots start empty
    pub fn load(&mut self, config: &DashboardConfig) {
        self.widgets = config.widgets.clone();
        self.data = self
            .widgets
            .iter()
            .map(|widget| WidgetData::for_kind(widget.kind))
            .collect();
        log::debug!("loaded {} widgets", self.widgets.len());
    }

    pub fn widgets(&self) -> &[WidgetDescriptor] {
        &self.widgets
    }

    /// Live data, same order as [`widgets`](Self::widgets)
    pub fn data(&self) -> &[WidgetData] {
        &self.data
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn canvas(&self) -> &Canvas<'a> {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas<'a> {
        &mut self.canvas
    }

    /// Index of the first widget listening on `topic`
    pub fn widget_index(&self, topic: &str) -> Option<usize> {
        self.widgets.iter().position(|widget| widget.topic == topic)
    }

    /// Redraws every widget and shows the frame once.
    ///
    /// Widgets of an unknown kind are skipped. Without a framebuffer nothing
    /// is drawn and nothing is sent.
    pub fn render_all<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        if !self.canvas.has_frame() {
            log::error!("cannot render widgets, no framebuffer");
            return Ok(());
        }
        log::debug!("rendering {} widgets", self.widgets.len());

        self.canvas.set_clip(None);
        self.canvas.clear(PAPER);

        for (widget, data) in self.widgets.iter().zip(self.data.iter()) {
            let Some(render) = renderer(widget.kind) else {
                log::warn!(
                    "skipping widget {}: unknown type {}",
                    widget.name,
                    widget.kind.type_name()
                );
                continue;
            };
            let rect = widget.rect(&self.grid);
            self.canvas.set_clip(Some(rect));
            render(&mut self.canvas, widget, data, rect);
        }
        self.canvas.set_clip(None);

        self.show(sink)
    }

    /// Stores `payload` for the widget listening on `topic` and redraws.
    ///
    /// Returns `Ok(false)` without drawing or sending anything if no widget
    /// listens on `topic`.
    pub fn update_by_topic<S: FrameSink>(
        &mut self,
        topic: &str,
        payload: &WidgetPayload,
        sink: &mut S,
    ) -> Result<bool, S::Error> {
        let Some(index) = self.widget_index(topic) else {
            log::warn!("no widget found for topic {}", topic);
            return Ok(false);
        };
        log::info!("updating widget {}", self.widgets[index].name);
        self.data[index].apply(payload);
        self.render_all(sink)?;
        Ok(true)
    }

    /// Power-on pattern: a filled and an outlined block, then one refresh
    pub fn render_test_pattern<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        if !self.canvas.has_frame() {
            log::error!("cannot draw the test pattern, no framebuffer");
            return Ok(());
        }
        log::info!("drawing test pattern");
        self.canvas.set_clip(None);
        self.canvas.clear(PAPER);
        self.canvas.fill_rect(10, 10, 200, 100, INK);
        self.canvas.draw_rect_outline(220, 10, 200, 100, INK);
        self.show(sink)
    }

    fn show<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        match self.canvas.buffer() {
            Some(buffer) => sink.show_frame(buffer),
            None => Ok(()),
        }
    }

    /// Fills the frame without showing it
    pub fn clear(&mut self, color: Color) {
        self.canvas.clear(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FONT16, FONT8};
    use crate::rect::Rect;
    use crate::widget::{GridPosition, GridSize, WidgetKind};

    extern crate std;
    use std::vec;
    use std::vec::Vec as StdVec;

    /// Keeps a copy of every frame it is shown
    #[derive(Default)]
    struct FrameRecorder {
        frames: StdVec<StdVec<u8>>,
    }

    impl FrameSink for FrameRecorder {
        type Error = core::convert::Infallible;

        fn show_frame(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
            self.frames.push(buffer.to_vec());
            Ok(())
        }
    }

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 480;

    fn widget(name: &str, kind: WidgetKind, topic: &str, x: u32, y: u32, w: u32) -> WidgetDescriptor {
        WidgetDescriptor::new(
            name,
            kind,
            topic,
            GridPosition { x, y },
            GridSize {
                width: w,
                height: 1,
            },
        )
    }

    fn config(widgets: &[WidgetDescriptor]) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        for widget in widgets {
            config.widgets.push(widget.clone()).unwrap();
        }
        config
    }

    /// Pixels `text` lights when drawn alone at `(x, y)`
    fn text_pixels(x: i32, y: i32, text: &str, title: bool) -> StdVec<(i32, i32)> {
        let mut buffer = vec![0u8; crate::buffer_len(WIDTH as usize, HEIGHT as usize)];
        let mut frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).unwrap();
        let font = if title { &FONT16 } else { &FONT8 };
        frame.draw_string(x, y, text, font, Color::Black);
        let mut lit = vec![];
        for py in 0..HEIGHT as i32 {
            for px in 0..WIDTH as i32 {
                if frame.pixel(px, py) == Some(Color::Black) {
                    lit.push((px, py));
                }
            }
        }
        lit
    }

    #[test]
    fn one_frame_per_render_regardless_of_widget_count() {
        for count in [0u32, 1, 10] {
            let widgets: StdVec<_> = (0..count)
                .map(|i| {
                    let topic = std::format!("t{i}");
                    widget("w", WidgetKind::InfoCard, &topic, i % 4, (i / 4) % 3, 1)
                })
                .collect();
            let mut buffer = vec![0u8; crate::buffer_len(WIDTH as usize, HEIGHT as usize)];
            let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
            let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
            dashboard.load(&config(&widgets));

            let mut sink = FrameRecorder::default();
            dashboard.render_all(&mut sink).unwrap();
            assert_eq!(sink.frames.len(), 1, "{count} widgets");
        }
    }

    #[test]
    fn unknown_topic_changes_nothing() {
        let mut buffer = vec![0u8; crate::buffer_len(WIDTH as usize, HEIGHT as usize)];
        let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
        let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
        dashboard.load(&config(&[widget("w", WidgetKind::InfoCard, "t1", 0, 0, 1)]));
        dashboard.clear(Color::Black);

        let mut sink = FrameRecorder::default();
        let matched = dashboard
            .update_by_topic("t2", &WidgetPayload::default().with_value("1"), &mut sink)
            .unwrap();

        assert!(!matched);
        assert!(sink.frames.is_empty());
        assert!(dashboard.canvas().buffer().unwrap().iter().all(|&b| b == 0xFF));
        assert_eq!(dashboard.data()[0], WidgetData::for_kind(WidgetKind::InfoCard));
    }

    #[test]
    fn first_matching_topic_wins() {
        let mut dashboard = Dashboard::new(None, Grid::for_panel(WIDTH, HEIGHT));
        dashboard.load(&config(&[
            widget("a", WidgetKind::InfoCard, "t", 0, 0, 1),
            widget("b", WidgetKind::InfoCard, "t", 1, 0, 1),
        ]));
        let mut sink = FrameRecorder::default();
        let matched = dashboard
            .update_by_topic("t", &WidgetPayload::default().with_value("5"), &mut sink)
            .unwrap();
        assert!(matched);
        assert_eq!(dashboard.data()[0].value(), "5");
        assert_eq!(dashboard.data()[1].value(), "");
    }

    #[test]
    fn missing_framebuffer_renders_nothing() {
        let mut dashboard = Dashboard::new(None, Grid::for_panel(WIDTH, HEIGHT));
        dashboard.load(&config(&[widget("w", WidgetKind::List, "t", 0, 0, 1)]));
        let mut sink = FrameRecorder::default();
        dashboard.render_all(&mut sink).unwrap();
        dashboard.render_test_pattern(&mut sink).unwrap();
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn unknown_kind_is_skipped_and_the_rest_rendered() {
        let mut buffer = vec![0u8; crate::buffer_len(WIDTH as usize, HEIGHT as usize)];
        let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
        let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
        dashboard.load(&config(&[
            widget("clock", WidgetKind::Unknown, "c", 0, 0, 1),
            widget("w", WidgetKind::InfoCard, "t", 1, 0, 1),
        ]));
        let mut sink = FrameRecorder::default();
        dashboard.render_all(&mut sink).unwrap();

        let frame = dashboard.canvas().frame().unwrap();
        // nothing in the unknown widget's cell
        for y in 0..160 {
            for x in 0..200 {
                assert_eq!(frame.pixel(x, y), Some(Color::White), "({x}, {y})");
            }
        }
        // border of the info card
        assert_eq!(frame.pixel(200, 0), Some(Color::Black));
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn info_card_scenario() {
        let mut buffer = vec![0u8; crate::buffer_len(WIDTH as usize, HEIGHT as usize)];
        let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
        let grid = Grid::for_panel(WIDTH, HEIGHT);
        let mut dashboard = Dashboard::new(frame, grid);
        dashboard.load(&config(&[widget("Temp", WidgetKind::InfoCard, "t1", 0, 0, 2)]));

        let mut sink = FrameRecorder::default();
        let payload = WidgetPayload::default().with_value("23.5").with_unit("C");
        assert!(dashboard.update_by_topic("t1", &payload, &mut sink).unwrap());
        assert_eq!(sink.frames.len(), 1);

        let rect = grid.grid_to_pixels(0, 0, 2, 1);
        assert_eq!(rect, Rect::new(0, 0, 2 * grid.cell_width(), grid.cell_height()));

        let frame = dashboard.canvas().frame().unwrap();
        let title = text_pixels(5, 5, "Temp", true);
        let value = text_pixels(5, 25, "23.5 C", false);
        assert!(!value.is_empty());
        for (x, y) in title.iter().chain(value.iter()) {
            assert!(rect.contains(*x, *y));
            assert_eq!(frame.pixel(*x, *y), Some(Color::Black), "({x}, {y})");
        }
        // nothing outside the card
        for y in 0..HEIGHT as i32 {
            for x in 0..WIDTH as i32 {
                if !rect.contains(x, y) {
                    assert_eq!(frame.pixel(x, y), Some(Color::White), "({x}, {y})");
                }
            }
        }
        // the sink saw the same frame
        assert_eq!(sink.frames[0].as_slice(), frame.buffer());
    }

    #[test]
    fn over_long_text_stays_in_its_cell() {
        let mut buffer = vec![0u8; crate::buffer_len(WIDTH as usize, HEIGHT as usize)];
        let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
        let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
        dashboard.load(&config(&[widget(
            "a very long widget name that runs on",
            WidgetKind::InfoCard,
            "t",
            0,
            0,
            1,
        )]));
        let mut sink = FrameRecorder::default();
        dashboard.render_all(&mut sink).unwrap();

        let frame = dashboard.canvas().frame().unwrap();
        for y in 0..160 {
            for x in 200..WIDTH as i32 {
                assert_eq!(frame.pixel(x, y), Some(Color::White), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_pattern() {
        let mut buffer = vec![0u8; crate::buffer_len(WIDTH as usize, HEIGHT as usize)];
        let frame = Framebuffer::new(WIDTH, HEIGHT, &mut buffer).ok();
        let mut dashboard = Dashboard::new(frame, Grid::for_panel(WIDTH, HEIGHT));
        let mut sink = FrameRecorder::default();
        dashboard.render_test_pattern(&mut sink).unwrap();

        assert_eq!(sink.frames.len(), 1);
        let frame = dashboard.canvas().frame().unwrap();
        assert_eq!(frame.pixel(10, 10), Some(Color::Black));
        assert_eq!(frame.pixel(209, 109), Some(Color::Black));
        assert_eq!(frame.pixel(210, 10), Some(Color::White));
        assert_eq!(frame.pixel(220, 10), Some(Color::Black));
        assert_eq!(frame.pixel(300, 50), Some(Color::White));
    }
}
