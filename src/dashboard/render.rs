//! Per kind widget renderers
//!
//! Every renderer gets the widget's pixel rectangle and draws only inside it;
//! the caller has already set the canvas clip to that rectangle.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::drawing::Draw;
use crate::rect::Rect;
use crate::widget::{WidgetData, WidgetDescriptor, WidgetKind};

/// Text and border color
pub(crate) const INK: Color = Color::Black;
/// Card background
pub(crate) const PAPER: Color = Color::White;

/// Distance of the text from the card border
const PADDING: i32 = 5;
/// Top of the first line below the title
const BODY_TOP: i32 = 25;
/// Vertical distance of list rows
const LIST_ROW_PITCH: i32 = 10;
/// Where the weather value starts if the icon is short
const WEATHER_VALUE_X: i32 = 20;
/// Distance of the weather card's second border from the first
const ACCENT_INSET: u32 = 2;

const TITLE_SIZE: u8 = 2;
const BODY_SIZE: u8 = 1;

pub(crate) type Renderer = fn(&mut Canvas<'_>, &WidgetDescriptor, &WidgetData, Rect);

/// Renderer of a widget kind, `None` for kinds that cannot be drawn
pub(crate) fn renderer(kind: WidgetKind) -> Option<Renderer> {
    match kind {
        WidgetKind::InfoCard => Some(info_card),
        WidgetKind::WeatherCard => Some(weather_card),
        WidgetKind::List => Some(list),
        WidgetKind::Unknown => None,
    }
}

fn info_card(canvas: &mut Canvas<'_>, widget: &WidgetDescriptor, data: &WidgetData, rect: Rect) {
    log::debug!(
        "rendering info card {}: {} {}",
        widget.name,
        data.value(),
        data.unit()
    );
    let (x, y) = card(canvas, rect, INK);
    title(canvas, x, y, &widget.name);

    canvas.set_cursor(x + PADDING, y + BODY_TOP);
    canvas.set_text_size(BODY_SIZE);
    value_with_unit(canvas, data);
}

fn weather_card(
    canvas: &mut Canvas<'_>,
    widget: &WidgetDescriptor,
    data: &WidgetData,
    rect: Rect,
) {
    log::debug!(
        "rendering weather card {}: {} {}",
        widget.name,
        data.value(),
        data.unit()
    );
    let (x, y) = card(canvas, rect, INK);
    // double border tells it apart from an info card on a two level panel
    canvas.draw_rect_outline(
        x + ACCENT_INSET as i32,
        y + ACCENT_INSET as i32,
        rect.w.saturating_sub(2 * ACCENT_INSET),
        rect.h.saturating_sub(2 * ACCENT_INSET),
        INK,
    );
    title(canvas, x, y, &widget.name);

    canvas.set_cursor(x + PADDING, y + BODY_TOP);
    canvas.set_text_size(BODY_SIZE);
    canvas.print(data.icon());

    let value_x = if data.icon().is_empty() {
        x + WEATHER_VALUE_X
    } else {
        let (pen, _) = canvas.cursor();
        (x + WEATHER_VALUE_X).max(pen + canvas.font().width() as i32)
    };
    canvas.set_cursor(value_x, y + BODY_TOP);
    value_with_unit(canvas, data);
}

fn list(canvas: &mut Canvas<'_>, widget: &WidgetDescriptor, data: &WidgetData, rect: Rect) {
    log::debug!(
        "rendering list {}: {} rows",
        widget.name,
        data.items().len()
    );
    let (x, y) = card(canvas, rect, INK);
    title(canvas, x, y, &widget.name);

    canvas.set_text_size(BODY_SIZE);
    for (row, item) in data.items().iter().enumerate() {
        canvas.set_cursor(x + PADDING, y + BODY_TOP + row as i32 * LIST_ROW_PITCH);
        canvas.print(&item.label);
        canvas.print(": ");
        canvas.print(&item.value);
    }
}

/// Blank card with a border, returns its top left corner
fn card(canvas: &mut Canvas<'_>, rect: Rect, border: Color) -> (i32, i32) {
    let (x, y) = (rect.x as i32, rect.y as i32);
    canvas.fill_rect(x, y, rect.w, rect.h, PAPER);
    canvas.draw_rect_outline(x, y, rect.w, rect.h, border);
    canvas.set_text_color(INK);
    (x, y)
}

fn title(canvas: &mut Canvas<'_>, x: i32, y: i32, name: &str) {
    canvas.set_cursor(x + PADDING, y + PADDING);
    canvas.set_text_size(TITLE_SIZE);
    canvas.print(name);
}

/// "value unit" at the cursor
fn value_with_unit(canvas: &mut Canvas<'_>, data: &WidgetData) {
    canvas.print(data.value());
    canvas.print(" ");
    canvas.print(data.unit());
}
