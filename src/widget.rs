//! Widget descriptors, live data records and data updates
//!
//! A [`WidgetDescriptor`] comes from the configuration and never changes. Each
//! descriptor owns one [`WidgetData`] slot (same index in the dashboard) that
//! a [`WidgetPayload`] updates in place. Fields a payload leaves out keep
//! their previous value.

use heapless::{String, Vec};

use crate::layout::Grid;
use crate::rect::Rect;

/// Maximum number of widgets on a dashboard
pub const MAX_WIDGETS: usize = 10;
/// Maximum number of rows of a list widget
pub const MAX_LIST_ITEMS: usize = 10;
/// Capacity of a string field in a payload
pub const PAYLOAD_FIELD_LEN: usize = 128;

/// Payload string
pub type PayloadString = String<PAYLOAD_FIELD_LEN>;

/// How a widget is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WidgetKind {
    /// Name and "value unit"
    InfoCard,
    /// Name, icon and "value unit" with an accent outline
    WeatherCard,
    /// Name and up to [`MAX_LIST_ITEMS`] "label: value" rows
    List,
    /// A type this firmware does not know, skipped when rendering
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl WidgetKind {
    /// Parses the `type` string of the configuration
    pub fn from_type_name(name: &str) -> WidgetKind {
        match name {
            "info_card" => WidgetKind::InfoCard,
            "weather_card" => WidgetKind::WeatherCard,
            "list" => WidgetKind::List,
            _ => WidgetKind::Unknown,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            WidgetKind::InfoCard => "info_card",
            WidgetKind::WeatherCard => "weather_card",
            WidgetKind::List => "list",
            WidgetKind::Unknown => "unknown",
        }
    }
}

/// Top left cell of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct GridPosition {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

/// Cells a widget spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct GridSize {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
}

impl Default for GridSize {
    fn default() -> Self {
        GridSize {
            width: 1,
            height: 1,
        }
    }
}

/// One widget of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct WidgetDescriptor {
    /// Title drawn at the top of the widget
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub name: String<64>,
    /// Renderer
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: WidgetKind,
    /// Topic the live data arrives on
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub topic: String<128>,
    /// Top left cell
    pub position: GridPosition,
    /// Cells spanned
    pub size: GridSize,
}

impl WidgetDescriptor {
    /// Strings longer than their field are cut at a character boundary
    pub fn new(
        name: &str,
        kind: WidgetKind,
        topic: &str,
        position: GridPosition,
        size: GridSize,
    ) -> Self {
        WidgetDescriptor {
            name: truncated(name, "widget name"),
            kind,
            topic: truncated(topic, "widget topic"),
            position,
            size,
        }
    }

    /// Pixel rectangle of the widget on `grid`
    pub fn rect(&self, grid: &Grid) -> Rect {
        grid.grid_to_pixels(
            self.position.x,
            self.position.y,
            self.size.width,
            self.size.height,
        )
    }
}

/// Live data of an info card
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfoCardData {
    pub value: String<64>,
    pub unit: String<16>,
    pub timestamp: u32,
}

/// Live data of a weather card
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeatherCardData {
    pub value: String<64>,
    pub unit: String<16>,
    /// Short text drawn in front of the value, e.g. "SUN"
    pub icon: String<32>,
    pub timestamp: u32,
}

/// One row of a list widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListItem {
    pub label: String<32>,
    pub value: String<64>,
}

/// Live data of a list widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListData {
    pub items: Vec<ListItem, MAX_LIST_ITEMS>,
    pub timestamp: u32,
}

/// The live data slot of one widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WidgetData {
    /// Slot of a widget kind without data
    #[default]
    Empty,
    InfoCard(InfoCardData),
    WeatherCard(WeatherCardData),
    List(ListData),
}

impl WidgetData {
    /// Empty record matching `kind`
    pub fn for_kind(kind: WidgetKind) -> WidgetData {
        match kind {
            WidgetKind::InfoCard => WidgetData::InfoCard(InfoCardData::default()),
            WidgetKind::WeatherCard => WidgetData::WeatherCard(WeatherCardData::default()),
            WidgetKind::List => WidgetData::List(ListData::default()),
            WidgetKind::Unknown => WidgetData::Empty,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            WidgetData::InfoCard(data) => data.value.as_str(),
            WidgetData::WeatherCard(data) => data.value.as_str(),
            _ => "",
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            WidgetData::InfoCard(data) => data.unit.as_str(),
            WidgetData::WeatherCard(data) => data.unit.as_str(),
            _ => "",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            WidgetData::WeatherCard(data) => data.icon.as_str(),
            _ => "",
        }
    }

    pub fn items(&self) -> &[ListItem] {
        match self {
            WidgetData::List(data) => data.items.as_slice(),
            _ => &[],
        }
    }

    pub fn timestamp(&self) -> Option<u32> {
        match self {
            WidgetData::InfoCard(data) => Some(data.timestamp),
            WidgetData::WeatherCard(data) => Some(data.timestamp),
            WidgetData::List(data) => Some(data.timestamp),
            WidgetData::Empty => None,
        }
    }

    /// Copies the fields of `payload` this record has.
    ///
    /// Missing fields keep their value. A list payload sets the number of
    /// rows; rows it adds start empty and are then filled from the payload.
    pub fn apply(&mut self, payload: &WidgetPayload) {
        match self {
            WidgetData::InfoCard(data) => {
                copy_field(&mut data.value, payload.value.as_deref(), "value");
                copy_field(&mut data.unit, payload.unit.as_deref(), "unit");
                if let Some(timestamp) = payload.timestamp {
                    data.timestamp = timestamp;
                }
            }
            WidgetData::WeatherCard(data) => {
                copy_field(&mut data.value, payload.value.as_deref(), "value");
                copy_field(&mut data.unit, payload.unit.as_deref(), "unit");
                copy_field(&mut data.icon, payload.icon.as_deref(), "icon");
                if let Some(timestamp) = payload.timestamp {
                    data.timestamp = timestamp;
                }
            }
            WidgetData::List(data) => {
                if let Some(list) = payload.items.as_ref() {
                    if list.dropped > 0 {
                        log::warn!(
                            "list payload has {} items, dropped the last {}",
                            list.items.len() + list.dropped,
                            list.dropped
                        );
                    }
                    data.items.truncate(list.items.len());
                    while data.items.len() < list.items.len() {
                        if data.items.push(ListItem::default()).is_err() {
                            break;
                        }
                    }
                    for (item, update) in data.items.iter_mut().zip(list.items.iter()) {
                        copy_field(&mut item.label, update.label.as_deref(), "label");
                        copy_field(&mut item.value, update.value.as_deref(), "value");
                    }
                }
                if let Some(timestamp) = payload.timestamp {
                    data.timestamp = timestamp;
                }
            }
            WidgetData::Empty => {}
        }
    }
}

/// A data update for one widget, as decoded from its topic's message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WidgetPayload {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_string"))]
    pub value: Option<PayloadString>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_string"))]
    pub unit: Option<PayloadString>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_string"))]
    pub icon: Option<PayloadString>,
    pub items: Option<ListPayload>,
    pub timestamp: Option<u32>,
}

impl WidgetPayload {
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(truncated(value, "payload value"));
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(truncated(unit, "payload unit"));
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(truncated(icon, "payload icon"));
        self
    }

    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Appends a list row, creating the list on first use
    pub fn with_item(mut self, label: Option<&str>, value: Option<&str>) -> Self {
        self.items.get_or_insert_with(ListPayload::default).push(ListItemPayload {
            label: label.map(|label| truncated(label, "payload label")),
            value: value.map(|value| truncated(value, "payload value")),
        });
        self
    }
}

/// A row of a list payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ListItemPayload {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_string"))]
    pub label: Option<PayloadString>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::optional_string"))]
    pub value: Option<PayloadString>,
}

/// The rows of a list payload, rows past [`MAX_LIST_ITEMS`] are counted and dropped
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPayload {
    pub items: Vec<ListItemPayload, MAX_LIST_ITEMS>,
    pub dropped: usize,
}

impl ListPayload {
    pub fn push(&mut self, item: ListItemPayload) {
        if self.items.push(item).is_err() {
            self.dropped += 1;
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ListPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (items, dropped) = crate::de::capped_seq(deserializer)?;
        Ok(ListPayload { items, dropped })
    }
}

/// `src` cut down to the capacity at a character boundary
pub(crate) fn truncated<const N: usize>(src: &str, field: &str) -> String<N> {
    let mut out = String::new();
    copy_field(&mut out, Some(src), field);
    out
}

/// Overwrites `dst` with `src` if there is one, cutting it to fit
fn copy_field<const N: usize>(dst: &mut String<N>, src: Option<&str>, field: &str) {
    let Some(src) = src else {
        return;
    };
    let mut end = src.len().min(N);
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    if end < src.len() {
        log::warn!("{} truncated to {} bytes", field, end);
    }
    dst.clear();
    // fits by construction
    let _ = dst.push_str(&src[..end]);
}
