//! Dashboard configuration
//!
//! The typed form of the device's `config.json`. With the `serde` feature the
//! types deserialize straight from that file:
//!
//! ```json
//! {
//!   "mqtt": { "server": "broker.local", "port": 1883, "username": "",
//!             "password": "", "client_id": "dashboard" },
//!   "widgets": [
//!     { "name": "Living room", "type": "info_card", "topic": "home/temp",
//!       "position": { "x": 0, "y": 0 }, "size": { "width": 2, "height": 1 } }
//!   ],
//!   "buttons": [
//!     { "gpio": 4, "action": { "type": "mqtt_publish", "topic": "home/light",
//!                              "payload": "toggle" } }
//!   ]
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::layout::Grid;
use crate::widget::{WidgetDescriptor, MAX_WIDGETS};

/// Maximum number of buttons
pub const MAX_BUTTONS: usize = 4;

/// Broker connection, only passed through to the MQTT client
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MqttConfig {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub server: String<128>,
    pub port: u16,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub username: String<64>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub password: String<64>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub client_id: String<64>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        MqttConfig {
            server: String::new(),
            port: 1883,
            username: String::new(),
            password: String::new(),
            client_id: String::new(),
        }
    }
}

impl MqttConfig {
    /// `mqtt://<server>:<port>`
    pub fn broker_url(&self) -> Result<String<160>, fmt::Error> {
        let mut url = String::new();
        write!(url, "mqtt://{}:{}", self.server, self.port)?;
        Ok(url)
    }
}

/// What a button does when pressed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ButtonAction {
    /// e.g. `mqtt_publish`
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", deserialize_with = "crate::de::string")
    )]
    pub kind: String<32>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub topic: String<128>,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::string"))]
    pub payload: String<128>,
}

/// A hardware button
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ButtonConfig {
    pub gpio: u8,
    pub action: ButtonAction,
}

/// Why a configuration was rejected by [`DashboardConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The widget at this index does not fit the grid
    OutOfGrid(usize),
    /// The widget at this index has no topic
    EmptyTopic(usize),
    /// The widget at the second index repeats the topic of the first
    DuplicateTopic(usize, usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfGrid(index) => write!(f, "widget {index} lies outside the grid"),
            Self::EmptyTopic(index) => write!(f, "widget {index} has no topic"),
            Self::DuplicateTopic(first, second) => {
                write!(f, "widget {second} uses the topic of widget {first}")
            }
        }
    }
}

/// The whole configuration file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DashboardConfig {
    pub mqtt: MqttConfig,
    /// Widgets past [`MAX_WIDGETS`] are dropped
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::capped"))]
    pub widgets: Vec<WidgetDescriptor, MAX_WIDGETS>,
    /// Buttons past [`MAX_BUTTONS`] are dropped
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::capped"))]
    pub buttons: Vec<ButtonConfig, MAX_BUTTONS>,
}

impl DashboardConfig {
    /// Topics to subscribe to, in widget order
    pub fn subscribe_topics(&self) -> impl Iterator<Item = &str> + '_ {
        self.widgets.iter().map(|widget| widget.topic.as_str())
    }

    /// Checks what the compositor takes for granted: every widget inside
    /// `grid` and one widget per topic.
    pub fn validate(&self, grid: &Grid) -> Result<(), ConfigError> {
        for (index, widget) in self.widgets.iter().enumerate() {
            if !grid.contains(
                widget.position.x,
                widget.position.y,
                widget.size.width,
                widget.size.height,
            ) {
                return Err(ConfigError::OutOfGrid(index));
            }
            if widget.topic.is_empty() {
                return Err(ConfigError::EmptyTopic(index));
            }
            if let Some(first) = self.widgets[..index]
                .iter()
                .position(|other| other.topic == widget.topic)
            {
                return Err(ConfigError::DuplicateTopic(first, index));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{GridPosition, GridSize, WidgetKind};

    fn widget(topic: &str, x: u32, y: u32, width: u32, height: u32) -> WidgetDescriptor {
        WidgetDescriptor::new(
            "w",
            WidgetKind::InfoCard,
            topic,
            GridPosition { x, y },
            GridSize { width, height },
        )
    }

    fn config_with(widgets: &[WidgetDescriptor]) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        for widget in widgets {
            config.widgets.push(widget.clone()).unwrap();
        }
        config
    }

    #[test]
    fn broker_url() {
        let mut mqtt = MqttConfig::default();
        mqtt.server.push_str("broker.local").unwrap();
        assert_eq!(mqtt.broker_url().unwrap(), "mqtt://broker.local:1883");
    }

    #[test]
    fn topics_in_widget_order() {
        let config = config_with(&[widget("b", 0, 0, 1, 1), widget("a", 1, 0, 1, 1)]);
        let mut topics = config.subscribe_topics();
        assert_eq!(topics.next(), Some("b"));
        assert_eq!(topics.next(), Some("a"));
        assert_eq!(topics.next(), None);
    }

    #[test]
    fn validate() {
        let grid = Grid::for_panel(800, 480);
        assert_eq!(config_with(&[]).validate(&grid), Ok(()));
        assert_eq!(
            config_with(&[widget("a", 0, 0, 4, 3)]).validate(&grid),
            Ok(())
        );
        assert_eq!(
            config_with(&[widget("a", 0, 0, 1, 1), widget("b", 3, 0, 2, 1)]).validate(&grid),
            Err(ConfigError::OutOfGrid(1))
        );
        assert_eq!(
            config_with(&[widget("", 0, 0, 1, 1)]).validate(&grid),
            Err(ConfigError::EmptyTopic(0))
        );
        assert_eq!(
            config_with(&[
                widget("a", 0, 0, 1, 1),
                widget("b", 1, 0, 1, 1),
                widget("a", 2, 0, 1, 1)
            ])
            .validate(&grid),
            Err(ConfigError::DuplicateTopic(0, 2))
        );
    }
}
