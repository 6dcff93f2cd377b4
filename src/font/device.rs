//! Device-loss coordination
//!
//! While the rendering device is lost, rasterizers can't be rebuilt, so
//! resize-triggered reloads are suppressed until the device is reset.

use log::{debug, info};

/// Broadcast notifications exchanged with the window manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Rendering device lost; native resources are unusable
    RendererLost,
    /// Rendering device recreated
    RendererReset,
    /// Window or display mode changed size
    WindowResize,
    /// Anything else
    Other(u32),
}

/// GUI message delivered to the font manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMessage {
    /// Broadcast to every listener
    NotifyAll(Notification),
    /// Targeted message (never handled here)
    Other(u32),
}

/// Receiver for notifications the font manager broadcasts
pub trait NotificationSink {
    fn notify_all(&mut self, notification: Notification);
}

impl<F: FnMut(Notification)> NotificationSink for F {
    fn notify_all(&mut self, notification: Notification) {
        self(notification)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceState {
    /// Reload permitted
    #[default]
    Active,
    /// Reload suppressed until the device is reset
    DeviceLost,
}

/// What the font manager has to do in response to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    /// Message not handled
    Ignore,
    /// Device lost, nothing to reload yet
    Suspend,
    /// Rescale all fonts, reusing rasterizers already loaded for the new size
    Reload,
    /// Recreate every rasterizer (device state was lost), then broadcast a resize
    Rebuild,
}

/// Device state machine
#[derive(Debug, Default)]
pub struct DeviceLossCoordinator {
    state: DeviceState,
}

impl DeviceLossCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn on_message(&mut self, message: &GuiMessage) -> DeviceAction {
        let GuiMessage::NotifyAll(notification) = message else {
            return DeviceAction::Ignore;
        };

        match notification {
            Notification::RendererLost => {
                info!("Renderer lost, font reload suspended");
                self.state = DeviceState::DeviceLost;
                DeviceAction::Suspend
            }
            Notification::RendererReset => {
                info!("Renderer reset, reloading fonts");
                self.state = DeviceState::Active;
                DeviceAction::Rebuild
            }
            Notification::WindowResize => match self.state {
                DeviceState::Active => DeviceAction::Reload,
                DeviceState::DeviceLost => {
                    debug!("Window resize while device lost, reload deferred");
                    DeviceAction::Ignore
                }
            },
            Notification::Other(_) => DeviceAction::Ignore,
        }
    }
}
