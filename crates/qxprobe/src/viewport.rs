//! Viewport geometry from a single observed click.
//!
//! A click carries both screen and page coordinates; their difference is the
//! screen position of the page origin. Together with the window size this
//! gives an X11-style geometry string, `WxH+X+Y`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Name of the stored variable that receives the geometry string
pub const VIEWPORT_VAR: &str = "ViewportStr";

/// What a click listener sees of one click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickObservation {
    /// Screen X
    pub screen_x: i64,
    /// Screen Y
    pub screen_y: i64,
    /// Client (viewport) X
    pub client_x: i64,
    /// Client (viewport) Y
    pub client_y: i64,
    /// Page X, 0 when the host does not report it
    pub page_x: i64,
    /// Page Y, 0 when the host does not report it
    pub page_y: i64,
    /// Horizontal scroll offset of the document
    pub scroll_x: i64,
    /// Vertical scroll offset of the document
    pub scroll_y: i64,
    /// Inner window width
    pub window_width: u32,
    /// Inner window height
    pub window_height: u32,
}

impl ClickObservation {
    /// Mouse position relative to the page.
    ///
    /// Page coordinates when any is set, else client coordinates plus the
    /// scroll offsets, else the origin.
    #[must_use]
    pub const fn page_position(&self) -> (i64, i64) {
        if self.page_x != 0 || self.page_y != 0 {
            (self.page_x, self.page_y)
        } else if self.client_x != 0 || self.client_y != 0 {
            (self.client_x + self.scroll_x, self.client_y + self.scroll_y)
        } else {
            (0, 0)
        }
    }
}

/// Window size and the screen position of the page origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportGeometry {
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
    /// Screen X of the page origin
    pub origin_x: i64,
    /// Screen Y of the page origin
    pub origin_y: i64,
}

impl ViewportGeometry {
    /// Compute the geometry from one click
    #[must_use]
    pub fn from_click(click: &ClickObservation) -> Self {
        let (mouse_x, mouse_y) = click.page_position();
        debug!(
            screen_x = click.screen_x,
            screen_y = click.screen_y,
            mouse_x,
            mouse_y,
            "viewport: click observed"
        );
        let geometry = Self {
            width: click.window_width,
            height: click.window_height,
            origin_x: click.screen_x - mouse_x,
            origin_y: click.screen_y - mouse_y,
        };
        info!(%geometry, "Page geometry (WxH+X+Y)");
        geometry
    }
}

impl fmt::Display for ViewportGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.origin_x, self.origin_y
        )
    }
}
