use slidemark_core::Size;

/// The drawing surface: backing size, repaint counter and pointer state.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    size: Size,
    redraws: u64,
    pointer_events: bool,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            redraws: 0,
            pointer_events: true,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn redraw(&mut self) {
        self.redraws += 1;
        tracing::debug!("Refreshing canvas ({} redraws)", self.redraws);
    }

    /// Number of repaints issued since the scene was created.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn pointer_events_enabled(&self) -> bool {
        self.pointer_events
    }

    pub fn set_pointer_events(&mut self, enabled: bool) {
        self.pointer_events = enabled;
    }
}
