//! Point markers.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use slidemark_core::{AnnotationEvent, Point, Shared, StyleOverrides};

use crate::controller::{AnnotationsController, DeletionWatcher};
use crate::model::GeometryJson;
use crate::tools::{AnnotationTool, IMAGE_MARKING_TOOL};

/// Prefix of the ids given to new markers.
pub const MARKER_LABEL_PREFIX: &str = "marker";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Marker diameter, in canvas units.
    pub marker_size: f64,
    /// Maximum number of markers; 0 means unlimited.
    pub limit: usize,
    pub style: StyleOverrides,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            marker_size: 10.0,
            limit: 0,
            style: StyleOverrides::default(),
        }
    }
}

impl MarkerConfig {
    pub fn radius(&self) -> f64 {
        self.marker_size / 2.0
    }
}

/// Marker IDs in insertion order, kept in sync with registry deletions.
#[derive(Debug, Default)]
struct MarkerBook {
    markers: RefCell<Vec<String>>,
}

impl MarkerBook {
    fn contains(&self, shape_id: &str) -> bool {
        self.markers.borrow().iter().any(|id| id == shape_id)
    }

    fn push(&self, shape_id: &str) {
        self.markers.borrow_mut().push(shape_id.to_string());
    }

    fn len(&self) -> usize {
        self.markers.borrow().len()
    }

    fn ids(&self) -> Vec<String> {
        self.markers.borrow().clone()
    }
}

impl DeletionWatcher for MarkerBook {
    fn shape_deleted(&self, shape_id: &str) -> Option<AnnotationEvent> {
        let mut markers = self.markers.borrow_mut();
        let index = markers.iter().position(|id| id == shape_id)?;
        markers.remove(index);
        Some(AnnotationEvent::MarkerDeleted {
            shape_id: shape_id.to_string(),
        })
    }
}

/// Drops a fixed-size circular marker on every pointer-down.
pub struct MarkerTool {
    controller: Shared<AnnotationsController>,
    config: MarkerConfig,
    book: Rc<MarkerBook>,
}

impl MarkerTool {
    pub fn new(controller: Shared<AnnotationsController>, config: MarkerConfig) -> Self {
        let book = Rc::new(MarkerBook::default());
        controller
            .borrow_mut()
            .watch_deletions(Rc::clone(&book) as Rc<dyn DeletionWatcher>);
        Self {
            controller,
            config,
            book,
        }
    }

    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    fn watcher(&self) -> Rc<dyn DeletionWatcher> {
        Rc::clone(&self.book) as Rc<dyn DeletionWatcher>
    }

    /// Replaces the marker style; size and limit are kept.
    pub fn update_markers_config(&mut self, style: StyleOverrides) {
        self.config.style = style;
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.config.limit = limit;
    }

    pub fn get_markers_id(&self) -> Vec<String> {
        self.book.ids()
    }

    fn limit_reached(&self) -> bool {
        self.config.limit != 0 && self.book.len() >= self.config.limit
    }

    /// Adds a marker at a canvas-space point, honouring the limit.
    pub fn add_marker(&mut self, point: Point) -> Option<String> {
        if self.limit_reached() {
            tracing::debug!(
                "Marker limit {} reached, ignoring click at ({}, {})",
                self.config.limit,
                point.x,
                point.y
            );
            return None;
        }
        let (center, shape_id) = {
            let controller = self.controller.borrow();
            (
                controller.to_image_point(point),
                controller.get_first_available_label(MARKER_LABEL_PREFIX),
            )
        };
        self.create_marker(&shape_id, center).then_some(shape_id)
    }

    /// `center` is in image space.
    fn create_marker(&mut self, shape_id: &str, center: Point) -> bool {
        let mut controller = self.controller.borrow_mut();
        let drawn = controller.draw_circle(
            shape_id,
            center.x,
            center.y,
            self.config.radius(),
            None,
            &self.config.style,
            true,
        );
        if let Err(e) = drawn {
            tracing::error!("Unable to create marker {}: {}", shape_id, e);
            return false;
        }
        self.book.push(shape_id);
        controller.notify_canvas(AnnotationEvent::MarkerCreated {
            shape_id: shape_id.to_string(),
        });
        true
    }

    pub fn remove_marker(&mut self, shape_id: &str) {
        if !self.book.contains(shape_id) {
            tracing::warn!("{} is not a marker", shape_id);
            return;
        }
        self.controller.borrow_mut().delete_shape(shape_id, true);
    }

    pub fn clear_markers(&mut self) {
        let ids = self.book.ids();
        self.controller.borrow_mut().delete_shapes(Some(&ids));
    }

    /// Turns a registered circle into a marker with the same ID.
    pub fn shape_to_marker(&mut self, shape_id: &str) -> bool {
        if self.book.contains(shape_id) {
            tracing::warn!("{} is already a marker", shape_id);
            return false;
        }
        let json = self.controller.borrow().get_shape_json(shape_id);
        let Some(json) = json else {
            return false;
        };
        let GeometryJson::Circle {
            center_x, center_y, ..
        } = &json.geometry
        else {
            tracing::warn!("{} is a {}, only circles become markers", shape_id, json.shape_type());
            return false;
        };
        self.controller.borrow_mut().delete_shape(shape_id, false);
        self.create_marker(shape_id, Point::new(*center_x, *center_y))
    }

    pub fn shapes_to_markers(&mut self, shape_ids: &[String]) {
        for shape_id in shape_ids {
            self.shape_to_marker(shape_id);
        }
    }
}

impl Drop for MarkerTool {
    fn drop(&mut self) {
        let watcher = self.watcher();
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => {
                controller.unwatch_deletions(&watcher);
            }
            Err(_) => tracing::warn!("Registry busy, marker watcher left registered"),
        }
    }
}

impl AnnotationTool for MarkerTool {
    fn label(&self) -> &'static str {
        IMAGE_MARKING_TOOL
    }

    fn on_pointer_down(&mut self, point: Point) {
        self.add_marker(point);
    }
}
