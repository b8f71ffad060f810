//! Notification definitions for the event bus.
//!
//! Each variant maps to the notification name the drawing tools have
//! always emitted, see [`AnnotationEvent::name`].

use serde::{Deserialize, Serialize};

use crate::data::Point;

/// A notification together with the element it is emitted on
/// (the canvas, or a ruler's output element).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNotification {
    pub target: String,
    pub event: AnnotationEvent,
}

impl CanvasNotification {
    pub fn new(target: impl Into<String>, event: AnnotationEvent) -> Self {
        Self {
            target: target.into(),
            event,
        }
    }
}

/// Root notification enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum AnnotationEvent {
    FreehandPolygonCreated { point: Point },
    FreehandPolygonUpdated { point: Point },
    FreehandPolygonPaused { shape_id: String },
    FreehandPolygonRestored { shape_id: String },
    FreehandPolygonSaved { shape_id: String },
    FreehandPolygonCleared,

    PolygonCreated { point: Point },
    PolygonAddPoint { point: Point },
    PolygonPaused { shape_id: String },
    PolygonRestored { shape_id: String },
    PolygonSaved { shape_id: String },
    PolygonCleared,

    StartNewAreaRuler,
    AreaRulerCreated { point: Point },
    AreaRulerUpdated { measure: Option<f64> },
    AreaRulerCleared { saved: bool },
    AreaRulerEmptyIntersection,

    StartNewRuler,
    RulerCreated,
    RulerUpdated { measure: Option<f64> },
    RulerCleared { saved: bool },

    MarkerCreated { shape_id: String },
    MarkerDeleted { shape_id: String },
}

impl AnnotationEvent {
    /// Notification name as seen by UI glue code
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationEvent::FreehandPolygonCreated { .. } => "freehand_polygon_created",
            AnnotationEvent::FreehandPolygonUpdated { .. } => "freehand_polygon_updated",
            AnnotationEvent::FreehandPolygonPaused { .. } => "freehand_polygon_paused",
            AnnotationEvent::FreehandPolygonRestored { .. } => "freehand_polygon_restored",
            AnnotationEvent::FreehandPolygonSaved { .. } => "freehand_polygon_saved",
            AnnotationEvent::FreehandPolygonCleared => "freehand_polygon_cleared",
            AnnotationEvent::PolygonCreated { .. } => "polygon_created",
            AnnotationEvent::PolygonAddPoint { .. } => "polygon_add_point",
            AnnotationEvent::PolygonPaused { .. } => "polygon_paused",
            AnnotationEvent::PolygonRestored { .. } => "polygon_restored",
            AnnotationEvent::PolygonSaved { .. } => "polygon_saved",
            AnnotationEvent::PolygonCleared => "polygon_cleared",
            AnnotationEvent::StartNewAreaRuler => "start_new_area_ruler",
            AnnotationEvent::AreaRulerCreated { .. } => "area_ruler_created",
            AnnotationEvent::AreaRulerUpdated { .. } => "area_ruler_updated",
            AnnotationEvent::AreaRulerCleared { .. } => "area_ruler_cleared",
            AnnotationEvent::AreaRulerEmptyIntersection => "area_ruler_empty_intersection",
            AnnotationEvent::StartNewRuler => "start_new_ruler",
            AnnotationEvent::RulerCreated => "ruler_created",
            AnnotationEvent::RulerUpdated { .. } => "ruler_updated",
            AnnotationEvent::RulerCleared { .. } => "ruler_cleared",
            AnnotationEvent::MarkerCreated { .. } => "marker_created",
            AnnotationEvent::MarkerDeleted { .. } => "marker_deleted",
        }
    }

    /// Get the category of this notification
    pub fn category(&self) -> EventCategory {
        match self {
            AnnotationEvent::FreehandPolygonCreated { .. }
            | AnnotationEvent::FreehandPolygonUpdated { .. }
            | AnnotationEvent::FreehandPolygonPaused { .. }
            | AnnotationEvent::FreehandPolygonRestored { .. }
            | AnnotationEvent::FreehandPolygonSaved { .. }
            | AnnotationEvent::FreehandPolygonCleared => EventCategory::Freehand,
            AnnotationEvent::PolygonCreated { .. }
            | AnnotationEvent::PolygonAddPoint { .. }
            | AnnotationEvent::PolygonPaused { .. }
            | AnnotationEvent::PolygonRestored { .. }
            | AnnotationEvent::PolygonSaved { .. }
            | AnnotationEvent::PolygonCleared => EventCategory::Polygon,
            AnnotationEvent::StartNewAreaRuler
            | AnnotationEvent::AreaRulerCreated { .. }
            | AnnotationEvent::AreaRulerUpdated { .. }
            | AnnotationEvent::AreaRulerCleared { .. }
            | AnnotationEvent::AreaRulerEmptyIntersection => EventCategory::AreaRuler,
            AnnotationEvent::StartNewRuler
            | AnnotationEvent::RulerCreated
            | AnnotationEvent::RulerUpdated { .. }
            | AnnotationEvent::RulerCleared { .. } => EventCategory::Ruler,
            AnnotationEvent::MarkerCreated { .. } | AnnotationEvent::MarkerDeleted { .. } => {
                EventCategory::Marker
            }
        }
    }
}

/// Notification category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Freehand,
    Polygon,
    AreaRuler,
    Ruler,
    Marker,
}
