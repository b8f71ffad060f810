use crate::tools::{AnnotationTool, DUMMY_TOOL};

/// Absorbs pointer events so no shape drag fires while no real tool is active.
#[derive(Debug, Default)]
pub struct DummyTool;

impl AnnotationTool for DummyTool {
    fn label(&self) -> &'static str {
        DUMMY_TOOL
    }
}
