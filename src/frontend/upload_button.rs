//! Upload button decoration: a transparent native multi-file input laid over
//! the host's only child, so clicking the styled button opens the file picker.

use super::dom::{BoxGeometry, Element};
use super::registry::{Directive, DirectiveRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

pub const DIRECTIVE_NAME: &str = "file-upload-button";

/// Set on the host once decorated so a second attachment is refused.
pub const DECORATED_MARKER: &str = "data-upload-overlay";

const OVERLAY_Z_INDEX: &str = "2";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecorateError {
    #[error("upload button host must contain exactly one child, found {0}")]
    ChildCount(usize),
    #[error("element is already decorated")]
    AlreadyDecorated,
}

/// What the planner needs to know about the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub bounds: BoxGeometry,
    pub child_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPlan {
    pub host_style: BTreeMap<String, String>,
    pub input_tag: String,
    pub input_attributes: BTreeMap<String, String>,
    pub input_style: BTreeMap<String, String>,
    /// Resolved input box, relative to the host.
    pub overlay_box: BoxGeometry,
    /// Child index the input is appended at.
    pub append_index: usize,
}

impl OverlayPlan {
    pub fn input_element(&self) -> Element {
        let mut input = Element::new(&self.input_tag).with_layout(self.overlay_box);
        for (name, value) in &self.input_attributes {
            input.set_attr(name, value);
        }
        input.css(&self.input_style);
        input
    }
}

fn rules(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn plan_overlay(host: HostSnapshot) -> Result<OverlayPlan, DecorateError> {
    if host.child_count != 1 {
        return Err(DecorateError::ChildCount(host.child_count));
    }

    Ok(OverlayPlan {
        host_style: rules(&[("position", "relative"), ("overflow", "hidden")]),
        input_tag: "input".to_string(),
        input_attributes: rules(&[("type", "file"), ("multiple", "")]),
        input_style: rules(&[
            ("position", "absolute"),
            ("top", "0"),
            ("left", "0"),
            ("z-index", OVERLAY_Z_INDEX),
            ("width", "100%"),
            ("height", "100%"),
            ("opacity", "0"),
            ("cursor", "pointer"),
        ]),
        overlay_box: BoxGeometry::new(0.0, 0.0, host.bounds.width, host.bounds.height),
        append_index: host.child_count,
    })
}

/// Handle to an applied overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub input_index: usize,
    pub multiple: bool,
}

impl Binding {
    /// The input lives in the host's subtree and goes away with it; nothing to release.
    pub fn release(self) {}
}

pub fn decorate(host: &mut Element) -> Result<Binding, DecorateError> {
    if host.has_attr(DECORATED_MARKER) {
        return Err(DecorateError::AlreadyDecorated);
    }

    let plan = plan_overlay(HostSnapshot {
        bounds: host.layout,
        child_count: host.children.len(),
    })?;

    host.css(&plan.host_style);
    let input = plan.input_element();
    let multiple = input.has_attr("multiple");
    host.append(input);
    host.set_attr(DECORATED_MARKER, "");

    debug!("Decorated <{}> with upload overlay", host.tag);
    Ok(Binding {
        input_index: plan.append_index,
        multiple,
    })
}

struct UploadButton;

impl Directive for UploadButton {
    fn link(&self, element: &mut Element) -> Result<(), DecorateError> {
        decorate(element).map(|_| ())
    }
}

/// Registers the upload button under [`DIRECTIVE_NAME`].
pub fn register_upload_button(registry: &mut DirectiveRegistry) {
    registry.register(DIRECTIVE_NAME, UploadButton);
}
