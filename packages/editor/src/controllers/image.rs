use crate::errors::{EditorError, OpError};
use crate::operation::Operation;
use crate::ops::{AddStyle, AddStyleSpec, InsertImage, InsertImageSpec, SetBlob, SetBlobSpec};
use crate::session::{EnqueueReport, Session, SessionContext};
use odt_document::{ObjectNameGenerator, StyleFamily, StyleProperties, StyleProperty};
use std::collections::BTreeMap;
use tracing::info;

/// Screen pixels per centimeter used when sizing frames
pub const PIXELS_PER_CM: f64 = 37.8;

/// Common graphic style every frame style derives from
const GRAPHICS_STYLE_NAME: &str = "Graphics";

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentSize {
    pub width: f64,
    pub height: f64,
}

impl ContentSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Shrink to fit inside `available`, keeping the aspect ratio. Sizes that
    /// already fit are returned unchanged.
    pub fn scale_to_fit(self, available: ContentSize) -> ContentSize {
        let mut width_ratio = 1.0;
        let mut height_ratio = 1.0;
        if self.width > available.width {
            width_ratio = available.width / self.width;
        }
        if self.height > available.height {
            height_ratio = available.height / self.height;
        }
        let ratio = f64::min(width_ratio, height_ratio);

        ContentSize {
            width: self.width * ratio,
            height: self.height * ratio,
        }
    }
}

/// Package file extension for a supported image mimetype
pub fn file_extension(mimetype: &str) -> Option<&'static str> {
    match mimetype.to_ascii_lowercase().as_str() {
        "image/gif" => Some(".gif"),
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        _ => None,
    }
}

/// Builds image insertion batches for one member
#[derive(Debug, Clone)]
pub struct ImageController {
    context: SessionContext,
    names: ObjectNameGenerator,
    page_content_size: Option<ContentSize>,
}

impl ImageController {
    pub fn new(context: SessionContext) -> Self {
        let names = ObjectNameGenerator::new(&context.member_id);
        Self {
            context,
            names,
            page_content_size: None,
        }
    }

    /// Scale inserted images down to this area
    pub fn with_page_content_size(mut self, size: ContentSize) -> Self {
        self.page_content_size = Some(size);
        self
    }

    /// Insert an image at the member's cursor.
    ///
    /// The batch stores the blob, adds the common `Graphics` style if the
    /// document lacks it, adds an automatic frame style and places the frame.
    pub fn insert_image(
        &mut self,
        session: &mut Session,
        mimetype: &str,
        content: &str,
        width_px: f64,
        height_px: f64,
    ) -> Result<EnqueueReport, EditorError> {
        let position = session
            .document()
            .cursor(&self.context.member_id)
            .map(|cursor| cursor.position)
            .unwrap_or(0);
        self.insert_image_at(session, position, mimetype, content, width_px, height_px)
    }

    /// Insert an image at an explicit position
    pub fn insert_image_at(
        &mut self,
        session: &mut Session,
        position: usize,
        mimetype: &str,
        content: &str,
        width_px: f64,
        height_px: f64,
    ) -> Result<EnqueueReport, EditorError> {
        let extension = file_extension(mimetype).ok_or_else(|| {
            OpError::Validation(format!("image type is not supported: {}", mimetype))
        })?;
        if !(width_px > 0.0 && height_px > 0.0) {
            return Err(OpError::Validation(
                "both width and height of the image must be greater than 0px".to_string(),
            )
            .into());
        }

        let mut size = ContentSize::new(width_px, height_px);
        if let Some(available) = self.page_content_size {
            size = size.scale_to_fit(available);
        }

        let doc = session.document();
        let member = self.context.member_id.clone();
        let filename = format!("Pictures/{}{}", self.names.generate_image_name(doc), extension);
        let mut operations: Vec<Box<dyn Operation>> = Vec::new();

        operations.push(Box::new(SetBlob::init(SetBlobSpec {
            memberid: member.clone(),
            timestamp: None,
            filename: filename.clone(),
            mimetype: mimetype.to_string(),
            content: content.to_string(),
        })?));

        if !doc
            .common_styles()
            .contains(GRAPHICS_STYLE_NAME, StyleFamily::Graphic)
        {
            operations.push(Box::new(AddStyle::init(AddStyleSpec {
                memberid: member.clone(),
                timestamp: None,
                style_name: GRAPHICS_STYLE_NAME.to_string(),
                style_family: StyleFamily::Graphic.to_string(),
                is_automatic_style: false,
                set_properties: graphics_style_properties(),
            })?));
        }

        let frame_style_name = self.names.generate_style_name(doc);
        operations.push(Box::new(AddStyle::init(AddStyleSpec {
            memberid: member.clone(),
            timestamp: None,
            style_name: frame_style_name.clone(),
            style_family: StyleFamily::Graphic.to_string(),
            is_automatic_style: true,
            set_properties: frame_style_properties(GRAPHICS_STYLE_NAME),
        })?));

        let frame_name = self.names.generate_frame_name(doc);
        operations.push(Box::new(InsertImage::init(InsertImageSpec {
            memberid: member.clone(),
            timestamp: None,
            position,
            filename: filename.clone(),
            frame_width: format!("{}cm", size.width / PIXELS_PER_CM),
            frame_height: format!("{}cm", size.height / PIXELS_PER_CM),
            frame_style_name,
            frame_name,
        })?));

        let report = session.enqueue(operations)?;
        info!(%member, %filename, position, "Image inserted");
        Ok(report)
    }
}

fn properties(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn graphics_style_properties() -> StyleProperties {
    let mut props = StyleProperties::new();
    props.insert(
        "style:graphic-properties".to_string(),
        StyleProperty::Group(properties(&[
            ("text:anchor-type", "paragraph"),
            ("svg:x", "0cm"),
            ("svg:y", "0cm"),
            ("style:wrap", "dynamic"),
            ("style:number-wrapped-paragraphs", "no-limit"),
            ("style:wrap-contour", "false"),
            ("style:vertical-pos", "top"),
            ("style:vertical-rel", "paragraph"),
            ("style:horizontal-pos", "center"),
            ("style:horizontal-rel", "paragraph"),
        ])),
    );
    props
}

fn frame_style_properties(parent_style_name: &str) -> StyleProperties {
    let mut props = StyleProperties::new();
    props.insert(
        "style:parent-style-name".to_string(),
        StyleProperty::Value(parent_style_name.to_string()),
    );
    props.insert(
        "style:graphic-properties".to_string(),
        StyleProperty::Group(properties(&[
            ("style:vertical-pos", "top"),
            ("style:vertical-rel", "baseline"),
            ("style:horizontal-pos", "center"),
            ("style:horizontal-rel", "paragraph"),
            ("fo:background-color", "transparent"),
            ("style:background-transparency", "100%"),
            ("style:shadow", "none"),
            ("style:mirror", "none"),
            ("fo:clip", "rect(0cm, 0cm, 0cm, 0cm)"),
            ("draw:luminance", "0%"),
            ("draw:contrast", "0%"),
            ("draw:red", "0%"),
            ("draw:green", "0%"),
            ("draw:blue", "0%"),
            ("draw:gamma", "100%"),
            ("draw:color-inversion", "false"),
            ("draw:image-opacity", "100%"),
            ("draw:color-mode", "standard"),
        ])),
    );
    props
}
