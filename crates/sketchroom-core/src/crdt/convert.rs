//! Conversion between element types and Loro values.

use crate::elements::{
    DrawPath, Element, ScreenShare, ShapeFigure, ShapeKind, StickyNote,
};
use kurbo::Point;
use loro::{LoroList, LoroMap, LoroMapValue, LoroResult, LoroValue};
use uuid::Uuid;

// Element type identifiers
const TYPE_PATH: &str = "path";
const TYPE_STICKY_NOTE: &str = "sticky-note";
const TYPE_SHAPE: &str = "shape";
const TYPE_SCREEN_SHARE: &str = "screenshare";

// Common keys
const KEY_TYPE: &str = "type";
const KEY_ID: &str = "id";
const KEY_COLOR: &str = "color";
const KEY_STROKE_WIDTH: &str = "stroke_width";

// Position/size keys
const KEY_X: &str = "x";
const KEY_Y: &str = "y";
const KEY_WIDTH: &str = "width";
const KEY_HEIGHT: &str = "height";

// Path keys
const KEY_POINTS: &str = "points";

// Sticky note keys
const KEY_TEXT: &str = "text";

// Shape keys
const KEY_SHAPE_KIND: &str = "shape_kind";
const KEY_START_X: &str = "start_x";
const KEY_START_Y: &str = "start_y";
const KEY_END_X: &str = "end_x";
const KEY_END_Y: &str = "end_y";

// Screen share keys
const KEY_STREAM_ID: &str = "stream_id";
const KEY_USER_ID: &str = "user_id";

const KIND_RECTANGLE: &str = "rectangle";
const KIND_CIRCLE: &str = "circle";
const KIND_TRIANGLE: &str = "triangle";

fn get_double(map: &LoroMapValue, key: &str) -> Option<f64> {
    match map.get(key)? {
        LoroValue::Double(d) => Some(*d),
        LoroValue::I64(i) => Some(*i as f64),
        _ => None,
    }
}

fn get_string(map: &LoroMapValue, key: &str) -> Option<String> {
    match map.get(key)? {
        LoroValue::String(s) => Some(s.to_string()),
        _ => None,
    }
}

fn get_uuid(map: &LoroMapValue, key: &str) -> Option<Uuid> {
    Uuid::parse_str(&get_string(map, key)?).ok()
}

fn shape_kind_str(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Rectangle => KIND_RECTANGLE,
        ShapeKind::Circle => KIND_CIRCLE,
        ShapeKind::Triangle => KIND_TRIANGLE,
    }
}

fn shape_kind_from_str(s: &str) -> Option<ShapeKind> {
    match s {
        KIND_RECTANGLE => Some(ShapeKind::Rectangle),
        KIND_CIRCLE => Some(ShapeKind::Circle),
        KIND_TRIANGLE => Some(ShapeKind::Triangle),
        _ => None,
    }
}

/// Write an element's fields into a Loro map.
pub fn element_to_loro(element: &Element, map: &LoroMap) -> LoroResult<()> {
    match element {
        Element::Path(path) => {
            map.insert(KEY_TYPE, TYPE_PATH)?;
            map.insert(KEY_ID, path.id.to_string())?;
            map.insert(KEY_COLOR, path.color.clone())?;
            map.insert(KEY_STROKE_WIDTH, path.stroke_width)?;

            // Points as a list of [x, y] pairs.
            let points_list = map.insert_container(KEY_POINTS, LoroList::new())?;
            for point in &path.points {
                let pair = points_list.insert_container(points_list.len(), LoroList::new())?;
                pair.push(point.x)?;
                pair.push(point.y)?;
            }
        }
        Element::StickyNote(note) => {
            map.insert(KEY_TYPE, TYPE_STICKY_NOTE)?;
            map.insert(KEY_ID, note.id.to_string())?;
            map.insert(KEY_X, note.position.x)?;
            map.insert(KEY_Y, note.position.y)?;
            map.insert(KEY_TEXT, note.text.clone())?;
            map.insert(KEY_COLOR, note.color.clone())?;
            map.insert(KEY_WIDTH, note.width)?;
            map.insert(KEY_HEIGHT, note.height)?;
        }
        Element::Shape(shape) => {
            map.insert(KEY_TYPE, TYPE_SHAPE)?;
            map.insert(KEY_ID, shape.id.to_string())?;
            map.insert(KEY_SHAPE_KIND, shape_kind_str(shape.kind))?;
            map.insert(KEY_START_X, shape.start.x)?;
            map.insert(KEY_START_Y, shape.start.y)?;
            map.insert(KEY_END_X, shape.end.x)?;
            map.insert(KEY_END_Y, shape.end.y)?;
            map.insert(KEY_COLOR, shape.color.clone())?;
            map.insert(KEY_STROKE_WIDTH, shape.stroke_width)?;
        }
        Element::ScreenShare(share) => {
            map.insert(KEY_TYPE, TYPE_SCREEN_SHARE)?;
            map.insert(KEY_ID, share.id.to_string())?;
            map.insert(KEY_STREAM_ID, share.stream_id.clone())?;
            map.insert(KEY_USER_ID, share.user_id.to_string())?;
            map.insert(KEY_X, share.position.x)?;
            map.insert(KEY_Y, share.position.y)?;
            map.insert(KEY_WIDTH, share.width)?;
            map.insert(KEY_HEIGHT, share.height)?;
        }
    }
    Ok(())
}

/// Read an element back from a Loro map. Unknown type tags yield `None` so
/// newer peers' element kinds are skipped rather than corrupted.
pub fn element_from_loro(map: &LoroMapValue) -> Option<Element> {
    let element_type = get_string(map, KEY_TYPE)?;

    match element_type.as_str() {
        TYPE_PATH => path_from_loro(map),
        TYPE_STICKY_NOTE => sticky_note_from_loro(map),
        TYPE_SHAPE => shape_from_loro(map),
        TYPE_SCREEN_SHARE => screen_share_from_loro(map),
        _ => None,
    }
}

fn path_from_loro(map: &LoroMapValue) -> Option<Element> {
    let id = get_uuid(map, KEY_ID)?;
    let color = get_string(map, KEY_COLOR)?;
    let stroke_width = get_double(map, KEY_STROKE_WIDTH)?;

    let points: Vec<Point> = if let Some(LoroValue::List(list)) = map.get(KEY_POINTS) {
        list.iter()
            .filter_map(|entry| {
                if let LoroValue::List(coords) = entry {
                    if coords.len() >= 2 {
                        let x = match coords.first()? {
                            LoroValue::Double(d) => *d,
                            LoroValue::I64(i) => *i as f64,
                            _ => return None,
                        };
                        let y = match coords.get(1)? {
                            LoroValue::Double(d) => *d,
                            LoroValue::I64(i) => *i as f64,
                            _ => return None,
                        };
                        return Some(Point::new(x, y));
                    }
                }
                None
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(Element::Path(DrawPath {
        id,
        points,
        color,
        stroke_width,
    }))
}

fn sticky_note_from_loro(map: &LoroMapValue) -> Option<Element> {
    Some(Element::StickyNote(StickyNote {
        id: get_uuid(map, KEY_ID)?,
        position: Point::new(get_double(map, KEY_X)?, get_double(map, KEY_Y)?),
        text: get_string(map, KEY_TEXT).unwrap_or_default(),
        color: get_string(map, KEY_COLOR)?,
        width: get_double(map, KEY_WIDTH)?,
        height: get_double(map, KEY_HEIGHT)?,
    }))
}

fn shape_from_loro(map: &LoroMapValue) -> Option<Element> {
    Some(Element::Shape(ShapeFigure {
        id: get_uuid(map, KEY_ID)?,
        kind: shape_kind_from_str(&get_string(map, KEY_SHAPE_KIND)?)?,
        start: Point::new(get_double(map, KEY_START_X)?, get_double(map, KEY_START_Y)?),
        end: Point::new(get_double(map, KEY_END_X)?, get_double(map, KEY_END_Y)?),
        color: get_string(map, KEY_COLOR)?,
        stroke_width: get_double(map, KEY_STROKE_WIDTH)?,
    }))
}

fn screen_share_from_loro(map: &LoroMapValue) -> Option<Element> {
    Some(Element::ScreenShare(ScreenShare {
        id: get_uuid(map, KEY_ID)?,
        stream_id: get_string(map, KEY_STREAM_ID)?,
        user_id: get_uuid(map, KEY_USER_ID)?,
        position: Point::new(get_double(map, KEY_X)?, get_double(map, KEY_Y)?),
        width: get_double(map, KEY_WIDTH)?,
        height: get_double(map, KEY_HEIGHT)?,
    }))
}
