// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Low-level page edits on a loaded `lopdf::Document`: size lookup, resource
// registration, and content appending.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use stempel_core::error::StempelError;

/// US Letter, the PDF default when no MediaBox can be found.
const FALLBACK_SIZE: (f32, f32) = (612.0, 792.0);

/// Upper bound on Parent links followed, in case of a cyclic page tree.
const MAX_TREE_DEPTH: usize = 64;

/// Resource sub-dictionaries the stamper adds names to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Font,
    ExtGState,
    XObject,
}

impl ResourceKind {
    fn key(self) -> &'static [u8] {
        match self {
            Self::Font => b"Font",
            Self::ExtGState => b"ExtGState",
            Self::XObject => b"XObject",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Font => "StF",
            Self::ExtGState => "StGS",
            Self::XObject => "StIm",
        }
    }
}

fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, StempelError> {
    doc.get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|err| StempelError::PdfError(format!("page {:?} is not a dictionary: {}", page_id, err)))
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, StempelError> {
    doc.get_object_mut(page_id)
        .and_then(|o| o.as_dict_mut())
        .map_err(|err| StempelError::PdfError(format!("page {:?} is not a dictionary: {}", page_id, err)))
}

/// Walk from `page_id` up the page tree and return the first value of `key`,
/// honouring attribute inheritance.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_object(current?).and_then(|o| o.as_dict()).ok()?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            };
        }
        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }
    None
}

fn obj_to_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

/// Width and height of a page in points, from its (possibly inherited)
/// MediaBox.
pub fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let media_box = inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .filter(|arr| arr.len() == 4)
        .and_then(|arr| {
            let llx = obj_to_f32(&arr[0])?;
            let lly = obj_to_f32(&arr[1])?;
            let urx = obj_to_f32(&arr[2])?;
            let ury = obj_to_f32(&arr[3])?;
            Some(((urx - llx).abs(), (ury - lly).abs()))
        });
    media_box.unwrap_or(FALLBACK_SIZE)
}

/// Register `target` under a fresh name in the page's resources and return
/// that name.
///
/// The page ends up with its own inline resource dictionary, copied from
/// whatever it referenced or inherited, so shared resource dictionaries of
/// other pages are never touched.
pub fn register_resource(
    doc: &mut Document,
    page_id: ObjectId,
    kind: ResourceKind,
    target: ObjectId,
) -> Result<Vec<u8>, StempelError> {
    let mut resources = inherited(doc, page_id, b"Resources")
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);

    let mut entries = match resources.get(kind.key()) {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).cloned().unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    };

    let name = unique_name(&entries, kind.prefix());
    entries.set(name.clone(), Object::Reference(target));
    resources.set(kind.key(), Object::Dictionary(entries));
    page_dict_mut(doc, page_id)?.set("Resources", Object::Dictionary(resources));
    Ok(name)
}

fn unique_name(entries: &Dictionary, prefix: &str) -> Vec<u8> {
    let mut index = 0usize;
    loop {
        let candidate = format!("{prefix}{index}").into_bytes();
        if !entries.has(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

/// Append `content` to the page so it draws on top of everything already
/// there.
///
/// Existing content is wrapped in `q`/`Q` so graphics state it leaves
/// behind cannot leak into the appended operators.
pub fn append_content(doc: &mut Document, page_id: ObjectId, content: Vec<u8>) -> Result<(), StempelError> {
    let existing = page_dict(doc, page_id)?.get(b"Contents").ok().cloned();
    let mut streams = match existing {
        Some(Object::Array(items)) => items,
        Some(Object::Reference(id)) => match doc.get_object(id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(id)],
        },
        _ => Vec::new(),
    };

    let content = if streams.is_empty() {
        content
    } else {
        let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        streams.insert(0, Object::Reference(open));
        [b"Q\n".as_slice(), &content].concat()
    };

    let appended = doc.add_object(Stream::new(Dictionary::new(), content));
    streams.push(Object::Reference(appended));
    page_dict_mut(doc, page_id)?.set("Contents", Object::Array(streams));
    Ok(())
}
