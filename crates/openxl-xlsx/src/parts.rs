//! Part paths, namespaces and relationship types
//!
//! These strings are part of the external file-format contract.

use std::collections::BTreeMap;

/// Marshalled parts: part path -> XML text
pub type PartMap = BTreeMap<String, String>;

/// Raw parts read from a package: part path -> bytes
pub type PartSet = BTreeMap<String, Vec<u8>>;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const ROOT_RELS_PART: &str = "_rels/.rels";
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Directory that workbook relationship targets are relative to
pub const WORKBOOK_DIR: &str = "xl";

/// SpreadsheetML main namespace
pub const SPREADSHEETML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Package relationships namespace (root of `.rels` parts)
pub const PACKAGE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// Office document relationships namespace (the `r:` prefix)
pub const OFFICE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Content types namespace
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship type URIs
pub mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const CHARTSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chartsheet";
    pub const SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
}

/// Content types for the parts this crate writes
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const WORKBOOK: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
    pub const SHARED_STRINGS: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";
}

/// Path of the `n`th worksheet part (1-based)
pub fn worksheet_part(n: usize) -> String {
    format!("{}/{}", WORKBOOK_DIR, worksheet_target(n))
}

/// Workbook-relative relationship target of the `n`th worksheet (1-based)
pub fn worksheet_target(n: usize) -> String {
    format!("worksheets/sheet{}.xml", n)
}

/// Resolve a relationship target against the directory of its source part
///
/// Absolute targets (leading `/`) are package-rooted; `.` and `..`
/// segments are folded.
///
/// ```
/// use openxl_xlsx::parts::resolve_target;
///
/// assert_eq!(resolve_target("xl", "worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
/// assert_eq!(resolve_target("xl", "/xl/sharedStrings.xml"), "xl/sharedStrings.xml");
/// assert_eq!(resolve_target("xl/worksheets", "../sharedStrings.xml"), "xl/sharedStrings.xml");
/// ```
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let (mut segments, target) = match target.strip_prefix('/') {
        Some(absolute) => (Vec::new(), absolute),
        None => (
            base_dir.split('/').filter(|s| !s.is_empty()).collect(),
            target,
        ),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}
