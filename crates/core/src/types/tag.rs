//! Product tag classification.
//!
//! Tags are free-form strings. Three are recognized case-insensitively and get
//! a canonical label; everything else is shown verbatim with the generic
//! marker, which shares the preorder styling.

use serde::Serialize;

/// Recognized tag kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMarker {
    New,
    Retired,
    Preorder,
    /// Any unrecognized tag.
    Generic,
}

/// Where a badge is displayed. Each surface has its own class set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSurface {
    Gallery,
    Detail,
}

/// A classified tag ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagBadge {
    pub marker: TagMarker,
    pub label: String,
    pub class: &'static str,
}

impl TagMarker {
    /// Classify raw tag text. Matching ignores ASCII and Unicode case.
    #[must_use]
    pub fn classify(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "new" => Self::New,
            "retired" => Self::Retired,
            "preorder" => Self::Preorder,
            _ => Self::Generic,
        }
    }

    /// Style class for this marker on the given surface.
    #[must_use]
    pub const fn class(self, surface: TagSurface) -> &'static str {
        match (self, surface) {
            (Self::New, TagSurface::Gallery) => "new-tag-dashboard-style",
            (Self::Retired, TagSurface::Gallery) => "retired-tag-style-dashboard",
            (Self::Preorder | Self::Generic, TagSurface::Gallery) => "preorder-tag-dashboard-style",
            (Self::New, TagSurface::Detail) => "new-tag-style",
            (Self::Retired, TagSurface::Detail) => "retired-tag-style",
            (Self::Preorder | Self::Generic, TagSurface::Detail) => "preorder-tag-style",
        }
    }
}

impl TagBadge {
    /// Build the badge for a raw tag.
    #[must_use]
    pub fn classify(tag: &str, surface: TagSurface) -> Self {
        let marker = TagMarker::classify(tag);
        let label = match marker {
            TagMarker::New => "New".to_owned(),
            TagMarker::Retired => "Retired".to_owned(),
            TagMarker::Preorder => "Preorder".to_owned(),
            TagMarker::Generic => tag.to_owned(),
        };
        Self {
            marker,
            label,
            class: marker.class(surface),
        }
    }
}

/// Classify every tag of a product, preserving order.
#[must_use]
pub fn classify_tags(tags: &[String], surface: TagSurface) -> Vec<TagBadge> {
    tags.iter()
        .map(|tag| TagBadge::classify(tag, surface))
        .collect()
}
