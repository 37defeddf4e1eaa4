//! The closed set of owner-scoped resource kinds.

use core::str::FromStr;

use folio_core::DomainError;

/// One of the five content kinds that share the generic item-route contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Website,
    MusicWork,
    Contribution,
    Skill,
    Education,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Website,
        ResourceKind::MusicWork,
        ResourceKind::Contribution,
        ResourceKind::Skill,
        ResourceKind::Education,
    ];

    /// First URL path segment for this kind (`/websites`, `/music`, ...).
    pub const fn segment(&self) -> &'static str {
        match self {
            ResourceKind::Website => "websites",
            ResourceKind::MusicWork => "music",
            ResourceKind::Contribution => "contributions",
            ResourceKind::Skill => "skills",
            ResourceKind::Education => "education",
        }
    }

    /// Storage table holding rows of this kind.
    pub const fn table(&self) -> &'static str {
        match self {
            ResourceKind::Website => "websites",
            ResourceKind::MusicWork => "music_works",
            ResourceKind::Contribution => "contributions",
            ResourceKind::Skill => "skills",
            ResourceKind::Education => "educations",
        }
    }

    pub const fn supports_delete(&self) -> bool {
        matches!(self, ResourceKind::Skill)
    }

    /// Whether a successful create must notify the site regenerator.
    pub const fn notifies_on_create(&self) -> bool {
        matches!(self, ResourceKind::Website)
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.segment() == segment)
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for ResourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_segment(s).ok_or_else(|| DomainError::validation(format!("unknown resource type '{s}'")))
    }
}
