use std::fmt;

/// Pixel dimensions of the provider's "image removed" stand-in.
pub const PLACEHOLDER_DIMENSIONS: (u32, u32) = (161, 81);

/// Resolution-derived destination category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResolutionBucket {
    Qhd,
    FullHd,
    Large,
    Others,
}

impl ResolutionBucket {
    pub const ALL: [ResolutionBucket; 4] = [
        ResolutionBucket::Qhd,
        ResolutionBucket::FullHd,
        ResolutionBucket::Large,
        ResolutionBucket::Others,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            ResolutionBucket::Qhd => "2560x1440",
            ResolutionBucket::FullHd => "1920x1080",
            ResolutionBucket::Large => "large",
            ResolutionBucket::Others => "others",
        }
    }
}

impl fmt::Display for ResolutionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Content partition derived from the provider's thumbnail marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Sensitivity {
    #[default]
    Normal,
    Nsfw,
}

impl Sensitivity {
    pub const ALL: [Sensitivity; 2] = [Sensitivity::Normal, Sensitivity::Nsfw];

    pub fn from_flag(sensitive: bool) -> Self {
        if sensitive {
            Sensitivity::Nsfw
        } else {
            Sensitivity::Normal
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Sensitivity::Normal => "normal",
            Sensitivity::Nsfw => "nsfw",
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Map decoded pixel dimensions to a bucket. First matching rule wins:
/// - `2560x1440`: width 2400..=2560, height 1300..=1640
/// - `1920x1080`: width 1800..=2020, height 900..=1280
/// - `large`: width >= 2560 and height >= 1640
/// - `others`: everything else
pub fn classify(width: u32, height: u32) -> ResolutionBucket {
    if (2400..=2560).contains(&width) && (1300..=1640).contains(&height) {
        ResolutionBucket::Qhd
    } else if (1800..=2020).contains(&width) && (900..=1280).contains(&height) {
        ResolutionBucket::FullHd
    } else if width >= 2560 && height >= 1640 {
        ResolutionBucket::Large
    } else {
        ResolutionBucket::Others
    }
}

pub fn is_placeholder(width: u32, height: u32) -> bool {
    (width, height) == PLACEHOLDER_DIMENSIONS
}
