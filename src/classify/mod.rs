use std::str::FromStr;

/// Buckets spending is aggregated into. `Unmatched` is the catch-all for
/// categories carrying no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Bucket {
    Want,
    Need,
    Save,
    Work,
    Unmatched,
}

impl Bucket {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Bucket::Want => "Want",
            Bucket::Need => "Need",
            Bucket::Save => "Save",
            Bucket::Work => "Work",
            Bucket::Unmatched => "Other",
        }
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Bucket, String> {
        match s.to_ascii_lowercase().as_str() {
            "want" => Ok(Bucket::Want),
            "need" => Ok(Bucket::Need),
            "save" => Ok(Bucket::Save),
            "work" => Ok(Bucket::Work),
            "other" | "unmatched" => Ok(Bucket::Unmatched),
            _ => Err(format!("unknown bucket '{s}', expected want, need, save, work or other")),
        }
    }
}

/// clap value parser for `--exclude`.
pub(crate) fn parse_bucket(s: &str) -> Result<Bucket, String> {
    Bucket::from_str(s)
}

/// Marker table matching the emoji conventions used in category names.
/// Declaration order is also the order buckets appear in the report.
pub(crate) const DEFAULT_MARKERS: &[(&str, Bucket)] = &[
    ("🟠", Bucket::Want),
    ("🔴", Bucket::Need),
    ("🟢", Bucket::Want),
    ("💰", Bucket::Save),
    // Hammer -> Work
    ("🔨", Bucket::Work),
];

/// Outcome of classifying one category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classification {
    Bucket(Bucket),
    /// More than one marker present. Carries every bucket matched, in table
    /// order; the category must be dropped from aggregation entirely.
    Conflict(Vec<Bucket>),
}

/// Maps category names to buckets by scanning for markers by substring
/// containment. The table is injected so tests can substitute their own.
pub(crate) struct Classifier {
    markers: Vec<(&'static str, Bucket)>,
}

impl Classifier {
    pub(crate) fn new(markers: &[(&'static str, Bucket)]) -> Classifier {
        Classifier { markers: markers.to_vec() }
    }

    pub(crate) fn classify(&self, name: &str) -> Classification {
        let matched: Vec<Bucket> = self.markers.iter()
            .filter(|(marker, _)| name.contains(*marker))
            .map(|(_, bucket)| *bucket)
            .collect();

        match matched.len() {
            0 => Classification::Bucket(Bucket::Unmatched),
            1 => Classification::Bucket(matched[0]),
            // Counted over markers, so 🟠🟢 conflicts even though both map
            // to Want
            _ => Classification::Conflict(matched),
        }
    }

    /// Buckets in table order, deduplicated, with the catch-all last.
    /// Defines the row order of the report.
    pub(crate) fn bucket_order(&self) -> Vec<Bucket> {
        let mut order: Vec<Bucket> = vec![];
        for (_, bucket) in &self.markers {
            if !order.contains(bucket) {
                order.push(*bucket);
            }
        }
        order.push(Bucket::Unmatched);
        order
    }
}
