use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::animation::{Interpolate, Keyframe};

/// Whether a barrier widens the quote range so it always stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BarrierVisibility {
    /// Drawn only while its quote falls inside the current quote range.
    #[default]
    Normal,
    /// Quote bounds are extended to include the barrier.
    KeepInQuoteRange,
}

/// Horizontal price line, optionally starting at an epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub id: String,
    pub epoch: Option<i64>,
    pub quote: f64,
    pub visibility: BarrierVisibility,
}

impl Barrier {
    #[must_use]
    pub fn new(id: impl Into<String>, quote: f64) -> Self {
        Self {
            id: id.into(),
            epoch: None,
            quote,
            visibility: BarrierVisibility::Normal,
        }
    }

    #[must_use]
    pub fn starting_at(mut self, epoch: i64) -> Self {
        self.epoch = Some(epoch);
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: BarrierVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerDirection {
    Up,
    Down,
}

/// Point annotation pinned to an epoch/quote pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub epoch: i64,
    pub quote: f64,
    pub direction: MarkerDirection,
}

impl Marker {
    #[must_use]
    pub fn new(id: impl Into<String>, epoch: i64, quote: f64, direction: MarkerDirection) -> Self {
        Self {
            id: id.into(),
            epoch,
            quote,
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    Barrier(Barrier),
    Marker(Marker),
}

impl Annotation {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Barrier(barrier) => &barrier.id,
            Self::Marker(marker) => &marker.id,
        }
    }

    #[must_use]
    pub fn epoch(&self) -> Option<i64> {
        match self {
            Self::Barrier(barrier) => barrier.epoch,
            Self::Marker(marker) => Some(marker.epoch),
        }
    }

    #[must_use]
    pub fn quote(&self) -> f64 {
        match self {
            Self::Barrier(barrier) => barrier.quote,
            Self::Marker(marker) => marker.quote,
        }
    }

    /// Whether this annotation must stay inside the animated quote bounds.
    #[must_use]
    pub fn keeps_quote_in_range(&self) -> bool {
        match self {
            Self::Barrier(barrier) => barrier.visibility == BarrierVisibility::KeepInQuoteRange,
            Self::Marker(_) => true,
        }
    }
}

impl From<Barrier> for Annotation {
    fn from(barrier: Barrier) -> Self {
        Self::Barrier(barrier)
    }
}

impl From<Marker> for Annotation {
    fn from(marker: Marker) -> Self {
        Self::Marker(marker)
    }
}

impl Interpolate for Annotation {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        let quote = self.quote() + (to.quote() - self.quote()) * t;
        match (self, to) {
            (Self::Barrier(from), Self::Barrier(target)) => Self::Barrier(Barrier {
                epoch: match (from.epoch, target.epoch) {
                    (Some(a), Some(b)) => Some(a + ((b - a) as f64 * t).round() as i64),
                    _ => target.epoch,
                },
                quote,
                ..target.clone()
            }),
            (Self::Marker(from), Self::Marker(target)) => Self::Marker(Marker {
                epoch: from.epoch + ((target.epoch - from.epoch) as f64 * t).round() as i64,
                quote,
                ..target.clone()
            }),
            _ => to.clone(),
        }
    }
}

/// Current annotations plus the snapshot they replaced.
///
/// The set is always swapped wholesale; the previous snapshot, matched by id,
/// is the interpolation source for the next transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    previous: IndexMap<String, Annotation>,
    current: Vec<Annotation>,
}

impl AnnotationSet {
    #[must_use]
    pub fn current(&self) -> &[Annotation] {
        &self.current
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn replace(&mut self, annotations: Vec<Annotation>) {
        let previous = std::mem::replace(&mut self.current, annotations);
        self.previous = previous
            .into_iter()
            .map(|annotation| (annotation.id().to_owned(), annotation))
            .collect();
    }

    /// Keyframes for the current annotations at `progress`; annotations
    /// with no predecessor appear settled.
    #[must_use]
    pub fn keyframes(&self, progress: f64) -> Vec<Keyframe<Annotation>> {
        self.current
            .iter()
            .map(|annotation| match self.previous.get(annotation.id()) {
                Some(previous) => Keyframe::new(previous.clone(), annotation.clone(), progress),
                None => Keyframe::settled(annotation.clone()),
            })
            .collect()
    }

    #[must_use]
    pub fn min_epoch(&self) -> Option<i64> {
        self.current.iter().filter_map(Annotation::epoch).min()
    }

    #[must_use]
    pub fn max_epoch(&self) -> Option<i64> {
        self.current.iter().filter_map(Annotation::epoch).max()
    }

    /// Quote range the animated bounds must include.
    #[must_use]
    pub fn pinned_quote_range(&self) -> Option<(f64, f64)> {
        self.current
            .iter()
            .filter(|annotation| annotation.keeps_quote_in_range())
            .map(Annotation::quote)
            .filter(|quote| quote.is_finite())
            .fold(None, |acc, quote| {
                Some(acc.map_or((quote, quote), |(min, max): (f64, f64)| {
                    (min.min(quote), max.max(quote))
                }))
            })
    }
}
