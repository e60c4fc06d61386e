use std::fmt::{self, Display, Formatter};

use bevy::{prelude::*, utils::HashSet};

use crate::values::DEFAULT_ACTIVATION_RANGE;

/// Opaque identifier classifying what kind of interaction an object supports.
/// The vocabulary belongs to the tag system; the core only compares them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityTag(String);

impl From<&str> for CapabilityTag {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for CapabilityTag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for CapabilityTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability matching is set-intersection over these, never type inspection.
#[derive(Debug, Clone, Default)]
pub struct TagSet(HashSet<CapabilityTag>);

impl TagSet {
    pub fn of<T: Into<CapabilityTag>>(tags: impl IntoIterator<Item = T>) -> Self {
        Self(tags.into_iter().map(Into::into).collect())
    }

    pub fn insert(&mut self, tag: impl Into<CapabilityTag>) {
        self.0.insert(tag.into());
    }

    pub fn contains(&self, tag: &CapabilityTag) -> bool {
        self.0.contains(tag)
    }

    pub fn intersects(&self, other: &TagSet) -> bool {
        self.0.iter().any(|tag| other.0.contains(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a world object offers to interacting actors. The tag set is non-empty
/// by construction: `new` takes the first tag.
#[derive(Debug, Clone)]
pub struct InteractableDescriptor {
    tags: TagSet,
    priority: f32,
    exclusive: bool,
    range: f32,
    hold: Option<f32>,
}

impl InteractableDescriptor {
    pub fn new(tag: impl Into<CapabilityTag>) -> Self {
        let mut tags = TagSet::default();
        tags.insert(tag);

        Self {
            tags,
            priority: 0.0,
            exclusive: false,
            range: DEFAULT_ACTIVATION_RANGE,
            hold: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<CapabilityTag>) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    /// Single-claimant: at most one live session may hold this object.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    /// Requires the actor to sustain the interaction for `seconds` before the
    /// gameplay effect runs.
    pub fn with_hold(mut self, seconds: f32) -> Self {
        self.hold = Some(seconds);
        self
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn hold(&self) -> Option<f32> {
        self.hold
    }
}

/// Availability lifecycle marker: inserting it registers the entity with the
/// registry, removing it (or despawning) deregisters it.
#[derive(Component, Debug, Clone)]
pub struct Interactable(pub InteractableDescriptor);
