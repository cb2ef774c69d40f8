//! Data types flowing through the collection and aggregation pipeline.

use std::collections::HashMap;
use std::fmt;

/// A guild member's user name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Member(String);

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Member {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One member's rating of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEntry {
    pub item_id: u64,
    pub item_name: String,
    pub rating: f64,
}

impl RatingEntry {
    pub fn new(item_id: u64, item_name: impl Into<String>, rating: f64) -> Self {
        Self {
            item_id,
            item_name: item_name.into(),
            rating,
        }
    }
}

/// Everything one member rated, highest rating first.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRatingSet {
    pub member: Member,
    ratings: Vec<RatingEntry>,
}

impl MemberRatingSet {
    /// Sorts `ratings` descending by value; equal ratings keep their order.
    pub fn new(member: Member, mut ratings: Vec<RatingEntry>) -> Self {
        ratings.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        Self { member, ratings }
    }

    pub fn empty(member: Member) -> Self {
        Self {
            member,
            ratings: Vec::new(),
        }
    }

    pub fn ratings(&self) -> &[RatingEntry] {
        &self.ratings
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// Rating sets keyed by member, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupRatings {
    sets: Vec<MemberRatingSet>,
    /// Position of each member's set in `sets`.
    index: HashMap<Member, usize>,
}

impl GroupRatings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `set` unless its member is already present. Returns whether it was added.
    pub fn insert(&mut self, set: MemberRatingSet) -> bool {
        if self.index.contains_key(&set.member) {
            return false;
        }
        self.index.insert(set.member.clone(), self.sets.len());
        self.sets.push(set);
        true
    }

    pub fn get(&self, member: &Member) -> Option<&MemberRatingSet> {
        self.index.get(member).map(|&i| &self.sets[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberRatingSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of (member, item) ratings across all members.
    pub fn total_ratings(&self) -> usize {
        self.sets.iter().map(|s| s.ratings.len()).sum()
    }
}

impl FromIterator<MemberRatingSet> for GroupRatings {
    fn from_iter<I: IntoIterator<Item = MemberRatingSet>>(iter: I) -> Self {
        let mut group = Self::new();
        for set in iter {
            group.insert(set);
        }
        group
    }
}

/// All ratings one item received across the group.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateEntry {
    pub item_id: u64,
    /// Name as reported by the first member seen rating this item.
    pub item_name: String,
    pub ratings: Vec<f64>,
}
