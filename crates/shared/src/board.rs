//! Tier assignment model.
//!
//! `TierBoard` owns the tiers, the unranked list and the full set of imported
//! items. It keeps its own `item id -> bucket` map, so the location of an item
//! is never taken on trust from the caller: a move names the source it expects
//! and the board refuses the move when the item is somewhere else.
//!
//! Every mutating operation takes `&mut self` and completes before returning,
//! so observers only ever see the state before or after a move.

use crate::models::{default_tiers, now_timestamp, BucketId, Item, Snapshot, Tier, UNRANKED_BUCKET};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Maximum number of characters in a tier label
pub const MAX_LABEL_CHARS: usize = 5;

/// Label given to a freshly added tier
pub const NEW_TIER_LABEL: &str = "NEW";

/// Color given to a freshly added tier
pub const NEW_TIER_COLOR: &str = "#cccccc";

/// Errors raised by board operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Unknown bucket: {0}")]
    UnknownBucket(BucketId),

    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    #[error("Item {item_id} is in {actual}, not in {claimed}")]
    SourceMismatch {
        item_id: String,
        claimed: BucketId,
        actual: BucketId,
    },

    #[error("Invalid color: {0} (expected #rgb or #rrggbb)")]
    InvalidColor(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Direction for reordering a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Partial update of a tier's display fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierUpdate {
    pub label: Option<String>,
    pub color: Option<String>,
}

impl TierUpdate {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            color: None,
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            label: None,
            color: Some(color.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.color.is_none()
    }
}

/// Resolved position of a bucket inside the board
#[derive(Debug, Clone, Copy)]
enum Slot {
    Unranked,
    Tier(usize),
}

/// In-memory tier board
#[derive(Debug, Clone)]
pub struct TierBoard {
    all_items: Vec<Item>,
    tiers: Vec<Tier>,
    unranked: Vec<Item>,
    locations: HashMap<String, BucketId>,
    last_updated: String,
    source_url: Option<String>,
}

impl Default for TierBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TierBoard {
    /// Create an empty board with the default tiers
    pub fn new() -> Self {
        Self {
            all_items: Vec::new(),
            tiers: default_tiers(),
            unranked: Vec::new(),
            locations: HashMap::new(),
            last_updated: String::new(),
            source_url: None,
        }
    }

    /// Build a board from a snapshot, validating every invariant
    ///
    /// Items listed in `comics` but placed in no bucket (older exports dropped
    /// the contents of deleted tiers this way) are appended to unranked.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, BoardError> {
        let Snapshot {
            all_items,
            tiers,
            unranked,
            last_updated,
            source_url,
        } = snapshot;

        if tiers.is_empty() {
            return Err(BoardError::InvalidSnapshot("at least one tier is required".into()));
        }

        let mut tier_ids = HashSet::new();
        for tier in &tiers {
            if tier.id.is_empty() || tier.id == UNRANKED_BUCKET {
                return Err(BoardError::InvalidSnapshot(format!(
                    "invalid tier id {:?}",
                    tier.id
                )));
            }
            if !tier_ids.insert(tier.id.as_str()) {
                return Err(BoardError::InvalidSnapshot(format!(
                    "duplicate tier id {:?}",
                    tier.id
                )));
            }
        }

        let mut known = HashSet::new();
        for item in &all_items {
            if !known.insert(item.id.as_str()) {
                return Err(BoardError::InvalidSnapshot(format!(
                    "duplicate item id {:?}",
                    item.id
                )));
            }
        }

        let mut locations: HashMap<String, BucketId> = HashMap::new();
        let placements = tiers
            .iter()
            .map(|t| (BucketId::tier(t.id.clone()), &t.items))
            .chain(std::iter::once((BucketId::Unranked, &unranked)));

        for (bucket, items) in placements {
            for item in items {
                if !known.contains(item.id.as_str()) {
                    return Err(BoardError::InvalidSnapshot(format!(
                        "item {:?} in {} is missing from the item list",
                        item.id, bucket
                    )));
                }
                if let Some(previous) = locations.insert(item.id.clone(), bucket.clone()) {
                    return Err(BoardError::InvalidSnapshot(format!(
                        "item {:?} appears in both {} and {}",
                        item.id, previous, bucket
                    )));
                }
            }
        }

        let mut board = Self {
            all_items,
            tiers,
            unranked,
            locations,
            last_updated,
            source_url,
        };

        let orphans: Vec<Item> = board
            .all_items
            .iter()
            .filter(|item| !board.locations.contains_key(&item.id))
            .cloned()
            .collect();

        if !orphans.is_empty() {
            warn!(count = orphans.len(), "Returning unplaced items to unranked");
            for item in orphans {
                board.locations.insert(item.id.clone(), BucketId::Unranked);
                board.unranked.push(item);
            }
        }

        Ok(board)
    }

    /// Serializable copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            all_items: self.all_items.clone(),
            tiers: self.tiers.clone(),
            unranked: self.unranked.clone(),
            last_updated: self.last_updated.clone(),
            source_url: self.source_url.clone(),
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn unranked(&self) -> &[Item] {
        &self.unranked
    }

    pub fn all_items(&self) -> &[Item] {
        &self.all_items
    }

    pub fn tier(&self, tier_id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == tier_id)
    }

    /// Current bucket of an item
    pub fn location(&self, item_id: &str) -> Option<&BucketId> {
        self.locations.get(item_id)
    }

    pub fn total_count(&self) -> usize {
        self.all_items.len()
    }

    pub fn ranked_count(&self) -> usize {
        self.tiers.iter().map(|t| t.items.len()).sum()
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    pub fn set_source_url(&mut self, url: Option<String>) {
        self.source_url = url;
    }

    /// Stamp the board with the current time
    pub fn touch(&mut self) {
        self.last_updated = now_timestamp();
    }

    /// Move an item between buckets
    ///
    /// `from` is the bucket the caller believes holds the item. Returns
    /// `Ok(false)` when `from == to`; fails without touching the board when
    /// the item is actually somewhere else.
    pub fn move_item(&mut self, item_id: &str, from: &BucketId, to: &BucketId) -> Result<bool, BoardError> {
        if from == to {
            return Ok(false);
        }

        let actual = self
            .locations
            .get(item_id)
            .ok_or_else(|| BoardError::UnknownItem(item_id.to_string()))?;

        if actual != from {
            return Err(BoardError::SourceMismatch {
                item_id: item_id.to_string(),
                claimed: from.clone(),
                actual: actual.clone(),
            });
        }

        self.transfer(item_id, from, to)
    }

    /// Move an item to `to` from wherever it currently is
    pub fn relocate(&mut self, item_id: &str, to: &BucketId) -> Result<bool, BoardError> {
        let actual = self
            .locations
            .get(item_id)
            .cloned()
            .ok_or_else(|| BoardError::UnknownItem(item_id.to_string()))?;

        if &actual == to {
            return Ok(false);
        }

        self.transfer(item_id, &actual, to)
    }

    fn transfer(&mut self, item_id: &str, from: &BucketId, to: &BucketId) -> Result<bool, BoardError> {
        let target = self
            .resolve(to)
            .ok_or_else(|| BoardError::UnknownBucket(to.clone()))?;
        let source = self
            .resolve(from)
            .ok_or_else(|| BoardError::UnknownBucket(from.clone()))?;

        let list = self.slot_mut(source);
        let position = list
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| BoardError::UnknownItem(item_id.to_string()))?;
        let item = list.remove(position);

        self.slot_mut(target).push(item);
        self.locations.insert(item_id.to_string(), to.clone());

        debug!(item_id = item_id, from = %from, to = %to, "Moved item");
        Ok(true)
    }

    fn resolve(&self, bucket: &BucketId) -> Option<Slot> {
        match bucket {
            BucketId::Unranked => Some(Slot::Unranked),
            BucketId::Tier(id) => self.tiers.iter().position(|t| &t.id == id).map(Slot::Tier),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Vec<Item> {
        match slot {
            Slot::Unranked => &mut self.unranked,
            Slot::Tier(index) => &mut self.tiers[index].items,
        }
    }

    /// Append a new empty tier and return its id
    pub fn add_tier(&mut self) -> String {
        let base = format!("tier-{}", Utc::now().timestamp_millis());
        let mut id = base.clone();
        let mut suffix = 1;
        while self.tiers.iter().any(|t| t.id == id) {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        self.tiers.push(Tier::new(id.clone(), NEW_TIER_LABEL, NEW_TIER_COLOR));
        info!(tier_id = %id, "Added tier");
        id
    }

    /// Remove a tier, returning its items to the end of unranked
    ///
    /// Returns `Ok(false)` when the tier is the last one left.
    pub fn remove_tier(&mut self, tier_id: &str) -> Result<bool, BoardError> {
        let index = self
            .tiers
            .iter()
            .position(|t| t.id == tier_id)
            .ok_or_else(|| BoardError::UnknownTier(tier_id.to_string()))?;

        if self.tiers.len() <= 1 {
            warn!(tier_id = tier_id, "Refusing to remove the last tier");
            return Ok(false);
        }

        let tier = self.tiers.remove(index);
        let returned = tier.items.len();
        for item in tier.items {
            self.locations.insert(item.id.clone(), BucketId::Unranked);
            self.unranked.push(item);
        }

        info!(tier_id = tier_id, returned = returned, "Removed tier");
        Ok(true)
    }

    /// Merge label and color changes into a tier
    pub fn update_tier(&mut self, tier_id: &str, update: TierUpdate) -> Result<(), BoardError> {
        if let Some(color) = &update.color {
            if !is_valid_color(color) {
                return Err(BoardError::InvalidColor(color.clone()));
            }
        }

        let tier = self
            .tiers
            .iter_mut()
            .find(|t| t.id == tier_id)
            .ok_or_else(|| BoardError::UnknownTier(tier_id.to_string()))?;

        if let Some(label) = update.label {
            tier.label = normalize_label(&label);
        }
        if let Some(color) = update.color {
            tier.color = color.to_ascii_lowercase();
        }

        debug!(tier_id = tier_id, label = %tier.label, color = %tier.color, "Updated tier");
        Ok(())
    }

    /// Swap a tier with its neighbor; `Ok(false)` at the boundaries
    pub fn reorder_tier(&mut self, tier_id: &str, direction: Direction) -> Result<bool, BoardError> {
        let index = self
            .tiers
            .iter()
            .position(|t| t.id == tier_id)
            .ok_or_else(|| BoardError::UnknownTier(tier_id.to_string()))?;

        let neighbor = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.tiers.len() => index + 1,
            _ => return Ok(false),
        };

        self.tiers.swap(index, neighbor);
        Ok(true)
    }

    /// Add newly imported items to the board
    ///
    /// Items whose title already exists (exact match) are skipped, as are
    /// items reusing an id already on the board. Accepted items are appended
    /// to both the item list and unranked, and returned.
    pub fn import_items(&mut self, new_items: Vec<Item>) -> Vec<Item> {
        let mut titles: HashSet<String> = self.all_items.iter().map(|i| i.title.clone()).collect();
        let mut accepted = Vec::new();

        for item in new_items {
            if titles.contains(&item.title) {
                debug!(title = %item.title, "Skipping already imported title");
                continue;
            }
            if self.locations.contains_key(&item.id) {
                warn!(item_id = %item.id, title = %item.title, "Skipping item with an id already on the board");
                continue;
            }

            titles.insert(item.title.clone());
            self.locations.insert(item.id.clone(), BucketId::Unranked);
            self.all_items.push(item.clone());
            self.unranked.push(item.clone());
            accepted.push(item);
        }

        info!(added = accepted.len(), total = self.all_items.len(), "Imported items");
        accepted
    }

    /// Reset to an empty board with the default tiers
    pub fn clear_all(&mut self) {
        *self = Self::new();
        info!("Cleared board");
    }
}

/// Upper-case a label and cut it to `MAX_LABEL_CHARS` characters
pub fn normalize_label(label: &str) -> String {
    label.to_uppercase().chars().take(MAX_LABEL_CHARS).collect()
}

/// `#rgb` or `#rrggbb`
pub fn is_valid_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> Item {
        Item::new(id, title, format!("https://img.example/{}.jpg", id))
    }

    fn board_with(items: &[(&str, &str)]) -> TierBoard {
        let mut board = TierBoard::new();
        board.import_items(items.iter().map(|(id, title)| item(id, title)).collect());
        board
    }

    /// Every item of the board sits in exactly one bucket
    fn assert_consistent(board: &TierBoard) {
        let mut seen = HashMap::new();
        for tier in board.tiers() {
            for i in &tier.items {
                assert!(seen.insert(i.id.clone(), BucketId::tier(tier.id.clone())).is_none());
            }
        }
        for i in board.unranked() {
            assert!(seen.insert(i.id.clone(), BucketId::Unranked).is_none());
        }
        assert_eq!(seen.len(), board.all_items().len());
        for i in board.all_items() {
            assert_eq!(board.location(&i.id), seen.get(&i.id));
        }
    }

    #[test]
    fn test_new_board() {
        let board = TierBoard::new();
        assert_eq!(board.tiers().len(), 6);
        assert!(board.unranked().is_empty());
        assert_eq!(board.total_count(), 0);
    }

    #[test]
    fn test_import_then_move() -> Result<(), BoardError> {
        let mut board = board_with(&[("1", "A"), ("2", "B")]);
        assert_eq!(board.all_items().len(), 2);
        assert_eq!(board.unranked().len(), 2);

        let moved = board.move_item("1", &BucketId::Unranked, &BucketId::tier("s"))?;
        assert!(moved);
        assert_eq!(board.tier("s").unwrap().items, vec![item("1", "A")]);
        assert_eq!(board.unranked(), &[item("2", "B")]);
        assert_eq!(board.ranked_count(), 1);
        assert_consistent(&board);
        Ok(())
    }

    #[test]
    fn test_move_same_bucket_is_noop() -> Result<(), BoardError> {
        let mut board = board_with(&[("1", "A")]);
        assert!(!board.move_item("1", &BucketId::Unranked, &BucketId::Unranked)?);
        assert_eq!(board.unranked().len(), 1);
        Ok(())
    }

    #[test]
    fn test_move_with_wrong_source_is_rejected() {
        let mut board = board_with(&[("1", "A")]);
        let before = board.snapshot();

        let err = board
            .move_item("1", &BucketId::tier("a"), &BucketId::tier("s"))
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::SourceMismatch {
                item_id: "1".into(),
                claimed: BucketId::tier("a"),
                actual: BucketId::Unranked,
            }
        );
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_move_to_unknown_bucket_leaves_item() {
        let mut board = board_with(&[("1", "A")]);
        let err = board
            .move_item("1", &BucketId::Unranked, &BucketId::tier("zz"))
            .unwrap_err();
        assert_eq!(err, BoardError::UnknownBucket(BucketId::tier("zz")));
        assert_eq!(board.location("1"), Some(&BucketId::Unranked));
        assert_consistent(&board);
    }

    #[test]
    fn test_move_unknown_item() {
        let mut board = TierBoard::new();
        let err = board
            .move_item("nope", &BucketId::Unranked, &BucketId::tier("s"))
            .unwrap_err();
        assert_eq!(err, BoardError::UnknownItem("nope".into()));
    }

    #[test]
    fn test_relocate_uses_known_location() -> Result<(), BoardError> {
        let mut board = board_with(&[("1", "A")]);
        board.relocate("1", &BucketId::tier("b"))?;
        board.relocate("1", &BucketId::tier("c"))?;
        assert_eq!(board.location("1"), Some(&BucketId::tier("c")));
        assert!(board.tier("b").unwrap().items.is_empty());
        assert!(!board.relocate("1", &BucketId::tier("c"))?);
        assert_consistent(&board);
        Ok(())
    }

    #[test]
    fn test_move_sequence_keeps_items_unique() -> Result<(), BoardError> {
        let mut board = board_with(&[("1", "A"), ("2", "B"), ("3", "C")]);
        let targets = ["s", "unranked", "a", "a", "f", "s", "unranked", "d"];

        for (step, target) in targets.iter().enumerate() {
            let id = ["1", "2", "3"][step % 3];
            let from = board.location(id).cloned().unwrap();
            board.move_item(id, &from, &BucketId::from(*target))?;
            assert_consistent(&board);

            // A stale source must never duplicate the item
            let stale = from;
            let _ = board.move_item(id, &stale, &BucketId::tier("b"));
            assert_consistent(&board);
        }
        Ok(())
    }

    #[test]
    fn test_add_tier() {
        let mut board = TierBoard::new();
        let first = board.add_tier();
        let second = board.add_tier();
        assert_ne!(first, second);

        let tier = board.tier(&first).unwrap();
        assert_eq!(tier.label, NEW_TIER_LABEL);
        assert_eq!(tier.color, NEW_TIER_COLOR);
        assert!(tier.items.is_empty());
        assert_eq!(board.tiers().len(), 8);
        assert_eq!(board.tiers().last().unwrap().id, second);
    }

    #[test]
    fn test_remove_tier_returns_items_to_unranked() -> Result<(), BoardError> {
        let mut board = board_with(&[("1", "A"), ("2", "B")]);
        board.relocate("1", &BucketId::tier("s"))?;

        assert!(board.remove_tier("s")?);
        assert!(board.tier("s").is_none());
        assert_eq!(board.unranked(), &[item("2", "B"), item("1", "A")]);
        assert_eq!(board.location("1"), Some(&BucketId::Unranked));
        assert_consistent(&board);
        Ok(())
    }

    #[test]
    fn test_remove_last_tier_is_rejected() -> Result<(), BoardError> {
        let mut board = TierBoard::new();
        for id in ["a", "b", "c", "d", "f"] {
            assert!(board.remove_tier(id)?);
        }
        assert_eq!(board.tiers().len(), 1);

        let before = board.snapshot();
        assert!(!board.remove_tier("s")?);
        assert_eq!(board.snapshot(), before);
        Ok(())
    }

    #[test]
    fn test_remove_unknown_tier() {
        let mut board = TierBoard::new();
        assert_eq!(board.remove_tier("x"), Err(BoardError::UnknownTier("x".into())));
    }

    #[test]
    fn test_update_tier_label_is_normalized() -> Result<(), BoardError> {
        let mut board = TierBoard::new();
        board.update_tier("s", TierUpdate::label("legendary"))?;
        assert_eq!(board.tier("s").unwrap().label, "LEGEN");

        board.update_tier("a", TierUpdate::label("ok"))?;
        assert_eq!(board.tier("a").unwrap().label, "OK");
        Ok(())
    }

    #[test]
    fn test_update_tier_color() -> Result<(), BoardError> {
        let mut board = TierBoard::new();
        board.update_tier("s", TierUpdate::color("#ABCDEF"))?;
        assert_eq!(board.tier("s").unwrap().color, "#abcdef");

        let err = board.update_tier("s", TierUpdate::color("red")).unwrap_err();
        assert_eq!(err, BoardError::InvalidColor("red".into()));
        assert_eq!(board.tier("s").unwrap().color, "#abcdef");
        Ok(())
    }

    #[test]
    fn test_update_invalid_color_keeps_label() {
        let mut board = TierBoard::new();
        let update = TierUpdate {
            label: Some("top".into()),
            color: Some("#12345".into()),
        };
        assert!(board.update_tier("s", update).is_err());
        assert_eq!(board.tier("s").unwrap().label, "S");
    }

    #[test]
    fn test_reorder_tier() -> Result<(), BoardError> {
        let mut board = TierBoard::new();
        assert!(board.reorder_tier("a", Direction::Up)?);
        assert_eq!(board.tiers()[0].id, "a");
        assert_eq!(board.tiers()[1].id, "s");

        assert!(!board.reorder_tier("a", Direction::Up)?);
        assert!(!board.reorder_tier("f", Direction::Down)?);
        assert!(board.reorder_tier("d", Direction::Down)?);
        assert_eq!(board.tiers()[5].id, "d");
        Ok(())
    }

    #[test]
    fn test_import_dedups_by_title() {
        let mut board = board_with(&[("1", "A")]);
        let added = board.import_items(vec![item("2", "A"), item("3", "B"), item("4", "B")]);

        assert_eq!(added, vec![item("3", "B")]);
        let titles: Vec<&str> = board.all_items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_consistent(&board);
    }

    #[test]
    fn test_import_skips_reused_id() {
        let mut board = board_with(&[("1", "A")]);
        let added = board.import_items(vec![item("1", "Other")]);
        assert!(added.is_empty());
        assert_eq!(board.total_count(), 1);
    }

    #[test]
    fn test_clear_all() -> Result<(), BoardError> {
        let mut board = board_with(&[("1", "A")]);
        board.relocate("1", &BucketId::tier("s"))?;
        board.add_tier();
        board.set_source_url(Some("https://comick.io/user/abc/list".into()));
        board.touch();

        board.clear_all();
        assert_eq!(board.snapshot(), Snapshot::default());
        Ok(())
    }

    #[test]
    fn test_snapshot_round_trip() -> Result<(), BoardError> {
        let mut board = board_with(&[("1", "A"), ("2", "B")]);
        board.relocate("2", &BucketId::tier("c"))?;

        let snapshot = board.snapshot();
        let restored = TierBoard::from_snapshot(snapshot.clone())?;
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.location("2"), Some(&BucketId::tier("c")));
        Ok(())
    }

    #[test]
    fn test_from_snapshot_rejects_duplicates() {
        let mut snapshot = Snapshot::default();
        snapshot.all_items.push(item("1", "A"));
        snapshot.unranked.push(item("1", "A"));
        snapshot.tiers[0].items.push(item("1", "A"));

        assert!(matches!(
            TierBoard::from_snapshot(snapshot),
            Err(BoardError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_from_snapshot_rejects_unknown_items_and_no_tiers() {
        let mut snapshot = Snapshot::default();
        snapshot.unranked.push(item("9", "Ghost"));
        assert!(TierBoard::from_snapshot(snapshot).is_err());

        let empty = Snapshot {
            tiers: Vec::new(),
            ..Snapshot::default()
        };
        assert!(TierBoard::from_snapshot(empty).is_err());
    }

    #[test]
    fn test_from_snapshot_rejects_reserved_tier_ids() {
        for bad_id in ["", "unranked"] {
            let mut snapshot = Snapshot::default();
            snapshot.tiers[1].id = bad_id.to_string();
            assert!(matches!(
                TierBoard::from_snapshot(snapshot),
                Err(BoardError::InvalidSnapshot(_))
            ));
        }
    }

    #[test]
    fn test_from_snapshot_places_orphans() -> Result<(), BoardError> {
        let mut snapshot = Snapshot::default();
        snapshot.all_items.push(item("1", "A"));

        let board = TierBoard::from_snapshot(snapshot)?;
        assert_eq!(board.unranked(), &[item("1", "A")]);
        assert_consistent(&board);
        Ok(())
    }

    #[test]
    fn test_label_and_color_helpers() {
        assert_eq!(normalize_label("tier"), "TIER");
        assert_eq!(normalize_label("abcdefgh"), "ABCDE");
        assert!(is_valid_color("#fff"));
        assert!(is_valid_color("#7fff7f"));
        assert!(!is_valid_color("7fff7f"));
        assert!(!is_valid_color("#ggg"));
    }
}
