//! Board controller.
//!
//! `BoardController` is the single owner of the tier board. Front ends call
//! its methods in response to user actions and learn about the resulting state
//! transitions through `subscribe()`. When a save handle is attached, every
//! transition also schedules a debounced write of the new snapshot.

use crate::board::{BoardError, Direction, TierBoard, TierUpdate};
use crate::dnd::DropCommand;
use crate::error::TierListError;
use crate::interchange::import_from_text;
use crate::models::{BucketId, Snapshot};
use crate::scheduler::SaveHandle;
use crate::source::{extract_user_id, ImportError, ItemSource};
use tokio::sync::broadcast;
use tracing::{info, warn};

const EVENT_CAPACITY: usize = 64;

/// A completed state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    ItemMoved { item_id: String, from: BucketId, to: BucketId },
    TierAdded { tier_id: String },
    TierRemoved { tier_id: String, returned: usize },
    TierUpdated { tier_id: String },
    TierReordered { tier_id: String, direction: Direction },
    ImportStarted { user_id: String },
    ImportFailed { message: String },
    ItemsImported { fetched: usize, added: usize },
    Replaced,
    Cleared,
}

/// Outcome of a profile import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub fetched: usize,
    pub added: usize,
}

impl ImportReport {
    /// Everything fetched was already on the board
    pub fn nothing_new(&self) -> bool {
        self.added == 0
    }
}

pub struct BoardController {
    board: TierBoard,
    events: broadcast::Sender<BoardEvent>,
    saver: Option<SaveHandle>,
    revision: u64,
}

impl BoardController {
    pub fn new(board: TierBoard) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            board,
            events,
            saver: None,
            revision: 0,
        }
    }

    /// Restore from a stored snapshot, or start empty when it is unusable
    pub fn restore(snapshot: Option<Snapshot>) -> Self {
        let board = match snapshot.map(TierBoard::from_snapshot) {
            Some(Ok(board)) => board,
            Some(Err(e)) => {
                warn!(error = %e, "Stored tier list is inconsistent, starting fresh");
                TierBoard::new()
            }
            None => TierBoard::new(),
        };
        Self::new(board)
    }

    /// Schedule a save through `saver` after every transition
    pub fn attach_saver(&mut self, saver: SaveHandle) {
        self.saver = Some(saver);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    pub fn board(&self) -> &TierBoard {
        &self.board
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    /// Number of transitions applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self, event: BoardEvent) {
        let persist = !matches!(event, BoardEvent::ImportStarted { .. } | BoardEvent::ImportFailed { .. });
        if persist {
            self.revision += 1;
            if let Some(saver) = &self.saver {
                match event {
                    BoardEvent::Cleared => saver.clear(),
                    _ => saver.schedule(self.board.snapshot()),
                }
            }
        }

        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn move_item(&mut self, item_id: &str, from: &BucketId, to: &BucketId) -> Result<bool, BoardError> {
        let moved = self.board.move_item(item_id, from, to)?;
        if moved {
            self.notify(BoardEvent::ItemMoved {
                item_id: item_id.to_string(),
                from: from.clone(),
                to: to.clone(),
            });
        }
        Ok(moved)
    }

    /// Move an item to `to` from its current bucket
    pub fn relocate(&mut self, item_id: &str, to: &BucketId) -> Result<bool, BoardError> {
        let from = self
            .board
            .location(item_id)
            .cloned()
            .ok_or_else(|| BoardError::UnknownItem(item_id.to_string()))?;
        self.move_item(item_id, &from, to)
    }

    /// Apply a completed drag
    pub fn apply_drop(&mut self, command: DropCommand) -> Result<bool, BoardError> {
        self.move_item(&command.item_id, &command.from, &command.to)
    }

    pub fn add_tier(&mut self) -> String {
        let tier_id = self.board.add_tier();
        self.notify(BoardEvent::TierAdded {
            tier_id: tier_id.clone(),
        });
        tier_id
    }

    pub fn remove_tier(&mut self, tier_id: &str) -> Result<bool, BoardError> {
        let returned = self.board.tier(tier_id).map(|t| t.items.len()).unwrap_or(0);
        let removed = self.board.remove_tier(tier_id)?;
        if removed {
            self.notify(BoardEvent::TierRemoved {
                tier_id: tier_id.to_string(),
                returned,
            });
        }
        Ok(removed)
    }

    pub fn update_tier(&mut self, tier_id: &str, update: TierUpdate) -> Result<(), BoardError> {
        if update.is_empty() {
            return Ok(());
        }
        self.board.update_tier(tier_id, update)?;
        self.notify(BoardEvent::TierUpdated {
            tier_id: tier_id.to_string(),
        });
        Ok(())
    }

    pub fn reorder_tier(&mut self, tier_id: &str, direction: Direction) -> Result<bool, BoardError> {
        let moved = self.board.reorder_tier(tier_id, direction)?;
        if moved {
            self.notify(BoardEvent::TierReordered {
                tier_id: tier_id.to_string(),
                direction,
            });
        }
        Ok(moved)
    }

    /// Import the follows behind a pasted profile URL
    ///
    /// The controller stays mutably borrowed until the fetch completes, so a
    /// second import cannot start while one is in flight.
    pub async fn import_profile(&mut self, url: &str, source: &dyn ItemSource) -> Result<ImportReport, TierListError> {
        let url = url.trim();
        let user_id = extract_user_id(url).ok_or(ImportError::InvalidIdentifier)?;

        info!(user_id = %user_id, "Importing follows");
        self.notify(BoardEvent::ImportStarted {
            user_id: user_id.clone(),
        });

        let items = match source.fetch_items(&user_id).await {
            Ok(items) if items.is_empty() => Err(ImportError::NoFollowsFound),
            other => other,
        };

        let items = match items {
            Ok(items) => items,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Import failed");
                self.notify(BoardEvent::ImportFailed { message: e.to_string() });
                return Err(e.into());
            }
        };

        let fetched = items.len();
        let added = self.board.import_items(items).len();
        self.board.set_source_url(Some(url.to_string()));
        self.board.touch();

        self.notify(BoardEvent::ItemsImported { fetched, added });
        Ok(ImportReport { fetched, added })
    }

    /// Replace the whole board with pasted or loaded export text
    ///
    /// Nothing changes unless the text parses and validates in full.
    pub fn replace_from_text(&mut self, text: &str) -> Result<(), TierListError> {
        if text.trim().is_empty() {
            return Err(TierListError::Validation("Nothing to import: the data is empty".into()));
        }

        let snapshot = import_from_text(text)?;
        self.board = TierBoard::from_snapshot(snapshot)?;
        info!(items = self.board.total_count(), "Replaced tier list from imported data");
        self.notify(BoardEvent::Replaced);
        Ok(())
    }

    pub fn clear_all(&mut self) {
        self.board.clear_all();
        self.notify(BoardEvent::Cleared);
    }
}
