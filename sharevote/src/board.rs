use crate::*;
use std::sync::{Arc, RwLock};

/// An append-only bulletin board
pub trait BulletinBoard {
    /// Append a record. Records are never modified or removed.
    fn append(&mut self, record: BulletinRecord);

    /// A consistent copy of every record, in append order
    fn snapshot(&self) -> Vec<BulletinRecord>;

    /// Number of records on the board
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The most recent published tally, if any
    fn last_published_tally(&self) -> Option<TallyPublished> {
        last_published_tally(&self.snapshot()).cloned()
    }
}

/// A simple board that keeps records in memory
#[derive(Default, Clone, Debug)]
pub struct MemBoard {
    records: Vec<BulletinRecord>,
}

impl MemBoard {
    pub fn records(&self) -> &[BulletinRecord] {
        &self.records
    }

    /// Records of one type, in append order
    pub fn get_multiple(&self, record_type: &str) -> Vec<&BulletinRecord> {
        self.records
            .iter()
            .filter(|r| r.record_type() == record_type)
            .collect()
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}

impl BulletinBoard for MemBoard {
    fn append(&mut self, record: BulletinRecord) {
        self.records.push(record);
    }

    fn snapshot(&self) -> Vec<BulletinRecord> {
        self.records.clone()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

impl From<Vec<BulletinRecord>> for MemBoard {
    fn from(records: Vec<BulletinRecord>) -> Self {
        MemBoard { records }
    }
}

/// A [`MemBoard`] that can be shared between threads.
///
/// Writers take the write lock only for the duration of a push, and
/// `snapshot` copies the records under the read lock, so a tally computed from
/// a snapshot never sees a record appended halfway through.
#[derive(Default, Clone, Debug)]
pub struct SharedBoard {
    inner: Arc<RwLock<MemBoard>>,
}

impl SharedBoard {
    pub fn new(board: MemBoard) -> Self {
        SharedBoard {
            inner: Arc::new(RwLock::new(board)),
        }
    }

    /// Derive a record from the current contents and append it under one
    /// write lock, so no other record can land between the read and the push.
    pub fn append_from<F, T>(&self, derive: F) -> T
    where
        F: FnOnce(&[BulletinRecord]) -> (BulletinRecord, T),
    {
        let mut board = match self.inner.write() {
            Ok(board) => board,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (record, value) = derive(board.records());
        board.append(record);
        value
    }
}

impl BulletinBoard for SharedBoard {
    fn append(&mut self, record: BulletinRecord) {
        // A poisoned lock still guards a valid Vec; appends are single pushes
        let mut board = match self.inner.write() {
            Ok(board) => board,
            Err(poisoned) => poisoned.into_inner(),
        };
        board.append(record);
    }

    fn snapshot(&self) -> Vec<BulletinRecord> {
        match self.inner.read() {
            Ok(board) => board.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }

    fn len(&self) -> usize {
        match self.inner.read() {
            Ok(board) => board.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

/// The last `tally_published` record in `records`
pub fn last_published_tally(records: &[BulletinRecord]) -> Option<&TallyPublished> {
    records.iter().rev().find_map(|r| match r {
        BulletinRecord::TallyPublished(tally) => Some(tally),
        _ => None,
    })
}
